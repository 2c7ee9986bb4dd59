//! Retry loop shared by the plain and authenticated clients.

use super::classify::TransientClassifier;
use super::policy::{AttemptOutcome, RequestAttempt, RetryBehavior};
use crate::error::ClientError;
use crate::transport::HttpResponse;

/// Knobs for one run of the retry loop.
#[derive(Clone, Copy)]
pub struct RetryContext<'a> {
    pub behavior: &'a dyn RetryBehavior,
    pub classifier: TransientClassifier,
    /// Also offer transport failures to `behavior` instead of failing at once.
    pub retry_transport_errors: bool,
}

/// Sends until the response is final or the behavior says stop.
///
/// `send` receives the previous attempt (`None` on the first call) so it can
/// prepare the resend, e.g. refresh a rejected credential. A non-success
/// status that ends the loop is returned as `Ok`; only errors from `send` are
/// returned as `Err`. Errors other than [`ClientError::Transport`] abort
/// immediately.
pub fn run_with_retry<F>(ctx: RetryContext<'_>, mut send: F) -> Result<HttpResponse, ClientError>
where
    F: FnMut(Option<&RequestAttempt>) -> Result<HttpResponse, ClientError>,
{
    let mut index = 1u32;
    let mut result = send(None);
    loop {
        let Some(outcome) = retryable_outcome(&ctx, &result) else {
            return result;
        };

        let attempt = RequestAttempt { index, outcome };
        if !ctx.behavior.decide(&attempt) {
            tracing::debug!("giving up after attempt {} ({:?})", index, outcome);
            return result;
        }
        tracing::warn!("attempt {} failed ({:?}), retrying", index, outcome);
        index += 1;
        result = send(Some(&attempt));
    }
}

/// The outcome to offer the retry behavior, or `None` if `result` is final.
fn retryable_outcome(
    ctx: &RetryContext<'_>,
    result: &Result<HttpResponse, ClientError>,
) -> Option<AttemptOutcome> {
    match result {
        Ok(resp) if resp.is_success() => None,
        Ok(resp) if ctx.classifier.is_transient(resp.status) => {
            Some(AttemptOutcome::Status(resp.status))
        }
        Ok(_) => None,
        Err(ClientError::Transport(e)) if ctx.retry_transport_errors => {
            Some(AttemptOutcome::Transport(e.kind()))
        }
        Err(_) => None,
    }
}
