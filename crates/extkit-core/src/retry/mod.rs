//! Retry and backoff policy.
//!
//! This module encapsulates status classification (timeouts, throttling,
//! rejected credentials, retryable server errors) and backoff decisions so
//! that the plain and authenticated clients share one retry loop.

mod classify;
mod policy;
mod run;

pub use classify::{classify_http_status, is_success_status, StatusClass, TransientClassifier};
pub use policy::{AttemptOutcome, RequestAttempt, RetryBehavior, RetryPolicy};
pub use run::{run_with_retry, RetryContext};
