//! Client without credentials: retry on transient statuses only.

use std::collections::HashMap;
use std::sync::Arc;

use super::HttpClient;
use crate::error::ClientError;
use crate::retry::{run_with_retry, RetryBehavior, RetryContext, TransientClassifier};
use crate::transport::{CurlTransport, HttpRequest, HttpResponse, Method, Transport};
use crate::url_model;

/// Retrying client for endpoints that need no identity.
pub struct PlainClient {
    transport: Arc<dyn Transport>,
    retry: Arc<dyn RetryBehavior>,
    retry_transport_errors: bool,
}

impl PlainClient {
    pub fn builder() -> PlainClientBuilder {
        PlainClientBuilder::default()
    }

    /// Client on the default curl transport.
    pub fn new(retry: impl RetryBehavior + 'static) -> Self {
        Self {
            transport: Arc::new(CurlTransport::default()),
            retry: Arc::new(retry),
            retry_transport_errors: false,
        }
    }
}

impl HttpClient for PlainClient {
    fn request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        url_model::parse_url(url)?;

        let mut request = HttpRequest::new(method, url).with_body(payload);
        for (name, value) in headers {
            request.set_header(name.as_str(), value.as_str());
        }

        let ctx = RetryContext {
            behavior: self.retry.as_ref(),
            classifier: TransientClassifier::Plain,
            retry_transport_errors: self.retry_transport_errors,
        };
        run_with_retry(ctx, |_| Ok(self.transport.send(&request)?))
    }
}

/// Builder for [`PlainClient`]. A retry behavior is required.
#[derive(Default)]
pub struct PlainClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    retry: Option<Arc<dyn RetryBehavior>>,
    retry_transport_errors: bool,
}

impl PlainClientBuilder {
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn retry_policy(mut self, retry: impl RetryBehavior + 'static) -> Self {
        self.retry = Some(Arc::new(retry));
        self
    }

    /// Offer transport failures to the retry behavior instead of failing at once.
    pub fn retry_transport_errors(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    pub fn build(self) -> Result<PlainClient, ClientError> {
        let retry = self.retry.ok_or(ClientError::MissingRetryPolicy)?;
        Ok(PlainClient {
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(CurlTransport::default())),
            retry,
            retry_transport_errors: self.retry_transport_errors,
        })
    }
}
