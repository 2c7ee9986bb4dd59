//! Client that authenticates with a managed-identity bearer token.
//!
//! Per request:
//! 1. append `vmResourceId` when a [`ResourceIdentity`] is configured;
//! 2. reuse the cached credential unless it is stale, else fetch a new one;
//! 3. send with `Authorization: Bearer <token>`, caller headers overlaid;
//! 4. on a transient status, ask the retry behavior; on 401 force a refresh
//!    first so the resend carries the new token.
//!
//! The cache is a mutex-guarded `Arc<Credential>`. Holding the lock across
//! the fetch makes refresh single-flight: concurrent callers that find the
//! credential stale wait for one fetch instead of issuing their own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::HttpClient;
use crate::error::ClientError;
use crate::identity::{Credential, CredentialProvider};
use crate::metadata::ResourceIdentity;
use crate::retry::{
    run_with_retry, AttemptOutcome, RequestAttempt, RetryBehavior, RetryContext,
    TransientClassifier,
};
use crate::transport::{CurlTransport, HttpRequest, HttpResponse, Method, Transport};
use crate::url_model::{self, VM_RESOURCE_ID_PARAM};

const UNAUTHORIZED: u16 = 401;

pub struct AuthenticatedClient {
    transport: Arc<dyn Transport>,
    provider: Arc<dyn CredentialProvider>,
    retry: Arc<dyn RetryBehavior>,
    resource_identity: Option<ResourceIdentity>,
    retry_transport_errors: bool,
    credential: Mutex<Option<Arc<Credential>>>,
}

impl AuthenticatedClient {
    pub fn builder() -> AuthenticatedClientBuilder {
        AuthenticatedClientBuilder::default()
    }

    pub fn resource_identity(&self) -> Option<&ResourceIdentity> {
        self.resource_identity.as_ref()
    }

    /// Currently cached credential, if any. Does not fetch.
    pub fn cached_credential(&self) -> Option<Arc<Credential>> {
        self.lock_credential().clone()
    }

    fn lock_credential(&self) -> MutexGuard<'_, Option<Arc<Credential>>> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached credential if still fresh, otherwise a newly fetched one.
    fn current_credential(&self) -> Result<Arc<Credential>, ClientError> {
        let mut slot = self.lock_credential();
        if let Some(cached) = slot.as_ref() {
            if !cached.is_expired() {
                return Ok(Arc::clone(cached));
            }
            tracing::debug!("cached credential is stale, refreshing");
        }
        let fresh = Arc::new(self.provider.fetch()?);
        *slot = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    /// Replaces a credential the server rejected. If another caller already
    /// swapped in a different, fresh credential, that one is reused.
    fn refresh_rejected(&self, rejected: &Credential) -> Result<Arc<Credential>, ClientError> {
        let mut slot = self.lock_credential();
        if let Some(cached) = slot.as_ref() {
            if cached.access_token != rejected.access_token && !cached.is_expired() {
                return Ok(Arc::clone(cached));
            }
        }
        tracing::warn!("credential rejected with HTTP 401, fetching a new one");
        let fresh = Arc::new(self.provider.fetch()?);
        *slot = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    fn target_url(&self, url: &str) -> Result<String, ClientError> {
        match &self.resource_identity {
            Some(identity) => url_model::append_query_param(
                url,
                VM_RESOURCE_ID_PARAM,
                &identity.resource_id(),
            ),
            None => {
                url_model::parse_url(url)?;
                Ok(url.to_string())
            }
        }
    }

    fn build_request(
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
        credential: &Credential,
    ) -> HttpRequest {
        let mut request = HttpRequest::new(method, url).with_body(payload);
        request.set_header("Authorization", credential.bearer_header());
        // Caller headers win, including an explicit Authorization.
        for (name, value) in headers {
            request.set_header(name.as_str(), value.as_str());
        }
        request
    }
}

impl HttpClient for AuthenticatedClient {
    fn request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        let url = self.target_url(url)?;
        let mut credential = self.current_credential()?;

        let ctx = RetryContext {
            behavior: self.retry.as_ref(),
            classifier: TransientClassifier::Authenticated,
            retry_transport_errors: self.retry_transport_errors,
        };
        run_with_retry(ctx, |previous: Option<&RequestAttempt>| {
            if let Some(attempt) = previous {
                credential = if attempt.outcome == AttemptOutcome::Status(UNAUTHORIZED) {
                    self.refresh_rejected(&credential)?
                } else {
                    self.current_credential()?
                };
            }
            let request = Self::build_request(method, &url, headers, payload, &credential);
            Ok(self.transport.send(&request)?)
        })
    }
}

/// Builder for [`AuthenticatedClient`]. A retry behavior and a credential
/// provider are required; the transport defaults to [`CurlTransport`].
#[derive(Default)]
pub struct AuthenticatedClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    provider: Option<Arc<dyn CredentialProvider>>,
    retry: Option<Arc<dyn RetryBehavior>>,
    resource_identity: Option<ResourceIdentity>,
    retry_transport_errors: bool,
}

impl AuthenticatedClientBuilder {
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn credential_provider(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    pub fn retry_policy(mut self, retry: impl RetryBehavior + 'static) -> Self {
        self.retry = Some(Arc::new(retry));
        self
    }

    /// Scope every request to this VM via the `vmResourceId` query parameter.
    pub fn resource_identity(mut self, identity: ResourceIdentity) -> Self {
        self.resource_identity = Some(identity);
        self
    }

    /// Offer transport failures to the retry behavior instead of failing at once.
    pub fn retry_transport_errors(mut self, enabled: bool) -> Self {
        self.retry_transport_errors = enabled;
        self
    }

    pub fn build(self) -> Result<AuthenticatedClient, ClientError> {
        let retry = self.retry.ok_or(ClientError::MissingRetryPolicy)?;
        let provider = self.provider.ok_or(ClientError::MissingCredentialProvider)?;
        Ok(AuthenticatedClient {
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(CurlTransport::default())),
            provider,
            retry,
            resource_identity: self.resource_identity,
            retry_transport_errors: self.retry_transport_errors,
            credential: Mutex::new(None),
        })
    }
}
