//! Scripted doubles for unit tests: each replays queued results and records
//! what it was asked to do.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::HttpClient;
use crate::error::ClientError;
use crate::identity::{Credential, CredentialError, CredentialProvider};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// Transport that replays responses in order; 500 once the script runs out.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            requests: Arc::default(),
        }
    }

    pub(crate) fn statuses(codes: &[u16]) -> Self {
        Self::new(
            codes
                .iter()
                .map(|&code| Ok(HttpResponse::new(code, format!("status {code}"))))
                .collect(),
        )
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(500, "script exhausted")))
    }
}

/// One call made through [`ScriptedClient`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
}

/// `HttpClient` replaying canned results, for the identity and metadata providers.
#[derive(Clone, Default)]
pub(crate) struct ScriptedClient {
    script: Arc<Mutex<VecDeque<Result<HttpResponse, ClientError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedClient {
    pub(crate) fn new(script: Vec<Result<HttpResponse, ClientError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpClient for ScriptedClient {
    fn request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        _payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            headers: headers.clone(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into()).into()))
    }
}

/// Provider that hands out `token-1`, `token-2`, ... each valid for an hour,
/// or fails with `Status { 503 }` once `fail_after` fetches have succeeded.
#[derive(Clone, Default)]
pub(crate) struct ScriptedProvider {
    fetches: Arc<AtomicUsize>,
    fail_after: Option<usize>,
    lifetime_secs: Option<u64>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_after(successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::default()
        }
    }

    /// Issue credentials that are already inside the expiry skew window.
    pub(crate) fn already_stale() -> Self {
        Self {
            lifetime_secs: Some(30),
            ..Self::default()
        }
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl CredentialProvider for ScriptedProvider {
    fn fetch(&self) -> Result<Credential, CredentialError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if matches!(self.fail_after, Some(limit) if n > limit) {
            return Err(CredentialError::Status {
                status: 503,
                body: "identity endpoint unavailable".to_string(),
            });
        }
        Ok(credential(
            &format!("token-{n}"),
            self.lifetime_secs.unwrap_or(3600),
        ))
    }
}

/// Credential expiring `lifetime_secs` from now.
pub(crate) fn credential(token: &str, lifetime_secs: u64) -> Credential {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    Credential {
        access_token: token.to_string(),
        expires_on: (now + lifetime_secs).to_string(),
        token_type: "Bearer".to_string(),
        ..Credential::default()
    }
}
