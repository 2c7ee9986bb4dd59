//! Transport-level failures (no HTTP status was obtained).

/// Coarse classification of a transport failure, used by retry behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection refused/reset, DNS, send/recv).
    Connection,
    /// Anything else (bad URL, TLS setup, local option errors).
    Other,
}

/// A send that failed before an HTTP status was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// libcurl reported an error.
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// A non-curl transport could not reach the server.
    #[error("connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::Curl(e) => classify_curl_error(e),
            TransportError::Connection(_) => TransportErrorKind::Connection,
        }
    }
}

fn classify_curl_error(e: &curl::Error) -> TransportErrorKind {
    if e.is_operation_timedout() {
        return TransportErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportErrorKind::Connection;
    }
    TransportErrorKind::Other
}
