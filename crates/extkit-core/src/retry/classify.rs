//! Classify HTTP status codes for retry decisions.

/// High-level class of an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx; never retried.
    Success,
    /// 408, 429 and 5xx other than 501/505.
    Transient,
    /// 401; the bearer credential was rejected.
    Unauthorized,
    /// Anything else, including 501 and 505 (permanent protocol mismatch).
    Permanent,
}

/// Classify an HTTP status code.
pub fn classify_http_status(code: u16) -> StatusClass {
    match code {
        200..=299 => StatusClass::Success,
        401 => StatusClass::Unauthorized,
        408 | 429 => StatusClass::Transient,
        501 | 505 => StatusClass::Permanent,
        500..=599 => StatusClass::Transient,
        _ => StatusClass::Permanent,
    }
}

/// True for any 2xx status.
pub fn is_success_status(code: u16) -> bool {
    classify_http_status(code) == StatusClass::Success
}

/// Which statuses a client treats as worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientClassifier {
    /// Timeouts, throttling and retryable server errors.
    Plain,
    /// As `Plain`, plus 401 (the client can refresh its credential).
    Authenticated,
}

impl TransientClassifier {
    pub fn is_transient(&self, code: u16) -> bool {
        match classify_http_status(code) {
            StatusClass::Transient => true,
            StatusClass::Unauthorized => *self == TransientClassifier::Authenticated,
            StatusClass::Success | StatusClass::Permanent => false,
        }
    }
}
