//! Client error type.
//!
//! Only failures to obtain a response are errors. A response with a non-2xx
//! status is returned to the caller as data.

use crate::identity::CredentialError;
use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or no status was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A bearer credential could not be obtained.
    #[error("credential unavailable: {0}")]
    Credential(#[from] CredentialError),

    /// The caller-supplied URL could not be parsed. Never retried.
    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A lookup endpoint answered with something other than 200.
    #[error("unexpected HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// A JSON response body did not have the expected shape.
    #[error("could not parse response body")]
    ResponseParse(#[source] serde_json::Error),

    #[error("a retry policy must be specified")]
    MissingRetryPolicy,

    #[error("a credential provider must be specified")]
    MissingCredentialProvider,
}
