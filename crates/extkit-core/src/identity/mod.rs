//! Bearer credentials from the managed-identity endpoint.
//!
//! [`ManagedIdentityProvider`] issues one GET per `fetch()`; the
//! authenticated client owns the resulting [`Credential`] and decides when to
//! fetch again.

mod credential;
mod provider;

pub use credential::{Credential, EXPIRY_SKEW};
pub use provider::{
    resolve_endpoint, CredentialProvider, ManagedIdentityProvider, DEFAULT_API_VERSION,
    DEFAULT_IDENTITY_ENDPOINT, DEFAULT_RESOURCE, IDENTITY_ENDPOINT_ENV,
};

use crate::error::ClientError;

/// Failure to obtain a credential.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("identity endpoint request failed")]
    Request(#[source] Box<ClientError>),

    #[error("unable to get token, identity endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unable to deserialize identity endpoint response")]
    Parse(#[source] serde_json::Error),

    #[error("token expiry {0:?} is not seconds since the epoch")]
    Expiry(String),

    #[error("client_id and object_id are mutually exclusive")]
    ConflictingSelectors,

    #[error("invalid identity endpoint {url:?}")]
    Endpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
