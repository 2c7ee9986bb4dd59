use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::CredentialError;

/// A credential is treated as stale this long before its advertised expiry.
pub const EXPIRY_SKEW: Duration = Duration::from_secs(2 * 60);

/// Token document returned by the identity endpoint.
///
/// Every field is a string on the wire, including the numeric ones;
/// `expires_on` is seconds since the Unix epoch. Replaced wholesale on
/// refresh, never mutated in place.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub expires_in: String,
    #[serde(default)]
    pub expires_on: String,
    #[serde(default)]
    pub ext_expires_in: String,
    #[serde(default)]
    pub not_before: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub token_type: String,
}

impl Credential {
    /// Parsed `expires_on`.
    pub fn expires_at(&self) -> Result<SystemTime, CredentialError> {
        let secs: u64 = self
            .expires_on
            .trim()
            .parse()
            .map_err(|_| CredentialError::Expiry(self.expires_on.clone()))?;
        UNIX_EPOCH
            .checked_add(Duration::from_secs(secs))
            .ok_or_else(|| CredentialError::Expiry(self.expires_on.clone()))
    }

    /// True once `now` is within [`EXPIRY_SKEW`] of the expiry. A credential
    /// whose expiry cannot be parsed is always stale.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match self.expires_at() {
            Ok(expiry) => match expiry.checked_sub(EXPIRY_SKEW) {
                Some(refresh_at) => now >= refresh_at,
                None => true,
            },
            Err(_) => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// JSON form of the token document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("expires_on", &self.expires_on)
            .field("resource", &self.resource)
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}
