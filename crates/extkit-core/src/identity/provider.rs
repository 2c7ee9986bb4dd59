//! Managed-identity token acquisition.

use std::collections::HashMap;

use url::Url;

use super::{Credential, CredentialError};
use crate::client::HttpClient;
use crate::config::IdentityConfig;

/// Environment variable that overrides the identity endpoint.
pub const IDENTITY_ENDPOINT_ENV: &str = "IDENTITY_ENDPOINT";
/// Well-known token endpoint on the link-local metadata address.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
pub const DEFAULT_API_VERSION: &str = "2018-02-01";
/// Audience requested when the caller does not name one.
pub const DEFAULT_RESOURCE: &str = "https://management.core.windows.net/";

/// Fetches a fresh bearer credential. Implementations do not retry; the
/// caller decides whether and when to ask again.
pub trait CredentialProvider: Send + Sync {
    fn fetch(&self) -> Result<Credential, CredentialError>;
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for std::sync::Arc<T> {
    fn fetch(&self) -> Result<Credential, CredentialError> {
        (**self).fetch()
    }
}

/// Picks the identity endpoint: environment override, then configured value,
/// then the well-known default. Blank values are ignored.
pub fn resolve_endpoint(env_value: Option<String>, configured: Option<&str>) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_IDENTITY_ENDPOINT.to_string())
}

/// Requests tokens from the instance identity endpoint.
///
/// Optionally scoped to a user-assigned identity by client id or object id;
/// the two selectors are mutually exclusive.
#[derive(Debug, Clone)]
pub struct ManagedIdentityProvider<C> {
    client: C,
    endpoint: String,
    api_version: String,
    resource: String,
    client_id: Option<String>,
    object_id: Option<String>,
}

impl<C: HttpClient> ManagedIdentityProvider<C> {
    /// Provider for the default audience. Reads [`IDENTITY_ENDPOINT_ENV`] now.
    pub fn new(client: C) -> Self {
        Self {
            client,
            endpoint: resolve_endpoint(std::env::var(IDENTITY_ENDPOINT_ENV).ok(), None),
            api_version: DEFAULT_API_VERSION.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            client_id: None,
            object_id: None,
        }
    }

    /// Provider configured from the `[identity]` config section.
    pub fn from_config(client: C, cfg: &IdentityConfig) -> Self {
        Self {
            client,
            endpoint: resolve_endpoint(
                std::env::var(IDENTITY_ENDPOINT_ENV).ok(),
                cfg.endpoint.as_deref(),
            ),
            api_version: cfg.api_version.clone(),
            resource: cfg.resource.clone(),
            client_id: cfg.client_id.clone(),
            object_id: cfg.object_id.clone(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Audience the token is issued for (e.g. a storage or key vault URL).
    pub fn for_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full token request URL.
    pub fn token_url(&self) -> Result<String, CredentialError> {
        if self.client_id.is_some() && self.object_id.is_some() {
            return Err(CredentialError::ConflictingSelectors);
        }
        let mut url = Url::parse(&self.endpoint).map_err(|source| CredentialError::Endpoint {
            url: self.endpoint.clone(),
            source,
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", &self.api_version);
            query.append_pair("resource", &self.resource);
            if let Some(id) = &self.client_id {
                query.append_pair("client_id", id);
            }
            if let Some(id) = &self.object_id {
                query.append_pair("object_id", id);
            }
        }
        Ok(url.into())
    }
}

impl<C: HttpClient> CredentialProvider for ManagedIdentityProvider<C> {
    fn fetch(&self) -> Result<Credential, CredentialError> {
        let url = self.token_url()?;
        let headers = HashMap::from([("Metadata".to_string(), "true".to_string())]);

        tracing::debug!("requesting managed identity token for {}", self.resource);
        let response = self
            .client
            .get(&url, &headers)
            .map_err(|e| CredentialError::Request(Box::new(e)))?;

        if response.status != 200 {
            return Err(CredentialError::Status {
                status: response.status,
                body: response.body_text(),
            });
        }

        let credential: Credential =
            serde_json::from_slice(&response.body).map_err(CredentialError::Parse)?;
        // Reject documents whose expiry could never be checked.
        credential.expires_at()?;
        Ok(credential)
    }
}
