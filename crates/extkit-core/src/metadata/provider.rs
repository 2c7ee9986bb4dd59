//! Instance metadata lookup.

use std::collections::HashMap;

use super::InstanceMetadata;
use crate::client::HttpClient;
use crate::error::ClientError;

/// Instance metadata endpoint on the link-local metadata address.
pub const METADATA_URL: &str = "http://169.254.169.254/metadata/instance?api-version=2017-08-01";

/// Reads the instance metadata document through an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct MetadataProvider<C> {
    client: C,
}

impl<C: HttpClient> MetadataProvider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// One GET with `Metadata: true`; non-200 and malformed bodies are errors.
    pub fn fetch(&self) -> Result<InstanceMetadata, ClientError> {
        let headers = HashMap::from([("Metadata".to_string(), "true".to_string())]);
        let response = self.client.get(METADATA_URL, &headers)?;
        if response.status != 200 {
            return Err(ClientError::UnexpectedStatus {
                status: response.status,
                body: response.body_text(),
            });
        }
        serde_json::from_slice(&response.body).map_err(ClientError::ResponseParse)
    }
}
