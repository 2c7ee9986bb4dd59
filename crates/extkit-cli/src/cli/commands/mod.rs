//! CLI command handlers, one per file.

mod metadata;
mod request;
mod token;

pub use metadata::run_metadata;
pub use request::{run_request, RequestArgs};
pub use token::{run_token, TokenArgs};

use anyhow::Result;
use extkit_core::client::PlainClient;
use extkit_core::config::ExtkitConfig;
use extkit_core::retry::RetryPolicy;
use extkit_core::transport::CurlTransport;

pub(crate) fn transport(cfg: &ExtkitConfig) -> CurlTransport {
    CurlTransport::new(cfg.transport.curl_options())
}

/// Client for identity and metadata lookups: one attempt, errors surface as-is.
pub(crate) fn lookup_client(cfg: &ExtkitConfig) -> Result<PlainClient> {
    Ok(PlainClient::builder()
        .transport(transport(cfg))
        .retry_policy(RetryPolicy::Never)
        .build()?)
}
