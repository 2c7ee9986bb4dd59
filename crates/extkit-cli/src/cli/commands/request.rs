//! `extkit request` – send one request through a retrying client.

use std::collections::HashMap;

use anyhow::{Context, Result};
use extkit_core::client::{AuthenticatedClient, HttpClient, PlainClient};
use extkit_core::config::ExtkitConfig;
use extkit_core::identity::ManagedIdentityProvider;
use extkit_core::metadata::MetadataProvider;
use extkit_core::transport::Method;

use super::{lookup_client, transport};

#[derive(Debug, Clone)]
pub struct RequestArgs {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub data: Option<String>,
    pub managed_identity: bool,
    pub scope_to_vm: bool,
}

pub fn run_request(cfg: &ExtkitConfig, args: &RequestArgs) -> Result<()> {
    let client = build_client(cfg, args)?;
    let payload = args.data.as_deref().map(str::as_bytes);
    let response = client
        .request(args.method, &args.url, &args.headers, payload)
        .with_context(|| format!("{} {}", args.method, args.url))?;

    eprintln!("HTTP {}", response.status);
    println!("{}", response.body_text());
    Ok(())
}

fn build_client(cfg: &ExtkitConfig, args: &RequestArgs) -> Result<Box<dyn HttpClient>> {
    let retry = cfg.retry_config();
    if !args.managed_identity {
        let client = PlainClient::builder()
            .transport(transport(cfg))
            .retry_policy(retry.to_policy())
            .retry_transport_errors(retry.retry_transport_errors)
            .build()?;
        return Ok(Box::new(client));
    }

    let provider = ManagedIdentityProvider::from_config(lookup_client(cfg)?, &cfg.identity);
    let mut builder = AuthenticatedClient::builder()
        .transport(transport(cfg))
        .credential_provider(provider)
        .retry_policy(retry.to_policy())
        .retry_transport_errors(retry.retry_transport_errors);
    if args.scope_to_vm {
        let metadata = MetadataProvider::new(lookup_client(cfg)?)
            .fetch()
            .context("fetching instance metadata for vmResourceId")?;
        builder = builder.resource_identity(metadata.resource_identity());
    }
    let client = builder.build()?;
    if let Some(identity) = client.resource_identity() {
        tracing::info!("requests scoped to {}", identity);
    }
    Ok(Box::new(client))
}
