//! `extkit token` – fetch a managed-identity credential.

use anyhow::{Context, Result};
use extkit_core::config::ExtkitConfig;
use extkit_core::identity::{Credential, CredentialProvider, ManagedIdentityProvider};

use super::lookup_client;

#[derive(Debug, Clone, Default)]
pub struct TokenArgs {
    pub resource: Option<String>,
    pub client_id: Option<String>,
    pub object_id: Option<String>,
    pub json: bool,
    pub show_token: bool,
}

pub fn run_token(cfg: &ExtkitConfig, args: &TokenArgs) -> Result<()> {
    let mut identity = cfg.identity.clone();
    if let Some(resource) = &args.resource {
        identity.resource = resource.clone();
    }
    // A selector on the command line replaces whichever one is configured.
    if args.client_id.is_some() || args.object_id.is_some() {
        identity.client_id = args.client_id.clone();
        identity.object_id = args.object_id.clone();
    }

    let provider = ManagedIdentityProvider::from_config(lookup_client(cfg)?, &identity);
    tracing::debug!("fetching token from {}", provider.endpoint());
    let credential = provider.fetch().context("fetching managed identity token")?;
    println!("{}", render(credential, args)?);
    Ok(())
}

fn render(mut credential: Credential, args: &TokenArgs) -> Result<String> {
    if !args.show_token {
        credential.access_token.clear();
    }
    if args.json {
        return Ok(credential.to_json()?);
    }
    let mut out = format!(
        "token_type: {}\nresource:   {}\nexpires_on: {}\nclient_id:  {}",
        credential.token_type, credential.resource, credential.expires_on, credential.client_id
    );
    if args.show_token {
        out.push_str(&format!("\naccess_token: {}", credential.access_token));
    }
    Ok(out)
}
