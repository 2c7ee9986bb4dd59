//! CLI for the extkit identity-aware HTTP client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use extkit_core::config;
use extkit_core::transport::Method;

use commands::{run_metadata, run_request, run_token, RequestArgs, TokenArgs};

/// Top-level CLI for extkit.
#[derive(Debug, Parser)]
#[command(name = "extkit")]
#[command(about = "extkit: retrying HTTP client with managed-identity credentials", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a managed-identity token and print its details.
    Token {
        /// Audience to request the token for (defaults to the configured resource).
        #[arg(long)]
        resource: Option<String>,

        /// Use the user-assigned identity with this client id.
        #[arg(long, conflicts_with = "object_id")]
        client_id: Option<String>,

        /// Use the user-assigned identity with this object id.
        #[arg(long)]
        object_id: Option<String>,

        /// Print the whole token document as JSON.
        #[arg(long)]
        json: bool,

        /// Include the access token itself in the output.
        #[arg(long)]
        show_token: bool,
    },

    /// Show instance metadata of this VM.
    Metadata {
        /// Print the whole metadata document as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Send one HTTP request with the configured retry policy.
    Request {
        #[arg(value_enum)]
        method: HttpMethod,

        url: String,

        /// Request header, e.g. -H 'Content-Type: application/json'. Repeatable.
        #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Request body.
        #[arg(long)]
        data: Option<String>,

        /// Authenticate with a managed-identity bearer token.
        #[arg(long)]
        managed_identity: bool,

        /// Append this VM's resource id as the `vmResourceId` query parameter.
        #[arg(long, requires = "managed_identity")]
        scope_to_vm: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => Method::Get,
            HttpMethod::Post => Method::Post,
            HttpMethod::Put => Method::Put,
            HttpMethod::Delete => Method::Delete,
        }
    }
}

/// Parses `Name: value`. The value may be empty; the name may not.
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Token {
                resource,
                client_id,
                object_id,
                json,
                show_token,
            } => run_token(
                &cfg,
                &TokenArgs {
                    resource,
                    client_id,
                    object_id,
                    json,
                    show_token,
                },
            )?,
            CliCommand::Metadata { json } => run_metadata(&cfg, json)?,
            CliCommand::Request {
                method,
                url,
                headers,
                data,
                managed_identity,
                scope_to_vm,
            } => run_request(
                &cfg,
                &RequestArgs {
                    method: method.into(),
                    url,
                    headers: headers.into_iter().collect(),
                    data,
                    managed_identity,
                    scope_to_vm,
                },
            )?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
