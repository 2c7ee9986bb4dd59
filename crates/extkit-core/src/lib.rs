//! Identity-aware, retrying HTTP client for VM extension handlers.
//!
//! [`client::AuthenticatedClient`] attaches a managed-identity bearer token,
//! refreshes it when stale or rejected, and retries transient failures as the
//! configured [`retry::RetryBehavior`] decides. [`client::PlainClient`] does the
//! same without credentials.

pub mod config;
pub mod logging;

pub mod client;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod retry;
pub mod transport;
pub mod url_model;

#[cfg(test)]
mod testing;

pub use client::{AuthenticatedClient, HttpClient, PlainClient};
pub use error::ClientError;
