//! Retrying HTTP clients.
//!
//! [`PlainClient`] retries transient statuses; [`AuthenticatedClient`] also
//! attaches a managed-identity bearer token and refreshes it when it expires
//! or the server rejects it. Both return non-2xx statuses as data.

mod authenticated;
mod plain;

pub use authenticated::{AuthenticatedClient, AuthenticatedClientBuilder};
pub use plain::{PlainClient, PlainClientBuilder};

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ClientError;
use crate::transport::{HttpResponse, Method};

/// Common request surface of the clients.
///
/// `headers` are applied as given (names unique). An empty payload is sent
/// exactly like an absent one.
pub trait HttpClient: Send + Sync {
    fn request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError>;

    fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<HttpResponse, ClientError> {
        self.request(Method::Get, url, headers, None)
    }

    fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        self.request(Method::Post, url, headers, payload)
    }

    fn put(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        self.request(Method::Put, url, headers, payload)
    }

    fn delete(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        self.request(Method::Delete, url, headers, payload)
    }
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        (**self).request(method, url, headers, payload)
    }
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        payload: Option<&[u8]>,
    ) -> Result<HttpResponse, ClientError> {
        (**self).request(method, url, headers, payload)
    }
}
