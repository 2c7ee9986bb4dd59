//! libcurl-backed transport.
//!
//! One `Easy` handle per send. The response body is collected inside the
//! transfer, so it is drained and released exactly once per attempt.

use super::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use std::path::PathBuf;
use std::time::Duration;

/// Options applied to every transfer.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Upper bound on a whole transfer.
    pub timeout: Duration,
    /// PEM client certificate for certificate-authenticated endpoints.
    pub client_cert: Option<PathBuf>,
    /// PEM private key matching `client_cert`.
    pub client_key: Option<PathBuf>,
    /// When false, server certificates are not verified.
    pub verify_peer: bool,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
            client_cert: None,
            client_key: None,
            verify_peer: true,
        }
    }
}

/// Blocking transport built on the curl crate.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CurlOptions {
        &self.options
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        match request.method {
            Method::Get => easy.get(true)?,
            Method::Post => easy.post(true)?,
            Method::Put | Method::Delete => easy.custom_request(request.method.as_str())?,
        }
        match &request.body {
            Some(payload) => easy.post_fields_copy(payload)?,
            // libcurl would otherwise wait on a read callback for the POST body.
            None if request.method == Method::Post => easy.post_fields_copy(&[])?,
            None => {}
        }

        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;
        easy.ssl_verify_peer(self.options.verify_peer)?;
        easy.ssl_verify_host(self.options.verify_peer)?;
        if let Some(cert) = &self.options.client_cert {
            easy.ssl_cert(cert)?;
        }
        if let Some(key) = &self.options.client_key {
            easy.ssl_key(key)?;
        }

        let lines = header_lines(request);
        if !lines.is_empty() {
            let mut list = curl::easy::List::new();
            for line in &lines {
                list.append(line)?;
            }
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        tracing::debug!("{} {} -> HTTP {}", request.method, request.url, code);
        Ok(HttpResponse {
            status: code as u16,
            body,
        })
    }
}

/// libcurl line for each header. `Name;` sends an empty value, since
/// `Name:` would remove the header instead. A body sent without a caller
/// `Content-Type` gets none, rather than libcurl's form-urlencoded default.
fn header_lines(request: &HttpRequest) -> Vec<String> {
    let mut lines: Vec<String> = request
        .headers
        .iter()
        .map(|(k, v)| {
            let (k, v) = (k.trim(), v.trim());
            if v.is_empty() {
                format!("{k};")
            } else {
                format!("{k}: {v}")
            }
        })
        .collect();
    if request.body.is_some() && request.header("Content-Type").is_none() {
        lines.push("Content-Type:".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_verify_peer() {
        let t = CurlTransport::default();
        assert!(t.options().verify_peer);
        assert!(t.options().client_cert.is_none());
        assert_eq!(t.options().connect_timeout, Duration::from_secs(15));
    }

    #[test]
    fn header_lines_keep_empty_values() {
        let mut req = HttpRequest::new(Method::Get, "http://example.com/");
        req.set_header("X-Empty", "  ");
        req.set_header("Accept", "application/json");
        assert_eq!(header_lines(&req), vec!["X-Empty;", "Accept: application/json"]);
    }

    #[test]
    fn body_without_content_type_clears_default() {
        let req = HttpRequest::new(Method::Put, "http://example.com/").with_body(Some(&b"x"[..]));
        assert_eq!(header_lines(&req), vec!["Content-Type:"]);

        let mut req = req;
        req.set_header("content-type", "text/plain");
        assert_eq!(header_lines(&req), vec!["content-type: text/plain"]);

        let req = HttpRequest::new(Method::Delete, "http://example.com/");
        assert!(header_lines(&req).is_empty());
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let t = CurlTransport::new(CurlOptions {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(2),
            ..CurlOptions::default()
        });
        // Port 1 on loopback is essentially never listening.
        let req = HttpRequest::new(Method::Get, "http://127.0.0.1:1/");
        assert!(t.send(&req).is_err());
    }
}
