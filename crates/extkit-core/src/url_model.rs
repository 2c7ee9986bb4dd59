//! URL modeling: validation and query augmentation.

use crate::error::ClientError;
use url::Url;

/// Query parameter carrying the VM's resource id on outbound requests.
pub const VM_RESOURCE_ID_PARAM: &str = "vmResourceId";

/// Parses `raw`, mapping failures to [`ClientError::InvalidUrl`].
pub fn parse_url(raw: &str) -> Result<Url, ClientError> {
    Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Appends `name=value` (form-encoded) to the query of `raw`, keeping any
/// existing parameters.
///
/// # Examples
///
/// - `append_query_param("http://host/path?a=1", "b", "x/y")` → `"http://host/path?a=1&b=x%2Fy"`
pub fn append_query_param(raw: &str, name: &str, value: &str) -> Result<String, ClientError> {
    let mut url = parse_url(raw)?;
    url.query_pairs_mut().append_pair(name, value);
    Ok(url.into())
}
