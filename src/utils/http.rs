// src/utils/http.rs

//! HTTP client utilities.

use url::Url;

use crate::error::Result;
use crate::models::HandlerSettings;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(settings: &HandlerSettings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(settings.crm_timeout())
        .build()?;
    Ok(client)
}

/// Resolve `path` against `base` with RFC 3986 reference resolution.
///
/// An absolute `path` replaces the base path; a relative one is appended to
/// the base directory.
pub fn join_url(base: &str, path: &str) -> Result<Url> {
    Ok(Url::parse(base)?.join(path)?)
}
