//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs with query strings.

use crate::shared::transport::FetchError;
use serde::Serialize;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
#[cfg(target_arch = "wasm32")]
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Join a base URL and an API path
///
/// # Example
/// ```rust
/// use frontend::shared::api_utils::api_url;
/// assert_eq!(api_url("http://h:3000/", "/api/a025"), "http://h:3000/api/a025");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Append `query` serialized as a query string to `url`
///
/// Fields serialized as `None` are left out entirely.
pub fn with_query<Q: Serialize>(url: &str, query: &Q) -> Result<String, FetchError> {
    let query_string =
        serde_qs::to_string(query).map_err(|e| FetchError::InvalidRequest(e.to_string()))?;
    if query_string.is_empty() {
        return Ok(url.to_string());
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}", url, separator, query_string))
}
