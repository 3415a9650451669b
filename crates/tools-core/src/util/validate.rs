//! URL validation for capture requests

use url::Url;

use crate::error::{CaptureError, CaptureResult};

/// Schemes the browser is allowed to open
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "file"];

/// Parses and checks a URL before it is handed to the browser
///
/// The URL must be absolute, use one of [`ALLOWED_SCHEMES`], and for http(s)
/// carry a host. Returns the normalized URL string.
///
/// # Examples
///
/// ```
/// use tools_core::util::validate::validate_url;
///
/// assert_eq!(validate_url("https://example.com").unwrap(), "https://example.com/");
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(raw: &str) -> CaptureResult<String> {
    let trimmed = raw.trim();
    let invalid = |reason: String| CaptureError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    if matches!(url.scheme(), "http" | "https") && url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url.to_string())
}
