//! URL and input validation utilities

use url::Url;

use crate::error::{ClientError, Result};

/// True when `url` parses and uses http or https.
pub fn validate_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Checks raw form input the way the download form does: trimmed, non-empty, http(s).
pub fn check_input(raw: &str) -> Result<String> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ClientError::Validation("Please enter a video URL".into()));
    }
    if !validate_url(url) {
        return Err(ClientError::Validation("Please enter a valid URL".into()));
    }
    Ok(url.to_string())
}
