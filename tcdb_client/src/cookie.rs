//! Cookie file loading.
//!
//! Users paste the cookie from browser devtools or a curl command, so the file
//! may hold the bare header value, a `Cookie:` header line, a quoted string or
//! a `cookie=` assignment. All of these reduce to the bare value.

use std::path::Path;

use crate::Error;

/// Reads and normalizes a cookie file. A missing path or an empty file yields
/// an empty string.
pub fn read_cookie_file(path: Option<&Path>) -> Result<String, Error> {
    let Some(path) = path else {
        return Ok(String::new());
    };
    let text = std::fs::read_to_string(path).map_err(|source| Error::CookieFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize_cookie(&text))
}

/// Reduces any accepted cookie notation to the bare header value.
pub fn normalize_cookie(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    let text = text.replace("Cookie:", "");
    let text = text.trim().trim_matches(|c| c == '\'' || c == '"');
    if text.to_ascii_lowercase().starts_with("cookie=") {
        return text
            .split_once('=')
            .map(|(_, value)| value.trim().to_string())
            .unwrap_or_default();
    }
    text.to_string()
}
