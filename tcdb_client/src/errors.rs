//! Error types for the HTTP session.

use std::path::PathBuf;

/// Errors that can occur while building the session or fetching a page.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The cookie file could not be read.
    #[error("failed to read cookie file {path}")]
    CookieFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The cookie value contains bytes that are not legal in a header.
    #[error("cookie value is not a valid header value")]
    InvalidCookie,
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// A request failed before a status was received (network error, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The site answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },
    /// The URL could not be parsed.
    #[error("invalid url {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
