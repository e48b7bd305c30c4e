//! Error types for the sync pipeline.

use std::path::PathBuf;

/// Errors that abort a sync run.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// A listing page could not be fetched after retries.
    #[error("failed to fetch inventory page {page}: {source}")]
    Fetch {
        page: usize,
        #[source]
        source: tcdb_client::Error,
    },
    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The payload could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
