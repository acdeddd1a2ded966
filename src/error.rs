//! Error types shared by the extractor, exporter and fetcher

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Selector rejected by the CSS engine
    #[error("invalid selector '{selector}': {message}")]
    Query { selector: String, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Fetch failed before a document could be parsed
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
