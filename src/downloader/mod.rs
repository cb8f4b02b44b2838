//! Download fan-out
//!
//! A [`Downloader`] turns one URL into exactly one [`DownloadResult`]:
//! fetch, name, write. Every failure along the way is folded into the
//! result, so a batch always yields one record per input URL.

pub mod http;
pub mod naming;
mod runner;

pub use http::{FetchError, Fetched, HttpClient, HttpConfig};
pub use runner::Downloader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{SavedFile, StorageError};

/// Any failure while downloading a single URL
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Download task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Outcome of one requested URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownloadResult {
    Success {
        url: String,
        filename: String,
        saved_path: String,
    },
    Error {
        url: String,
        error: String,
    },
}

impl DownloadResult {
    pub fn saved(url: impl Into<String>, file: &SavedFile) -> Self {
        Self::Success {
            url: url.into(),
            filename: file.filename.clone(),
            saved_path: file.path.to_string_lossy().into_owned(),
        }
    }

    pub fn failed(url: impl Into<String>, error: &DownloadError) -> Self {
        Self::Error {
            url: url.into(),
            error: error.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Error { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_success_wire_format() {
        let file = SavedFile {
            filename: "report.pdf".to_string(),
            path: PathBuf::from("/srv/downloads/report.pdf"),
            size: 3,
        };
        let result = DownloadResult::saved("https://example.com/report.pdf", &file);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "url": "https://example.com/report.pdf",
                "status": "success",
                "filename": "report.pdf",
                "saved_path": "/srv/downloads/report.pdf",
            })
        );
    }

    #[test]
    fn test_error_wire_format() {
        let err = DownloadError::from(FetchError::Status {
            code: 503,
            reason: "Service Unavailable".to_string(),
        });
        let result = DownloadResult::failed("https://example.com/x", &err);

        assert!(!result.is_success());
        assert_eq!(result.url(), "https://example.com/x");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "url": "https://example.com/x",
                "status": "error",
                "error": "HTTP 503: Service Unavailable",
            })
        );
    }
}
