//! Wire types for the download API.
//!
//! ```json
//! POST /download
//! { "urls": ["https://example.com/report.pdf", "https://example.com/avatar"] }
//!
//! 200 OK
//! {
//!   "results": [
//!     { "url": "https://example.com/report.pdf", "status": "success",
//!       "filename": "report.pdf", "saved_path": "/srv/downloads/report.pdf" },
//!     { "url": "https://example.com/avatar", "status": "error",
//!       "error": "HTTP 404: Not Found" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::downloader::DownloadResult;
use crate::observability::MetricsSnapshot;

/// Result Set for one request, one entry per submitted URL in submission order
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DownloadResponse {
    pub results: Vec<DownloadResult>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub downloads_dir: String,
    pub max_concurrency: usize,
    pub metrics: MetricsSnapshot,
}
