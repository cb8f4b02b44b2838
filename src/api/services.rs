use axum::{Json, extract::State, http::HeaderMap, http::header, response::IntoResponse};
use tracing::{error, info, warn};

use super::{
    error::ApiError,
    models::{DownloadResponse, HealthResponse},
    state::AppState,
    utils::{parse_content_type, read_body},
    validation::extract_urls,
};

/// Batch download endpoint (POST /download)
///
/// Validates the body, fetches every URL with bounded concurrency and
/// answers once all of them have finished. The batch keeps running if the
/// client goes away before the response is sent. Per-URL failures are reported
/// inside `results`; only a malformed request yields an error status.
pub async fn download_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<Json<DownloadResponse>, ApiError> {
    let urls = match parse_request(&state, &headers, body).await {
        Ok(urls) => urls,
        Err(err) => {
            warn!(error = %err, "Rejected download request");
            state.metrics.batch_rejected();
            return Err(err);
        }
    };

    info!(count = urls.len(), "Received download request");

    let results = state.downloader.download_all(urls).await.map_err(|err| {
        error!(error = %err, "Download batch aborted");
        ApiError::Internal(err.to_string())
    })?;
    state.metrics.batch_completed(&results);

    info!(
        count = results.len(),
        failed = results.iter().filter(|r| !r.is_success()).count(),
        "Download request finished"
    );

    Ok(Json(DownloadResponse { results }))
}

async fn parse_request(
    state: &AppState,
    headers: &HeaderMap,
    body: axum::body::Body,
) -> Result<Vec<String>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::UnsupportedMediaType("missing Content-Type header".into()))?;
    parse_content_type(content_type)?;

    let max_size = state.config.server.max_payload_bytes.as_usize();
    let body = read_body(body, max_size).await?;

    Ok(extract_urls(&body)?)
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        downloads_dir: state.downloader.dir().root().display().to_string(),
        max_concurrency: state.downloader.max_concurrency(),
        metrics: state.metrics.snapshot(),
    })
}
