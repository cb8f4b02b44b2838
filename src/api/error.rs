use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use super::validation::UrlListError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please provide a list of URLs under \"urls\"")]
    InvalidUrls,
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("payload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidUrls | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UrlListError> for ApiError {
    fn from(value: UrlListError) -> Self {
        match value {
            UrlListError::MalformedJson(err) => ApiError::InvalidJson(err.to_string()),
            UrlListError::MissingUrls => ApiError::InvalidUrls,
        }
    }
}
