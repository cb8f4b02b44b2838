//! API utility functions
//!
//! Pure helpers for request processing, kept out of `services.rs` so they
//! can be unit tested.

use axum::body::{Body, Bytes};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;

/// Accepts `application/json` and `application/*+json`, with or without parameters
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type
        .parse()
        .map_err(|_| ApiError::UnsupportedMediaType(content_type.to_string()))?;

    let is_json = media_type.type_() == mime::APPLICATION
        && (media_type.subtype() == mime::JSON || media_type.suffix() == Some(mime::JSON));

    if !is_json {
        return Err(ApiError::UnsupportedMediaType(
            media_type.essence_str().to_string(),
        ));
    }

    Ok(media_type)
}

/// Buffer the whole body, failing once it grows past `max_size` bytes
pub async fn read_body(body: Body, max_size: usize) -> Result<Bytes, ApiError> {
    let collected = Limited::new(body, max_size).collect().await.map_err(|err| {
        if err.downcast_ref::<LengthLimitError>().is_some() {
            ApiError::PayloadTooLarge(max_size)
        } else {
            ApiError::Internal(err.to_string())
        }
    })?;

    Ok(collected.to_bytes())
}
