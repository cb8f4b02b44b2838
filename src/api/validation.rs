use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UrlListError {
    #[error("body is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("urls must be a non-empty list")]
    MissingUrls,
}

/// Pull the `urls` list out of a request body.
///
/// The body must be a JSON object whose `urls` member is a non-empty array.
/// Entries are not checked here: strings pass through as-is and any other
/// value is forwarded as its JSON text, failing later as an invalid URL.
pub fn extract_urls(body: &[u8]) -> Result<Vec<String>, UrlListError> {
    let value: Value = serde_json::from_slice(body)?;

    let Some(Value::Array(entries)) = value.get("urls") else {
        return Err(UrlListError::MissingUrls);
    };
    if entries.is_empty() {
        return Err(UrlListError::MissingUrls);
    }

    Ok(entries
        .iter()
        .map(|entry| match entry {
            Value::String(url) => url.clone(),
            other => other.to_string(),
        })
        .collect())
}
