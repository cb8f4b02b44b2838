use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("downloads.max_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: &'static str },

    #[error("downloads.dir must not be empty")]
    EmptyDownloadDir,

    #[error("server.max_payload_bytes must be positive")]
    ZeroPayloadLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_downloads(config)?;

    if config.server.max_payload_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroPayloadLimit);
    }

    Ok(())
}

fn validate_downloads(config: &Config) -> Result<(), ValidationError> {
    let downloads = &config.downloads;

    if downloads.max_concurrency == 0 {
        return Err(ValidationError::ZeroConcurrency);
    }

    if downloads.request_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "downloads.request_timeout_ms",
        });
    }

    if downloads.connect_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "downloads.connect_timeout_ms",
        });
    }

    if downloads.dir.as_os_str().is_empty() {
        return Err(ValidationError::EmptyDownloadDir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::ByteSize;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_concurrency() {
        let mut config = Config::default();
        config.downloads.max_concurrency = 0;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroConcurrency)
        ));
    }

    #[test]
    fn test_zero_timeouts() {
        let mut config = Config::default();
        config.downloads.request_timeout_ms = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroTimeout { field: "downloads.request_timeout_ms" })
        ));

        let mut config = Config::default();
        config.downloads.connect_timeout_ms = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroTimeout { field: "downloads.connect_timeout_ms" })
        ));
    }

    #[test]
    fn test_empty_dir() {
        let mut config = Config::default();
        config.downloads.dir = PathBuf::new();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::EmptyDownloadDir)
        ));
    }

    #[test]
    fn test_zero_payload_limit() {
        let mut config = Config::default();
        config.server.max_payload_bytes = ByteSize(0);

        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroPayloadLimit)
        ));
    }
}
