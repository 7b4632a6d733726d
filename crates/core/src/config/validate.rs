use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Audio format is mp3, the only container the ID3 tagger writes
/// - Fetch timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let format = &config.fetcher.audio_format;
    if !format.eq_ignore_ascii_case("mp3") {
        return Err(ConfigError::ValidationError(format!(
            "fetcher.audio_format must be \"mp3\", got {:?}",
            format
        )));
    }

    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
