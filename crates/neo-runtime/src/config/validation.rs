//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, NeoConfig, RetryConfig};

/// Upper bound for `page_size`.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Validates the entire configuration.
pub fn validate_config(config: &NeoConfig) -> ConfigResult<()> {
    validate_credentials(config)?;
    validate_url(&config.home_server)?;

    if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::validation(format!(
            "Page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
            config.page_size
        )));
    }

    validate_retry_config(&config.fetch_retry)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Checks that every credential field is present.
fn validate_credentials(config: &NeoConfig) -> ConfigResult<()> {
    let required = [
        ("home_server", &config.home_server),
        ("user_id", &config.user_id),
        ("access_token", &config.access_token),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::missing_field(field));
        }
    }
    Ok(())
}

/// Validates retry configuration.
fn validate_retry_config(retry: &RetryConfig) -> ConfigResult<()> {
    if retry.initial_delay_ms == 0 {
        return Err(ConfigError::validation(
            "Initial retry delay must be greater than 0",
        ));
    }

    if retry.max_delay_ms < retry.initial_delay_ms {
        return Err(ConfigError::validation(
            "Max retry delay must be greater than or equal to initial delay",
        ));
    }

    if retry.backoff_multiplier < 1.0 {
        return Err(ConfigError::validation(
            "Backoff multiplier must be at least 1.0",
        ));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if logging.filters.keys().any(|module| module.trim().is_empty()) {
        return Err(ConfigError::validation("Log filter module must not be empty"));
    }

    Ok(())
}

/// Validates the home server URL.
fn validate_url(url: &str) -> ConfigResult<()> {
    let valid_schemes = ["http://", "https://"];

    if !valid_schemes.iter().any(|s| url.starts_with(s)) {
        return Err(ConfigError::invalid_url(
            url,
            format!("URL must start with one of: {valid_schemes:?}"),
        ));
    }

    Ok(())
}
