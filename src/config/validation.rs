use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks performed:
/// - `base-url` parses as an absolute http(s) URL
/// - at least one seed, and no blank seeds
/// - `min-request-interval` is non-zero
/// - `user-agent` is non-empty
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let base = Url::parse(&config.crawler.base_url)
        .map_err(|e| ConfigError::Validation(format!("invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must be http(s), got scheme '{}'",
            base.scheme()
        )));
    }

    if config.crawler.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed is required".to_string(),
        ));
    }

    if config.crawler.seeds.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "seeds must not be blank".to_string(),
        ));
    }

    if config.crawler.min_request_interval == 0 {
        return Err(ConfigError::Validation(
            "min-request-interval must be greater than zero".to_string(),
        ));
    }

    if config.request.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent must not be empty".to_string(),
        ));
    }

    Ok(())
}
