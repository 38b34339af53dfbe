use crate::config::types::{Config, OutputConfig, RequestConfig};
use crate::ConfigError;

/// Longest accepted per-request timeout, in seconds
const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_request_config(&config.request)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates request configuration
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 || config.timeout_seconds > MAX_TIMEOUT_SECONDS {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECONDS, config.timeout_seconds
        )));
    }

    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be empty".to_string(),
            ));
        }
        validate_header_value("User-Agent", user_agent)?;
    }

    for (name, value) in &config.headers {
        validate_header_name(name)?;
        validate_header_value(name, value)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    validate_file_name("database_name", &config.database_name)?;
    validate_file_name("dump_name", &config.dump_name)?;

    if config.database_name == config.dump_name {
        return Err(ConfigError::Validation(format!(
            "database_name and dump_name must differ, both are '{}'",
            config.database_name
        )));
    }

    Ok(())
}

/// Header names must be HTTP tokens (RFC 9110)
fn validate_header_name(name: &str) -> Result<(), ConfigError> {
    let is_tchar = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);

    if name.is_empty() || !name.chars().all(is_tchar) {
        return Err(ConfigError::Validation(format!(
            "Invalid header name: '{}'",
            name
        )));
    }

    Ok(())
}

fn validate_header_value(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.chars().any(|c| c.is_control() && c != '\t') {
        return Err(ConfigError::Validation(format!(
            "Header '{}' contains control characters",
            name
        )));
    }
    Ok(())
}

/// File names are joined onto the output directory, so no separators
fn validate_file_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain file name, got '{}'",
            field, name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let mut config = Config::default();

        config.request.timeout_seconds = 0;
        assert!(validate(&config).is_err());

        config.request.timeout_seconds = 601;
        assert!(validate(&config).is_err());

        config.request.timeout_seconds = 600;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_user_agent() {
        let mut config = Config::default();

        config.request.user_agent = Some("   ".to_string());
        assert!(validate(&config).is_err());

        config.request.user_agent = Some("bot\r\nX-Injected: 1".to_string());
        assert!(validate(&config).is_err());

        config.request.user_agent = Some("site-indexer/0.1 (+https://a.test/bot)".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_header_name() {
        assert!(validate_header_name("Accept-Language").is_ok());
        assert!(validate_header_name("X-Custom_Header").is_ok());

        assert!(validate_header_name("").is_err());
        assert!(validate_header_name("Bad Header").is_err());
        assert!(validate_header_name("Bad:Header").is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("database_name", "crawl.db").is_ok());

        assert!(validate_file_name("database_name", "").is_err());
        assert!(validate_file_name("database_name", "out/crawl.db").is_err());
        assert!(validate_file_name("database_name", "..").is_err());
    }

    #[test]
    fn test_output_names_must_differ() {
        let mut config = Config::default();
        config.output.dump_name = config.output.database_name.clone();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }
}
