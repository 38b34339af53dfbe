use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_indexer::config::load_config;
///
/// let config = load_config(Path::new("indexer.toml")).unwrap();
/// println!("Timeout: {}s", config.request.timeout_seconds);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Resolves the effective configuration for a run
///
/// Starts from the file at `path` (or the defaults), applies the
/// command-line overrides, then validates the result.
pub fn resolve_config(
    path: Option<&Path>,
    user_agent: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let config = config.with_overrides(user_agent, timeout_seconds);
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[request]
timeout-seconds = 10
user-agent = "TestIndexer/1.0"

[request.headers]
Accept-Language = "en"

[output]
database-name = "crawl.db"
dump-name = "pending.txt"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.request.timeout_seconds, 10);
        assert_eq!(config.request.user_agent.as_deref(), Some("TestIndexer/1.0"));
        assert_eq!(config.request.headers["Accept-Language"], "en");
        assert_eq!(config.output.database_name, "crawl.db");
        assert_eq!(config.output.dump_name, "pending.txt");
    }

    #[test]
    fn test_load_partial_config() {
        let file = create_temp_config("[output]\ndump-name = \"pending.txt\"\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.request.timeout_seconds, 30);
        assert_eq!(config.output.database_name, "result.db");
        assert_eq!(config.output.dump_name, "pending.txt");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/indexer.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[request]\ntimeout-seconds = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_resolve_config_overrides_file() {
        let file = create_temp_config("[request]\ntimeout-seconds = 10\nuser-agent = \"FileAgent\"\n");

        let config = resolve_config(Some(file.path()), Some("CliAgent".to_string()), None).unwrap();

        assert_eq!(config.request.timeout_seconds, 10);
        assert_eq!(config.request.user_agent.as_deref(), Some("CliAgent"));
    }

    #[test]
    fn test_resolve_config_validates_overrides() {
        let result = resolve_config(None, None, Some(0));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
