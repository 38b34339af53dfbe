use crate::crawler::{RequestOptions, DEFAULT_TIMEOUT_SECS};
use crate::storage::DEFAULT_DATABASE_NAME;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default frontier dump file name inside the output directory
pub const DEFAULT_DUMP_NAME: &str = "frontier.txt";

/// Main configuration structure for Site-Indexer
///
/// Every table and key is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Options applied to every HTTP request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

/// Output file names, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// SQLite database file name
    #[serde(rename = "database-name", default = "default_database_name")]
    pub database_name: String,

    /// Frontier dump file name
    #[serde(rename = "dump-name", default = "default_dump_name")]
    pub dump_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_name: default_database_name(),
            dump_name: default_dump_name(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_database_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

fn default_dump_name() -> String {
    DEFAULT_DUMP_NAME.to_string()
}

impl Config {
    /// Applies command-line overrides on top of file values
    pub fn with_overrides(mut self, user_agent: Option<String>, timeout_seconds: Option<u64>) -> Self {
        if let Some(user_agent) = user_agent {
            self.request.user_agent = Some(user_agent);
        }
        if let Some(timeout_seconds) = timeout_seconds {
            self.request.timeout_seconds = timeout_seconds;
        }
        self
    }

    /// Builds the options passed to every fetch of a crawl
    ///
    /// A configured user agent takes precedence over a `User-Agent` entry in
    /// the headers table.
    pub fn request_options(&self) -> RequestOptions {
        let mut options = RequestOptions::default()
            .with_timeout(Duration::from_secs(self.request.timeout_seconds));

        for (name, value) in &self.request.headers {
            if self.request.user_agent.is_some() && name.eq_ignore_ascii_case("user-agent") {
                continue;
            }
            options = options.with_header(name.clone(), value.clone());
        }

        if let Some(user_agent) = &self.request.user_agent {
            options = options.with_header("User-Agent", user_agent.clone());
        }

        options
    }
}
