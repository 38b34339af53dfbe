//! Configuration module for Site-Indexer
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and merging command-line overrides into it.
//!
//! # Example
//!
//! ```no_run
//! use site_indexer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("indexer.toml")).unwrap();
//! println!("Results go to: {}", config.output.database_name);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, RequestConfig, DEFAULT_DUMP_NAME};

// Re-export parser functions
pub use parser::{load_config, parse_config, resolve_config};
pub use validation::validate;
