//! URL handling module for Site-Indexer
//!
//! This module provides URL normalization and the domain scoping used to
//! decide whether a link is internal to the site being crawled.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, registrable_domain, same_site};
pub use normalize::normalize_url;
