//! Configuration module
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file. Every key has a default matching tenshoku.mynavi.jp, so running
//! without a file is equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use job_listing_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Will visit at most {} pages", config.run.page_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Backend, BrowserConfig, Config, OutputConfig, RunConfig, SelectorConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
pub(crate) use validation::parse_selector;
