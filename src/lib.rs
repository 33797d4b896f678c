//! job-listing-scraper: a paginated job-listing extractor
//!
//! This crate walks the search results of a job board page by page, extracts a
//! fixed set of fields from every listing, isolates per-listing failures, and
//! writes the collected records to a CSV file.

pub mod config;
pub mod extract;
pub mod navigator;
pub mod output;
pub mod pipeline;
pub mod recorder;

use thiserror::Error;

/// Main error type for a scraping run
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Errors raised by the navigation layer
///
/// Everything except `Script` is fatal to a run. `Script` is only produced by
/// the popup dismissal, which swallows it.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Failed to start browser session: {0}")]
    Session(String),

    #[error("Failed to load {url}: {message}")]
    Load { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Element '{selector}' not usable: {message}")]
    Element { selector: String, message: String },

    #[error("Next-page link '{selector}' has no usable target")]
    MissingTarget { selector: String },

    #[error("Script execution failed: {0}")]
    Script(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Operation not supported by this backend: {0}")]
    Unsupported(&'static str),
}

/// Why a single listing could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("required field '{0}' is missing")]
    MissingField(extract::Field),

    #[error("condition table is missing")]
    MissingTable,
}

/// Result type alias for scraping operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for navigation operations
pub type NavResult<T> = std::result::Result<T, NavigationError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{FieldExtractor, ListingRecord};
pub use navigator::Navigator;
pub use pipeline::{Pipeline, RunReport, Termination};
pub use recorder::{RunRecorder, RunStats};
