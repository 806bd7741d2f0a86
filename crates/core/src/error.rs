//! Error types for semgap operations.
//!
//! This module defines the main error type [`SemgapError`]. Only the
//! collaborators around the analysis engine can fail (fetching, parsing,
//! taxonomy loading, serialization); structure extraction, coverage, gap
//! detection and scoring always produce a value.
//!
//! # Example
//!
//! ```rust
//! use semgap_core::{SemgapError, Result};
//!
//! fn require_html(html: &str) -> Result<&str> {
//!     if html.trim().is_empty() {
//!         return Err(SemgapError::NoContent);
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for semgap operations.
///
/// # Example
///
/// ```rust
/// use semgap_core::{SemgapError, Taxonomy};
///
/// match Taxonomy::from_json(r#"{"topics": []}"#) {
///     Ok(taxonomy) => println!("{} topics", taxonomy.len()),
///     Err(SemgapError::TaxonomyError(reason)) => println!("bad taxonomy: {}", reason),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum SemgapError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other transport problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} returned for {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or lacks an http(s) scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// No content could be read from the input.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The taxonomy document is malformed or violates a taxonomy invariant.
    #[error("Taxonomy error: {0}")]
    TaxonomyError(String),

    /// Report serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SemgapError {
    /// Whether this error came from retrieving the document rather than from
    /// handling it once retrieved.
    ///
    /// The crawl surface reports the two categories with distinct prefixes.
    pub fn is_fetch_failure(&self) -> bool {
        match self {
            #[cfg(feature = "fetch")]
            SemgapError::HttpError(_) => true,
            SemgapError::Timeout { .. } | SemgapError::HttpStatus { .. } => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SemgapError {
    fn from(err: serde_json::Error) -> Self {
        SemgapError::Serialization(err.to_string())
    }
}

/// Result type alias for SemgapError.
pub type Result<T> = std::result::Result<T, SemgapError>;
