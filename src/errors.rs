//! Defines the custom error types used throughout the `showreel_rs` application.
//!
//! This module centralizes error handling, providing specific error enums for
//! different categories of issues (configuration, catalog loading, media
//! processing). Each error type implements `Debug`, `Display`, and
//! `std::error::Error` traits, and provides `From` implementations for common
//! underlying error types.
//!
//! Nothing in here is fatal to the application: every failure degrades to a
//! default (built-in catalog, default config, placeholder thumbnail).

use std::error::Error as StdError;
use std::fmt;

// --- ConfigError ---
/// Errors related to application configuration loading and parsing.
#[must_use = "a configuration error should be handled or propagated"]
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while trying to read the configuration file.
    Io(std::io::Error),
    /// An error occurred while parsing the configuration file content.
    Parse(String),
    /// A configuration value was present but not interpretable (e.g. a
    /// non-numeric width threshold).
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "Configuration parse error: {}", e),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid configuration value for '{}': '{}'", key, value)
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

// --- CatalogError ---
/// Errors related to loading the video catalog from a JSON file.
#[must_use = "a catalog error should be handled or propagated"]
#[derive(Debug)]
pub enum CatalogError {
    /// An I/O error occurred while reading the catalog file.
    Io(std::io::Error),
    /// The catalog file was not valid JSON, or a record was missing a
    /// required field or carried an unknown category.
    Json(serde_json::Error),
    /// The catalog parsed but contained no records.
    Empty,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "Catalog I/O error: {}", e),
            CatalogError::Json(e) => write!(f, "Catalog JSON error: {}", e),
            CatalogError::Empty => write!(f, "Catalog contained no video records"),
        }
    }
}

impl StdError for CatalogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json(err)
    }
}

// --- MediaError ---
/// Errors related to fetching and decoding card thumbnails.
#[must_use = "a media error should be handled or propagated"]
#[derive(Debug)]
pub enum MediaError {
    /// An error occurred during the download of media content.
    Download(reqwest::Error),
    /// An error occurred while decoding image bytes via the `image` crate.
    Image(image::ImageError),
    /// A generic media-related error.
    Generic(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::Download(e) => write!(f, "Media download error: {}", e),
            MediaError::Image(e) => write!(f, "Image processing error: {}", e),
            MediaError::Generic(s) => write!(f, "Media error: {}", s),
        }
    }
}

impl StdError for MediaError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            MediaError::Download(e) => Some(e),
            MediaError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        MediaError::Download(err)
    }
}

impl From<image::ImageError> for MediaError {
    fn from(err: image::ImageError) -> Self {
        MediaError::Image(err)
    }
}
