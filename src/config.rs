//! Handles application configuration loading and management.
//!
//! This module defines the `AppConfig` struct which holds configuration
//! parameters like the embed base URL, the narrow-layout width threshold,
//! and an optional catalog file path. It provides the `load_config` function
//! to read these settings from an INI file. Every key is optional; the
//! application falls back to `AppConfig::default()` when the file itself is
//! missing or unreadable.

use super::errors::ConfigError;
use configparser::ini::Ini;
use log::{debug, error, info};

/// Default base path for constructing video embed references.
pub const DEFAULT_EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";
/// Default viewport width (px) at or below which the narrow layout is used.
pub const DEFAULT_NARROW_WIDTH_THRESHOLD: f32 = 768.0;

/// Holds the application's configuration parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Base URL prepended to a video id when building the embed reference.
    pub embed_base_url: String,
    /// Viewport width (px) at or below which the narrow layout is selected.
    pub narrow_width_threshold: f32,
    /// Optional path to a JSON catalog file; `None` uses the built-in catalog.
    pub catalog_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            embed_base_url: DEFAULT_EMBED_BASE_URL.to_string(),
            narrow_width_threshold: DEFAULT_NARROW_WIDTH_THRESHOLD,
            catalog_path: None,
        }
    }
}

/// Loads application configuration from the specified INI file path.
///
/// Reads settings from the `[settings]` section of the INI file. Missing
/// keys take their defaults; a malformed `narrow_width_threshold` is an
/// error so the caller can decide to fall back wholesale.
///
/// # Errors
/// Returns `ConfigError` if the file cannot be read, is malformed, or if a
/// present value cannot be interpreted.
#[must_use = "loading configuration can fail, the Result must be handled"]
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Attempting to load config from: {}", path);
    let mut config_parser = Ini::new();

    config_parser.load(path).map_err(|e| {
        error!("Error loading config file '{}': {}", path, e);
        if e.to_lowercase().contains("os error 2")
            || e.to_lowercase().contains("no such file")
        {
            ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                e,
            ))
        } else {
            ConfigError::Parse(e)
        }
    })?;

    let embed_base_url = config_parser
        .get("settings", "embed_base_url")
        .unwrap_or_else(|| DEFAULT_EMBED_BASE_URL.to_string());
    debug!("Loaded config value for key 'embed_base_url': {}", embed_base_url);

    let narrow_width_threshold = match config_parser.get("settings", "narrow_width_threshold") {
        Some(raw) => raw.trim().parse::<f32>().map_err(|_| {
            error!(
                "Invalid 'narrow_width_threshold' value '{}' in '{}'",
                raw, path
            );
            ConfigError::InvalidValue {
                key: "narrow_width_threshold".to_string(),
                value: raw.clone(),
            }
        })?,
        None => DEFAULT_NARROW_WIDTH_THRESHOLD,
    };
    debug!(
        "Loaded config value for key 'narrow_width_threshold': {}",
        narrow_width_threshold
    );

    let catalog_path = config_parser
        .get("settings", "catalog_path")
        .filter(|p| !p.trim().is_empty());
    debug!("Loaded config value for key 'catalog_path': {:?}", catalog_path);

    let app_config = AppConfig {
        embed_base_url,
        narrow_width_threshold,
        catalog_path,
    };
    info!("Configuration loaded successfully from {}: {:?}", path, app_config);
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> (tempfile::TempDir, String) {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("showreel.conf");
        let mut file = std::fs::File::create(&path).expect("failed to create config file");
        file.write_all(contents.as_bytes())
            .expect("failed to write config file");
        (dir, path.to_string_lossy().into_owned())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_config("/nonexistent/showreel.conf");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn full_config_is_loaded() {
        let (_dir, path) = write_config(
            "[settings]\n\
             embed_base_url = https://example.test/embed/\n\
             narrow_width_threshold = 900\n\
             catalog_path = /tmp/catalog.json\n",
        );
        let config = load_config(&path).expect("load failed");
        assert_eq!(config.embed_base_url, "https://example.test/embed/");
        assert_eq!(config.narrow_width_threshold, 900.0);
        assert_eq!(config.catalog_path.as_deref(), Some("/tmp/catalog.json"));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let (_dir, path) = write_config("[settings]\n");
        let config = load_config(&path).expect("load failed");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn malformed_threshold_is_rejected() {
        let (_dir, path) = write_config(
            "[settings]\nnarrow_width_threshold = not-a-number\n",
        );
        let result = load_config(&path);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "narrow_width_threshold"
        ));
    }

    #[test]
    fn empty_catalog_path_is_treated_as_absent() {
        let (_dir, path) = write_config("[settings]\ncatalog_path =\n");
        let config = load_config(&path).expect("load failed");
        assert_eq!(config.catalog_path, None);
    }
}
