//! Diagnostics configuration.
//!
//! Read from `reef.toml` in the working directory. Only diagnostic output is
//! configurable; the window, frame rate and assets are fixed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "reef.toml";

/// Diagnostic switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log the frame rate periodically
    pub show_fps: bool,
}

impl EngineConfig {
    /// Load configuration from `reef.toml` in the working directory.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file {}: {e}", path.display());
                return Self::default();
            },
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        assert!(!EngineConfig::default().show_fps);
    }

    #[test]
    fn test_config_load_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("reef.toml");
        fs::write(&config_path, "show_fps = true\n").expect("Failed to write config");

        assert!(EngineConfig::load_from(&config_path).show_fps);
    }

    #[test]
    fn test_window_settings_are_not_read() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("reef.toml");
        fs::write(
            &config_path,
            "window_width = 640\ntarget_fps = 30\nasset_dir = \"elsewhere\"\n",
        )
        .expect("Failed to write config");

        assert_eq!(EngineConfig::load_from(&config_path), EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("reef.toml");
        fs::write(&config_path, "show_fps = \"yes\"").expect("Failed to write config");

        assert_eq!(EngineConfig::load_from(&config_path), EngineConfig::default());
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/reef.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_toml_serialization() {
        let toml_str =
            toml::to_string_pretty(&EngineConfig::default()).expect("Failed to serialize");
        assert!(toml_str.contains("show_fps"));
    }
}
