//! TOML-based settings persistence for the configurator.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\CarConfigurator\config.toml`
//! - Linux:    `~/.config/carconfigurator/config.toml`
//! - macOS:    `~/Library/Application Support/CarConfigurator/config.toml`
//!
//! The `--config` command-line flag replaces this location with an explicit
//! path (see [`load_config_from`]).
//!
//! # What is TOML? (for beginners)
//!
//! TOML (Tom's Obvious Minimal Language) is a configuration file format designed
//! to be easy to read and write.  Example:
//!
//! ```toml
//! [app]
//! log_level = "debug"
//! base_url = "https://cars.example.com/configure"
//!
//! [viewer]
//! frame_rate_hz = 30
//!
//! [clipboard]
//! command = ["xclip", "-selection", "clipboard"]
//! ```
//!
//! # Serde default values
//!
//! Every section and every field carries a serde default, so an empty file,
//! a file with only some sections, or no file at all all produce a usable
//! configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::application::configure::DEFAULT_STORAGE_KEY;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application settings stored on disk.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

/// General behaviour settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Page that share links point back to.  Its query and fragment are ignored.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Durable key-value store settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Key the saved configuration is written under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Explicit store file.  When absent, `store.json` in the platform
    /// config directory is used.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

/// 3D viewer settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ViewerConfig {
    /// Render loop refresh rate.
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,
    /// Radians of body rotation per pixel of horizontal drag.
    #[serde(default = "default_rotation_sensitivity")]
    pub rotation_sensitivity: f32,
    #[serde(default = "default_viewport_width")]
    pub width: u32,
    #[serde(default = "default_viewport_height")]
    pub height: u32,
}

/// Clipboard settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ClipboardConfig {
    /// Program and arguments that receive the share URL on stdin,
    /// e.g. `["pbcopy"]`.  Without it, copying is skipped.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_base_url() -> String {
    "http://localhost:3000/".to_string()
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_frame_rate_hz() -> u32 {
    60
}
fn default_rotation_sensitivity() -> f32 {
    carcfg_core::viewer::interaction::DEFAULT_SENSITIVITY
}
fn default_viewport_width() -> u32 {
    960
}
fn default_viewport_height() -> u32 {
    540
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            base_url: default_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            store_path: None,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: default_frame_rate_hz(),
            rotation_sensitivity: default_rotation_sensitivity(),
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Resolves the key-value store file: the configured `store_path`, or
/// `store.json` next to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if no path is configured and
/// the base directory cannot be determined.
pub fn store_file_path(storage: &StorageConfig) -> Result<PathBuf, ConfigError> {
    match &storage.store_path {
        Some(path) => Ok(path.clone()),
        None => Ok(config_dir()?.join("store.json")),
    }
}

/// Loads `AppConfig` from the platform config file, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning defaults if the file is absent.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("CarConfigurator"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("carconfigurator"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("CarConfigurator")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("carcfg_test_{}", Uuid::new_v4()))
            .join(name)
    }

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_values() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.app.log_level, "info");
        assert_eq!(cfg.app.base_url, "http://localhost:3000/");
        assert_eq!(cfg.storage.storage_key, "carConfiguratorConfig");
        assert_eq!(cfg.storage.store_path, None);
        assert_eq!(cfg.viewer.frame_rate_hz, 60);
        assert!((cfg.viewer.rotation_sensitivity - 0.01).abs() < f32::EPSILON);
        assert_eq!(cfg.clipboard.command, None);
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_viewer_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[viewer]
frame_rate_hz = 30

[clipboard]
command = ["xclip", "-selection", "clipboard"]
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.viewer.frame_rate_hz, 30);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.viewer.width, 960);
        assert_eq!(cfg.app.log_level, "info");
        assert_eq!(
            cfg.clipboard.command,
            Some(vec!["xclip".to_string(), "-selection".to_string(), "clipboard".to_string()])
        );
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    // ── Store path resolution ─────────────────────────────────────────────────

    #[test]
    fn test_store_file_path_prefers_configured_path() {
        let storage = StorageConfig {
            store_path: Some(PathBuf::from("/custom/store.json")),
            ..StorageConfig::default()
        };

        let path = store_file_path(&storage).expect("configured path");

        assert_eq!(path, PathBuf::from("/custom/store.json"));
    }

    // ── load with explicit paths ─────────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_file_returns_default() {
        let path = temp_path("config.toml");
        let cfg = load_config_from(&path).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_config_from_malformed_file_returns_parse_error() {
        // Arrange
        let path = temp_path("config.toml");
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).expect("mkdir");
        }
        std::fs::write(&path, "[viewer\nframe_rate_hz = ").expect("write");

        // Act
        let result = load_config_from(&path);

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
