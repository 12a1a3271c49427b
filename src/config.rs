//! Configuration management for the application.
//!
//! Handles loading, validating, and saving application configuration in TOML
//! format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, CONFIG_DIR_ENV};
use crate::models::WidgetKind;

/// File system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory holding style documents (defaults to `<config>/styles`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles_dir: Option<PathBuf>,
    /// Directory holding widgets and the app directory (defaults to `<config>/data`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Purchase state of styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EntitlementConfig {
    /// Identifiers of purchased styles
    #[serde(default)]
    pub purchased_styles: BTreeSet<String>,
}

/// Editor preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EditorConfig {
    /// Widget kind used when none is given
    #[serde(default)]
    pub default_kind: WidgetKind,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Modulite/config.toml`
/// - macOS: `~/Library/Application Support/Modulite/config.toml`
/// - Windows: `%APPDATA%\Modulite\config.toml`
///
/// `MODULITE_CONFIG_DIR` overrides the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Purchased styles
    #[serde(default)]
    pub entitlements: EntitlementConfig,
    /// Editor preferences
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit file using temp file + rename.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Configured paths that exist must be directories.
    pub fn validate(&self) -> Result<()> {
        for (label, path) in [
            ("styles_dir", &self.paths.styles_dir),
            ("data_dir", &self.paths.data_dir),
        ] {
            if let Some(path) = path {
                if path.exists() && !path.is_dir() {
                    anyhow::bail!("{label} is not a directory: {}", path.display());
                }
            }
        }

        Ok(())
    }

    /// Resolved styles directory.
    pub fn styles_dir(&self) -> Result<PathBuf> {
        match &self.paths.styles_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("styles")),
        }
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.paths.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("data")),
        }
    }

    /// Replaces the purchased style set.
    pub fn set_purchased_styles<I>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entitlements.purchased_styles = identifiers.into_iter().collect();
    }
}
