//! Shared CLI plumbing: exit codes, errors, and workspace loading.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{BuilderError, CatalogError, EditorError};
use crate::models::PersistableWidgetConfiguration;
use crate::services::{AppDirectory, StyleCatalog, WidgetStore};

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad input or a rejected edit
    Validation = 1,
    /// File system or serialization failure
    Io = 2,
    /// Referenced style, module, app, or widget does not exist
    NotFound = 3,
}

/// Error reported by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code to terminate with
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Missing entity (exit code 3).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::NotFound,
            message: message.into(),
        }
    }

    /// Numeric process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::DirectoryNotFound(_) => Self::not_found(err.to_string()),
            CatalogError::Io { .. } => Self::io(err.to_string()),
            CatalogError::Malformed { .. }
            | CatalogError::Invalid { .. }
            | CatalogError::MissingModules { .. }
            | CatalogError::DuplicateIdentifier(_) => Self::validation(err.to_string()),
        }
    }
}

impl From<BuilderError> for CliError {
    fn from(err: BuilderError) -> Self {
        match err {
            BuilderError::UnknownStyle(_) => Self::not_found(err.to_string()),
            _ => Self::validation(err.to_string()),
        }
    }
}

impl From<EditorError> for CliError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::NothingSelected => Self::validation(err.to_string()),
            EditorError::Builder(inner) => inner.into(),
            EditorError::Persistence(inner) => Self::io(format!("{inner:#}")),
        }
    }
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Resolved directories and configuration for one invocation.
///
/// Command-line flags win over the configuration file.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Loaded configuration
    pub config: Config,
    /// Directory of style documents
    pub styles_dir: PathBuf,
    /// Directory of widgets and the app directory
    pub data_dir: PathBuf,
    /// Whether `styles_dir` is the default location, which gets the bundled
    /// styles on first use
    pub default_styles_dir: bool,
}

impl Workspace {
    /// Loads the configuration and applies directory overrides.
    pub fn resolve(styles_dir: Option<&Path>, data_dir: Option<&Path>) -> CliResult<Self> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        let default_styles_dir = styles_dir.is_none() && config.paths.styles_dir.is_none();
        let styles_dir = match styles_dir {
            Some(dir) => dir.to_path_buf(),
            None => config
                .styles_dir()
                .map_err(|e| CliError::io(format!("{e:#}")))?,
        };
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => config
                .data_dir()
                .map_err(|e| CliError::io(format!("{e:#}")))?,
        };

        Ok(Self {
            config,
            styles_dir,
            data_dir,
            default_styles_dir,
        })
    }

    /// Loads the style catalog with the configured purchases applied.
    ///
    /// A missing default styles directory is created with the bundled styles.
    pub fn load_catalog(&self) -> CliResult<StyleCatalog> {
        if self.default_styles_dir && !self.styles_dir.exists() {
            StyleCatalog::install_bundled(&self.styles_dir)?;
        }
        let mut catalog = StyleCatalog::load(&self.styles_dir)?;
        catalog.set_purchased_styles(&self.config.entitlements.purchased_styles);
        Ok(catalog)
    }

    /// Opens the widget store in the data directory.
    pub fn open_store(&self) -> CliResult<WidgetStore> {
        WidgetStore::open(&self.data_dir).map_err(|e| CliError::io(format!("{e:#}")))
    }

    /// App directory in the data directory, seeded on first use.
    pub fn app_directory(&self) -> CliResult<AppDirectory> {
        let directory = AppDirectory::open(&self.data_dir);
        directory
            .execute_initial_setup()
            .map_err(|e| CliError::io(format!("Failed to set up app directory: {e:#}")))?;
        Ok(directory)
    }
}

/// Parses a widget id argument.
pub fn parse_widget_id(id: &str) -> CliResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| CliError::validation(format!("Invalid widget id: '{id}'")))
}

/// Fetches a stored widget or reports it as not found.
pub fn fetch_record(store: &WidgetStore, id: Uuid) -> CliResult<PersistableWidgetConfiguration> {
    store
        .fetch_widget(id)
        .map_err(|e| CliError::io(format!("{e:#}")))?
        .ok_or_else(|| CliError::not_found(format!("Widget '{id}' not found")))
}

/// Prints `value` as a single line of JSON.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
