//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult, Workspace};
use crate::config::Config;
use crate::models::WidgetKind;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    /// Directory holding style documents
    #[arg(long, value_name = "DIR")]
    styles_dir: Option<PathBuf>,

    /// Directory holding widgets and the app directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Widget kind used by `widget create` (main or aux)
    #[arg(long, value_name = "KIND")]
    default_kind: Option<String>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: Option<String>,
    styles_dir: String,
    data_dir: String,
    purchased_styles: Vec<String>,
    default_kind: WidgetKind,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(workspace),
            ConfigCommand::Set(args) => args.execute(workspace),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let output = ConfigOutput {
            config_file: Config::config_file_path()
                .ok()
                .map(|p| p.to_string_lossy().to_string()),
            styles_dir: workspace.styles_dir.to_string_lossy().to_string(),
            data_dir: workspace.data_dir.to_string_lossy().to_string(),
            purchased_styles: workspace
                .config
                .entitlements
                .purchased_styles
                .iter()
                .cloned()
                .collect(),
            default_kind: workspace.config.editor.default_kind,
        };

        if self.json {
            return print_json(&output);
        }

        println!("Configuration:");
        if let Some(file) = &output.config_file {
            println!("  File:             {file}");
        }
        println!("  Styles directory: {}", output.styles_dir);
        println!("  Data directory:   {}", output.data_dir);
        println!("  Default kind:     {}", output.default_kind);
        if output.purchased_styles.is_empty() {
            println!("  Purchased styles: (none)");
        } else {
            println!("  Purchased styles: {}", output.purchased_styles.join(", "));
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        if self.styles_dir.is_none() && self.data_dir.is_none() && self.default_kind.is_none() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --styles-dir, --data-dir, or --default-kind",
            ));
        }

        let mut config = workspace.config.clone();

        if let Some(path) = &self.styles_dir {
            if !path.is_dir() {
                return Err(CliError::validation(format!(
                    "Styles directory does not exist: {}",
                    path.display()
                )));
            }
            config.paths.styles_dir = Some(path.clone());
        }

        if let Some(path) = &self.data_dir {
            std::fs::create_dir_all(path).map_err(|e| {
                CliError::io(format!(
                    "Failed to create data directory {}: {e}",
                    path.display()
                ))
            })?;
            config.paths.data_dir = Some(path.clone());
        }

        if let Some(kind) = &self.default_kind {
            config.editor.default_kind = kind
                .parse()
                .map_err(|e: anyhow::Error| CliError::validation(e.to_string()))?;
        }

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");
        Ok(())
    }
}
