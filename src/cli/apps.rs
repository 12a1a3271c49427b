//! App directory commands.

use crate::cli::common::{print_json, CliError, CliResult, Workspace};
use crate::models::AppInfo;
use clap::{Args, Subcommand};
use serde::Serialize;

/// Browse apps that modules can launch
#[derive(Debug, Clone, Args)]
pub struct AppsArgs {
    /// Apps subcommand
    #[command(subcommand)]
    pub command: AppsCommand,
}

/// App directory subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum AppsCommand {
    /// List all known apps
    List(ListAppsArgs),
}

/// List all known apps
#[derive(Debug, Clone, Args)]
pub struct ListAppsArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ListAppsResponse {
    apps: Vec<AppInfo>,
    count: usize,
}

impl AppsArgs {
    /// Execute the apps command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        match &self.command {
            AppsCommand::List(args) => args.execute(workspace),
        }
    }
}

impl ListAppsArgs {
    /// Execute the list command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let apps = workspace
            .app_directory()?
            .fetch_apps()
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        let response = ListAppsResponse {
            count: apps.len(),
            apps,
        };

        if self.json {
            print_json(&response)?;
        } else {
            println!("Apps ({}):", response.count);
            println!();
            for app in response.apps {
                println!("  {:<20} {}", app.name, app.url_scheme);
            }
        }

        Ok(())
    }
}
