//! Modulite - home-screen widget customizer
//!
//! Command-line front end for browsing widget styles, composing widgets from
//! app modules, and editing stored widgets.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use modulite::cli::{AppsArgs, CliResult, ConfigArgs, StylesArgs, WidgetArgs, Workspace};
use modulite::constants::APP_BINARY_NAME;

/// Modulite - compose home-screen widgets from styled app modules
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Directory of style documents (overrides the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    styles_dir: Option<PathBuf>,

    /// Directory of stored widgets and apps (overrides the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse styles and manage purchases
    Styles(StylesArgs),
    /// Browse apps that modules can launch
    Apps(AppsArgs),
    /// Create and edit widgets
    Widget(WidgetArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so JSON output stays clean
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let workspace = Workspace::resolve(cli.styles_dir.as_deref(), cli.data_dir.as_deref())?;
    tracing::debug!(
        "Styles from {}, data in {}",
        workspace.styles_dir.display(),
        workspace.data_dir.display()
    );

    match &cli.command {
        Commands::Styles(args) => args.execute(&workspace),
        Commands::Apps(args) => args.execute(&workspace),
        Commands::Widget(args) => args.execute(&workspace),
        Commands::Config(args) => args.execute(&workspace),
    }
}
