//! CLI command handlers for Modulite.
//!
//! Each command loads what it needs from disk, applies one change through
//! the service layer, and writes the result back.

pub mod apps;
pub mod common;
pub mod config;
pub mod styles;
pub mod widget;

// Re-export types used by main.rs and tests
pub use apps::AppsArgs;
pub use common::{CliError, CliResult, ExitCode, Workspace};
pub use config::ConfigArgs;
pub use styles::StylesArgs;
pub use widget::WidgetArgs;
