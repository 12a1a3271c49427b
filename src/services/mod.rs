//! Service layer.
//!
//! Services hold the stateful parts of the application: the style catalog,
//! the editing session, and the file-backed stores.

pub mod apps;
pub mod builder;
pub mod catalog;
pub mod editor;
pub mod store;

// Re-export commonly used types and functions
pub use apps::AppDirectory;
pub use builder::{placeholder_name, validate_widget_name, WidgetConfigurationBuilder};
pub use catalog::StyleCatalog;
pub use editor::WidgetEditor;
pub use store::WidgetStore;
