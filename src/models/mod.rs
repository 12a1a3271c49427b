//! Data models for widget styles, modules and finalized widgets.
//!
//! Models are independent of the CLI and of the storage layout; services
//! build on them.

pub mod app;
pub mod module;
pub mod rgb;
pub mod style;
pub mod widget;

// Re-export all model types
pub use app::AppInfo;
pub use module::{ModuleConfiguration, PersistableModuleConfiguration};
pub use rgb::RgbColor;
pub use style::{ModuleKind, ModuleStyle, StylePalette, WidgetKind, WidgetStyle};
pub use widget::{PersistableWidgetConfiguration, WidgetConfiguration};
