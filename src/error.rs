//! Typed errors for catalog loading and widget editing.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::WidgetKind;

/// Failure while loading the style catalog.
///
/// Any of these aborts the whole load; no partial catalog is produced.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The styles directory does not exist or is not a directory
    #[error("Style directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A directory or document could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid style JSON
    #[error("Malformed style document {}: {source}", path.display())]
    Malformed {
        /// Offending document
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// A document decoded but violates a style rule
    #[error("Invalid style document {}: {message}", path.display())]
    Invalid {
        /// Offending document
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },

    /// A style offers no variants for one widget kind
    #[error("Style '{style}' has no {kind} modules")]
    MissingModules {
        /// Style identifier
        style: String,
        /// Widget kind without variants
        kind: WidgetKind,
    },

    /// Two documents or variants share an identifier
    #[error("Duplicate style identifier '{0}'")]
    DuplicateIdentifier(String),
}

/// Failure of a builder mutation or of `build()`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// No module occupies the slot (empty or out of range)
    #[error("No module at position {0}")]
    NoModule(usize),

    /// Unknown widget or module style identifier
    #[error("Unknown style '{0}'")]
    UnknownStyle(String),

    /// Style exists but has not been purchased
    #[error("Style '{0}' has not been purchased")]
    StyleNotPurchased(String),

    /// Module variant belongs to another widget kind or is a placeholder
    #[error("Module style '{0}' cannot be used in this widget")]
    IncompatibleModuleStyle(String),

    /// More apps than the widget has slots
    #[error("Too many apps: {given} selected, widget holds {capacity}")]
    TooManyApps {
        /// Apps requested
        given: usize,
        /// Slots available
        capacity: usize,
    },

    /// Name missing or rejected
    #[error("Invalid widget name: {0}")]
    InvalidName(String),
}

/// Failure of an editor action.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The action needs a selected cell
    #[error("No module is selected")]
    NothingSelected,

    /// The builder rejected the change
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// Saving the built widget failed
    #[error("Failed to save widget: {0}")]
    Persistence(#[from] anyhow::Error),
}
