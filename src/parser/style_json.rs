//! Style description documents.
//!
//! Each style lives in its own JSON document describing the style's
//! identifier, display name, preview asset, palettes, and the module
//! variants for main, auxiliary and empty slots.
//!
//! ```json
//! {
//!   "identifier": "classic",
//!   "name": "Classic",
//!   "preview": "classic-preview.png",
//!   "palette": { "main": ["#F2F2F7"], "auxiliary": ["#1C1C1E"] },
//!   "main_modules": [{ "identifier": "classic-01", "image": "classic-01.png" }],
//!   "aux_modules": [{ "identifier": "classic-aux-01", "image": "classic-aux-01.png" }],
//!   "main_empty": { "identifier": "classic-empty-main", "image": "classic-empty.png" },
//!   "aux_empty": { "identifier": "classic-empty-aux", "image": "classic-empty.png" }
//! }
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::CatalogError;
use crate::models::{ModuleKind, ModuleStyle, RgbColor, StylePalette, WidgetStyle};

/// Top-level style document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleDocument {
    /// Style identifier
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Preview asset name
    pub preview: String,
    /// Per-kind palettes
    #[serde(default)]
    pub palette: StylePalette,
    /// Main slot variants
    pub main_modules: Vec<ModuleDocument>,
    /// Auxiliary slot variants
    pub aux_modules: Vec<ModuleDocument>,
    /// Empty main slot placeholder
    pub main_empty: ModuleDocument,
    /// Empty auxiliary slot placeholder
    pub aux_empty: ModuleDocument,
}

/// One module variant entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDocument {
    /// Variant identifier, unique across the catalog
    pub identifier: String,
    /// Artwork asset name
    pub image: String,
    /// Variant-specific colors
    #[serde(default)]
    pub colors: Vec<RgbColor>,
    /// Initial tint
    #[serde(default)]
    pub default_color: Option<RgbColor>,
}

impl ModuleDocument {
    fn into_style(self, kind: ModuleKind) -> ModuleStyle {
        ModuleStyle {
            identifier: self.identifier,
            kind,
            image: self.image,
            colors: self.colors,
            default_color: self.default_color,
        }
    }
}

/// Reads and decodes a style document from disk.
pub fn parse_style_file(path: &Path) -> Result<WidgetStyle, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_style_str(&content, path)
}

/// Decodes a style document; `path` is only used in error messages.
pub fn parse_style_str(content: &str, path: &Path) -> Result<WidgetStyle, CatalogError> {
    let document: StyleDocument =
        serde_json::from_str(content).map_err(|source| CatalogError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    validate_document(&document).map_err(|message| CatalogError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(WidgetStyle {
        identifier: document.identifier,
        name: document.name,
        preview: document.preview,
        palette: document.palette,
        main_modules: document
            .main_modules
            .into_iter()
            .map(|m| m.into_style(ModuleKind::Main))
            .collect(),
        aux_modules: document
            .aux_modules
            .into_iter()
            .map(|m| m.into_style(ModuleKind::Auxiliary))
            .collect(),
        main_empty: document.main_empty.into_style(ModuleKind::EmptyMain),
        aux_empty: document.aux_empty.into_style(ModuleKind::EmptyAuxiliary),
        is_purchased: false,
    })
}

fn validate_document(document: &StyleDocument) -> Result<(), String> {
    if document.identifier.trim().is_empty() {
        return Err("style identifier cannot be empty".to_string());
    }

    if document.main_modules.is_empty() {
        return Err("at least one main module is required".to_string());
    }

    if document.aux_modules.is_empty() {
        return Err("at least one auxiliary module is required".to_string());
    }

    let mut seen = HashSet::new();
    let all = document
        .main_modules
        .iter()
        .chain(document.aux_modules.iter())
        .chain([&document.main_empty, &document.aux_empty]);

    for module in all {
        if module.identifier.trim().is_empty() {
            return Err("module identifier cannot be empty".to_string());
        }
        if !seen.insert(module.identifier.as_str()) {
            return Err(format!("module identifier '{}' is repeated", module.identifier));
        }
    }

    Ok(())
}
