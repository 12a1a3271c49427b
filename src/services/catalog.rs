//! Style catalog: the load-once, read-mostly set of selectable styles.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::CatalogError;
use crate::models::{ModuleStyle, WidgetKind, WidgetStyle};
use crate::parser;

/// Style documents shipped with the binary, by file name.
const BUNDLED_STYLES: [(&str, &str); 3] = [
    ("classic.json", include_str!("../../data/styles/classic.json")),
    ("mono.json", include_str!("../../data/styles/mono.json")),
    ("neon.json", include_str!("../../data/styles/neon.json")),
];

/// Every widget style available for selection, with purchase state.
///
/// The catalog is small (tens of styles), so lookups are linear scans.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    styles: Vec<WidgetStyle>,
}

impl StyleCatalog {
    /// Loads every `*.json` style document in `dir`.
    ///
    /// Hidden files are skipped and the extension match is case-insensitive.
    /// The load is all-or-nothing: a missing directory, an unreadable file, a
    /// malformed document or a duplicated identifier fails the whole load.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && is_style_document(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let styles = paths
            .iter()
            .map(|path| parser::parse_style_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::from_styles(styles)?;
        tracing::info!("Loaded {} styles from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    /// Writes the bundled style documents into `dir`, creating it if needed.
    ///
    /// Files already present are left untouched. Returns how many documents
    /// were written.
    pub fn install_bundled(dir: &Path) -> Result<usize, CatalogError> {
        fs::create_dir_all(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = 0;
        for (file_name, content) in BUNDLED_STYLES {
            let path = dir.join(file_name);
            if path.exists() {
                continue;
            }
            fs::write(&path, content).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
            written += 1;
        }

        tracing::info!("Installed {written} bundled styles into {}", dir.display());
        Ok(written)
    }

    /// Builds a catalog from already-decoded styles.
    ///
    /// Styles are ordered by identifier. Every style needs at least one main
    /// and one auxiliary variant. Style identifiers and module identifiers
    /// must each be unique across the catalog.
    pub fn from_styles(mut styles: Vec<WidgetStyle>) -> Result<Self, CatalogError> {
        let mut style_ids = HashSet::new();
        let mut module_ids = HashSet::new();

        for style in &styles {
            for kind in [WidgetKind::Main, WidgetKind::Auxiliary] {
                if style.modules_for(kind).is_empty() {
                    return Err(CatalogError::MissingModules {
                        style: style.identifier.clone(),
                        kind,
                    });
                }
            }
            if !style_ids.insert(style.identifier.as_str()) {
                return Err(CatalogError::DuplicateIdentifier(style.identifier.clone()));
            }
            for module in style.all_modules() {
                if !module_ids.insert(module.identifier.as_str()) {
                    return Err(CatalogError::DuplicateIdentifier(module.identifier.clone()));
                }
            }
        }

        styles.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(Self { styles })
    }

    /// Looks up a widget style by identifier.
    #[must_use]
    pub fn get_style(&self, identifier: &str) -> Option<&WidgetStyle> {
        self.styles.iter().find(|s| s.identifier == identifier)
    }

    /// Looks up a module variant by identifier across all styles.
    ///
    /// Main, auxiliary and both empty variants are searched.
    #[must_use]
    pub fn get_module_style(&self, identifier: &str) -> Option<&ModuleStyle> {
        self.styles
            .iter()
            .flat_map(WidgetStyle::all_modules)
            .find(|m| m.identifier == identifier)
    }

    /// All styles, ordered by identifier.
    #[must_use]
    pub fn get_all_styles(&self) -> &[WidgetStyle] {
        &self.styles
    }

    /// Number of styles in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns true if no styles are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Replaces the set of purchased styles.
    ///
    /// Styles whose identifier is in `identifiers` become purchased; every
    /// other style becomes unpurchased. Passing an empty set revokes all
    /// purchases. Unknown identifiers are ignored.
    pub fn set_purchased_styles<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owned: HashSet<String> = identifiers
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();

        for style in &mut self.styles {
            style.set_purchased(owned.contains(&style.identifier));
        }

        tracing::debug!(
            "Purchase state updated: {} of {} styles owned",
            self.purchased_styles().count(),
            self.styles.len()
        );
    }

    /// Iterates the purchased styles.
    pub fn purchased_styles(&self) -> impl Iterator<Item = &WidgetStyle> {
        self.styles.iter().filter(|s| s.is_purchased)
    }
}

fn is_style_document(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));

    let json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    !hidden && json
}
