//! Per-slot module configuration and its durable projection.

use serde::{Deserialize, Serialize};

use crate::models::{AppInfo, ModuleStyle, RgbColor};
use crate::services::StyleCatalog;

/// Live configuration of one occupied widget slot.
///
/// # Invariants
///
/// - `position` equals the slot index in the owning sequence
/// - `selected_style` is a non-empty variant of the owning widget's kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfiguration {
    /// Slot index within the widget
    pub position: usize,
    /// App launched by this module, if bound
    pub app: Option<AppInfo>,
    /// Selected module variant
    pub selected_style: ModuleStyle,
    /// Selected tint; `None` means the variant's default applies
    pub selected_color: Option<RgbColor>,
}

impl ModuleConfiguration {
    /// Creates a module at `position` using `style`.
    pub fn new(
        position: usize,
        style: ModuleStyle,
        app: Option<AppInfo>,
        color: Option<RgbColor>,
    ) -> Self {
        Self {
            position,
            app,
            selected_style: style,
            selected_color: color,
        }
    }

    /// Projects this module into its durable form.
    #[must_use]
    pub fn to_persisted(&self) -> PersistableModuleConfiguration {
        PersistableModuleConfiguration {
            index: self.position,
            app_name: self.app.as_ref().map(|app| app.name.clone()),
            url_scheme: self.app.as_ref().map(|app| app.url_scheme.clone()),
            selected_style_key: self.selected_style.identifier.clone(),
            selected_color: self.selected_color,
        }
    }

    /// Rebuilds a live module from its durable form.
    ///
    /// Returns `None` when the catalog no longer contains the referenced
    /// module style.
    #[must_use]
    pub fn from_persisted(
        persisted: &PersistableModuleConfiguration,
        catalog: &StyleCatalog,
    ) -> Option<Self> {
        let Some(style) = catalog.get_module_style(&persisted.selected_style_key) else {
            tracing::debug!(
                "Module style '{}' missing from catalog, dropping module {}",
                persisted.selected_style_key,
                persisted.index
            );
            return None;
        };

        let app = match (&persisted.app_name, &persisted.url_scheme) {
            (Some(name), Some(scheme)) => Some(AppInfo::new(name.clone(), scheme.clone())),
            _ => None,
        };

        Some(Self::new(
            persisted.index,
            style.clone(),
            app,
            persisted.selected_color,
        ))
    }
}

/// Durable projection of a [`ModuleConfiguration`].
///
/// The app is stored by name and URL scheme, the style by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistableModuleConfiguration {
    /// Slot index within the widget
    pub index: usize,
    /// Bound app's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Bound app's URL scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_scheme: Option<String>,
    /// Identifier of the selected module style
    pub selected_style_key: String,
    /// Stored tint as `#RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<RgbColor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::test_support::catalog_with;

    #[test]
    fn test_round_trip_with_known_style() {
        let catalog = catalog_with(&["classic"]);
        let style = catalog.get_module_style("classic-01").unwrap().clone();
        let module = ModuleConfiguration::new(
            2,
            style,
            Some(AppInfo::new("Maps", "maps://")),
            Some(RgbColor::new(1, 2, 3)),
        );

        let persisted = module.to_persisted();
        assert_eq!(persisted.selected_style_key, "classic-01");
        assert_eq!(persisted.app_name.as_deref(), Some("Maps"));

        let decoded = ModuleConfiguration::from_persisted(&persisted, &catalog).unwrap();
        assert_eq!(decoded.selected_style.identifier, "classic-01");
        assert_eq!(decoded, module);
    }

    #[test]
    fn test_decode_fails_when_style_missing() {
        let with_style = catalog_with(&["classic"]);
        let without_style = catalog_with(&["neon"]);

        let style = with_style.get_module_style("classic-01").unwrap().clone();
        let persisted = ModuleConfiguration::new(0, style, None, None).to_persisted();

        assert!(ModuleConfiguration::from_persisted(&persisted, &without_style).is_none());
    }

    #[test]
    fn test_partial_app_is_dropped() {
        let catalog = catalog_with(&["classic"]);
        let persisted = PersistableModuleConfiguration {
            index: 0,
            app_name: Some("Orphan".to_string()),
            url_scheme: None,
            selected_style_key: "classic-01".to_string(),
            selected_color: None,
        };

        let module = ModuleConfiguration::from_persisted(&persisted, &catalog).unwrap();
        assert!(module.app.is_none());
    }

    #[test]
    fn test_persisted_json_shape() {
        let persisted = PersistableModuleConfiguration {
            index: 1,
            app_name: None,
            url_scheme: None,
            selected_style_key: "classic-02".to_string(),
            selected_color: Some(RgbColor::new(255, 0, 0)),
        };

        let json = serde_json::to_value(&persisted).unwrap();
        assert_eq!(json["selected_color"], "#FF0000");
        assert!(json.get("app_name").is_none());
    }
}
