//! Finalized widget configurations and their durable records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ModuleConfiguration, PersistableModuleConfiguration, WidgetKind};
use crate::services::StyleCatalog;

/// Immutable snapshot of a widget, produced by the builder on save.
///
/// Edits never mutate a `WidgetConfiguration`; they seed a fresh builder from
/// the persisted record and build a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfiguration {
    /// Stable widget id
    pub id: Uuid,
    /// User-visible widget name
    pub name: String,
    /// Widget size class
    pub kind: WidgetKind,
    /// Identifier of the widget style the modules were picked from
    pub style_identifier: String,
    /// One entry per slot; `None` marks an empty slot
    pub modules: Vec<Option<ModuleConfiguration>>,
    /// When the widget was first created
    pub created_at: DateTime<Utc>,
}

impl WidgetConfiguration {
    /// Iterates the occupied slots in position order.
    pub fn occupied_modules(&self) -> impl Iterator<Item = &ModuleConfiguration> {
        self.modules.iter().flatten()
    }

    /// Projects the widget into its durable record.
    #[must_use]
    pub fn to_persisted(&self, preview_file: Option<String>) -> PersistableWidgetConfiguration {
        PersistableWidgetConfiguration {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            style_identifier: self.style_identifier.clone(),
            created_at: self.created_at,
            modules: self
                .occupied_modules()
                .map(ModuleConfiguration::to_persisted)
                .collect(),
            preview_file,
        }
    }

    /// Rebuilds a live widget from its record.
    ///
    /// Returns `None` if the widget style or any module style is missing
    /// from the catalog, if a module variant belongs to the wrong widget kind,
    /// or if slot indices are out of range or duplicated.
    #[must_use]
    pub fn from_persisted(
        record: &PersistableWidgetConfiguration,
        catalog: &StyleCatalog,
    ) -> Option<Self> {
        if catalog.get_style(&record.style_identifier).is_none() {
            tracing::debug!(
                "Widget {} references unknown style '{}'",
                record.id,
                record.style_identifier
            );
            return None;
        }

        let mut modules: Vec<Option<ModuleConfiguration>> = vec![None; record.kind.slot_count()];
        for persisted in &record.modules {
            let module = ModuleConfiguration::from_persisted(persisted, catalog)?;
            if module.selected_style.kind != record.kind.module_kind() {
                tracing::debug!(
                    "Module style '{}' does not fit a {} widget",
                    module.selected_style.identifier,
                    record.kind
                );
                return None;
            }

            let slot = modules.get_mut(persisted.index)?;
            if slot.is_some() {
                tracing::debug!("Widget {} has duplicate slot {}", record.id, persisted.index);
                return None;
            }
            *slot = Some(module);
        }

        Some(Self {
            id: record.id,
            name: record.name.clone(),
            kind: record.kind,
            style_identifier: record.style_identifier.clone(),
            modules,
            created_at: record.created_at,
        })
    }
}

/// Durable record of a widget as written by the widget store.
///
/// Only occupied slots are stored; each carries its slot index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistableWidgetConfiguration {
    /// Stable widget id
    pub id: Uuid,
    /// User-visible widget name
    pub name: String,
    /// Widget size class
    pub kind: WidgetKind,
    /// Widget style identifier
    pub style_identifier: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Occupied module slots
    #[serde(default)]
    pub modules: Vec<PersistableModuleConfiguration>,
    /// File name of the rendered preview, relative to the widget directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppInfo;
    use crate::services::catalog::test_support::catalog_with;
    use chrono::TimeZone;

    fn sample(catalog: &StyleCatalog) -> WidgetConfiguration {
        let style = catalog.get_module_style("classic-02").unwrap().clone();
        let mut modules = vec![None; WidgetKind::Main.slot_count()];
        modules[3] = Some(ModuleConfiguration::new(
            3,
            style,
            Some(AppInfo::new("Notes", "mobilenotes://")),
            None,
        ));

        WidgetConfiguration {
            id: Uuid::nil(),
            name: "Morning".to_string(),
            kind: WidgetKind::Main,
            style_identifier: "classic".to_string(),
            modules,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_record_round_trip() {
        let catalog = catalog_with(&["classic"]);
        let widget = sample(&catalog);

        let record = widget.to_persisted(Some("preview.png".to_string()));
        assert_eq!(record.modules.len(), 1);
        assert_eq!(record.modules[0].index, 3);

        let json = serde_json::to_string(&record).unwrap();
        let decoded: PersistableWidgetConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);

        let rebuilt = WidgetConfiguration::from_persisted(&decoded, &catalog).unwrap();
        assert_eq!(rebuilt, widget);
    }

    #[test]
    fn test_unknown_widget_style_fails() {
        let catalog = catalog_with(&["classic"]);
        let mut record = sample(&catalog).to_persisted(None);
        record.style_identifier = "retired".to_string();

        assert!(WidgetConfiguration::from_persisted(&record, &catalog).is_none());
    }

    #[test]
    fn test_out_of_range_slot_fails() {
        let catalog = catalog_with(&["classic"]);
        let mut record = sample(&catalog).to_persisted(None);
        record.modules[0].index = 6;

        assert!(WidgetConfiguration::from_persisted(&record, &catalog).is_none());
    }

    #[test]
    fn test_wrong_kind_variant_fails() {
        let catalog = catalog_with(&["classic"]);
        let mut record = sample(&catalog).to_persisted(None);
        record.modules[0].selected_style_key = "classic-aux-01".to_string();

        assert!(WidgetConfiguration::from_persisted(&record, &catalog).is_none());
    }

    #[test]
    fn test_duplicate_slot_fails() {
        let catalog = catalog_with(&["classic"]);
        let mut record = sample(&catalog).to_persisted(None);
        record.modules.push(record.modules[0].clone());

        assert!(WidgetConfiguration::from_persisted(&record, &catalog).is_none());
    }
}
