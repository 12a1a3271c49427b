//! Widget persistence.
//!
//! Widgets are stored one record per file under `<root>/widgets/`, next to
//! the rendered preview image:
//!
//! ```text
//! <root>/widgets/<uuid>.json
//! <root>/widgets/<uuid>.png
//! ```
//!
//! All writes go through a temp file + rename so a record is never left
//! half-written. Failures are logged and returned; nothing is retried.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::{PersistableWidgetConfiguration, WidgetConfiguration, WidgetKind};

const WIDGETS_DIR: &str = "widgets";

/// File-backed store of finalized widgets.
///
/// Constructed explicitly and passed by reference to whoever saves or lists
/// widgets.
#[derive(Debug, Clone)]
pub struct WidgetStore {
    root: PathBuf,
}

impl WidgetStore {
    /// Opens (and if needed creates) a store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let store = Self {
            root: root.to_path_buf(),
        };

        fs::create_dir_all(store.widgets_dir()).with_context(|| {
            format!(
                "Failed to create widget directory: {}",
                store.widgets_dir().display()
            )
        })?;

        Ok(store)
    }

    fn widgets_dir(&self) -> PathBuf {
        self.root.join(WIDGETS_DIR)
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.widgets_dir().join(format!("{id}.json"))
    }

    fn preview_file_name(id: Uuid) -> String {
        format!("{id}.png")
    }

    /// Absolute path of a record's preview image, if it has one.
    #[must_use]
    pub fn preview_path(&self, record: &PersistableWidgetConfiguration) -> Option<PathBuf> {
        record
            .preview_file
            .as_ref()
            .map(|file| self.widgets_dir().join(file))
    }

    /// Stores a newly built widget together with its rendered preview.
    ///
    /// Fails if a widget with the same id is already stored.
    pub fn register(
        &self,
        config: &WidgetConfiguration,
        preview: Option<&[u8]>,
    ) -> Result<PersistableWidgetConfiguration> {
        let result = self.register_inner(config, preview);
        if let Err(e) = &result {
            tracing::error!("Failed to register widget {}: {e:#}", config.id);
        }
        result
    }

    fn register_inner(
        &self,
        config: &WidgetConfiguration,
        preview: Option<&[u8]>,
    ) -> Result<PersistableWidgetConfiguration> {
        let path = self.record_path(config.id);
        if path.exists() {
            anyhow::bail!("Widget {} is already registered", config.id);
        }

        let preview_file = preview
            .map(|bytes| self.write_preview(config.id, bytes))
            .transpose()?;

        let record = config.to_persisted(preview_file);
        if let Err(e) = self.write_record(&record) {
            if let Some(preview) = self.preview_path(&record) {
                if let Err(cleanup) = fs::remove_file(&preview) {
                    tracing::warn!("Failed to remove preview {}: {cleanup}", preview.display());
                }
            }
            return Err(e);
        }

        tracing::info!("Registered widget '{}' ({})", record.name, record.id);
        Ok(record)
    }

    /// Overwrites a stored widget with an edited configuration.
    ///
    /// A new preview replaces the old one; without one the previous preview
    /// is kept.
    pub fn replace_widget(
        &self,
        config: &WidgetConfiguration,
        preview: Option<&[u8]>,
    ) -> Result<PersistableWidgetConfiguration> {
        let result = self.replace_inner(config, preview);
        if let Err(e) = &result {
            tracing::error!("Failed to update widget {}: {e:#}", config.id);
        }
        result
    }

    fn replace_inner(
        &self,
        config: &WidgetConfiguration,
        preview: Option<&[u8]>,
    ) -> Result<PersistableWidgetConfiguration> {
        let existing = self
            .fetch_widget(config.id)?
            .with_context(|| format!("Widget {} not found", config.id))?;

        let preview_file = match preview {
            Some(bytes) => Some(self.write_preview(config.id, bytes)?),
            None => existing.preview_file,
        };

        let record = config.to_persisted(preview_file);
        self.write_record(&record)?;

        tracing::info!("Updated widget '{}' ({})", record.name, record.id);
        Ok(record)
    }

    /// All stored widgets, newest first.
    pub fn fetch_widgets(&self) -> Result<Vec<PersistableWidgetConfiguration>> {
        let result = self.fetch_all();
        if let Err(e) = &result {
            tracing::error!("Failed to fetch widgets: {e:#}");
        }
        result
    }

    fn fetch_all(&self) -> Result<Vec<PersistableWidgetConfiguration>> {
        let dir = self.widgets_dir();
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read widget directory: {}", dir.display()))?;

        let mut records = Vec::new();
        for entry in entries {
            let path = entry.context("Failed to read directory entry")?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                records.push(read_record(&path)?);
            }
        }

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    /// Stored widgets of one kind, newest first.
    pub fn fetch_widgets_of_kind(
        &self,
        kind: WidgetKind,
    ) -> Result<Vec<PersistableWidgetConfiguration>> {
        Ok(self
            .fetch_widgets()?
            .into_iter()
            .filter(|record| record.kind == kind)
            .collect())
    }

    /// A single widget by id; `None` if it is not stored.
    pub fn fetch_widget(&self, id: Uuid) -> Result<Option<PersistableWidgetConfiguration>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    /// Number of stored widgets.
    pub fn widget_count(&self) -> Result<usize> {
        Ok(self.fetch_widgets()?.len())
    }

    /// Deletes a widget and its preview.
    ///
    /// Returns `false` (and logs) when no widget has this id.
    pub fn delete_widget(&self, id: Uuid) -> Result<bool> {
        let Some(record) = self.fetch_widget(id)? else {
            tracing::warn!("Widget with id {id} not found");
            return Ok(false);
        };

        if let Some(preview) = self.preview_path(&record) {
            if preview.exists() {
                fs::remove_file(&preview).with_context(|| {
                    format!("Failed to delete preview: {}", preview.display())
                })?;
            }
        }

        let path = self.record_path(id);
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete widget record: {}", path.display()))
            .inspect_err(|e| tracing::error!("Failed to delete widget {id}: {e:#}"))?;

        tracing::info!("Widget with id {id} deleted");
        Ok(true)
    }

    fn write_preview(&self, id: Uuid, bytes: &[u8]) -> Result<String> {
        let file = Self::preview_file_name(id);
        write_atomic(&self.widgets_dir().join(&file), bytes)?;
        Ok(file)
    }

    fn write_record(&self, record: &PersistableWidgetConfiguration) -> Result<()> {
        let content =
            serde_json::to_string_pretty(record).context("Failed to serialize widget record")?;
        write_atomic(&self.record_path(record.id), content.as_bytes())
    }
}

fn read_record(path: &Path) -> Result<PersistableWidgetConfiguration> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read widget record: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse widget record: {}", path.display()))
}

/// Writes `bytes` to `path` via a sibling `<file name>.tmp` and rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, bytes)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppInfo;
    use crate::services::catalog::test_support::catalog_with;
    use crate::services::WidgetConfigurationBuilder;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn widget(name: &str, kind: WidgetKind, age_minutes: i64) -> WidgetConfiguration {
        let catalog = catalog_with(&["classic"]);
        let mut builder = WidgetConfigurationBuilder::new(&catalog, kind, "classic").unwrap();
        builder
            .set_apps(vec![AppInfo::new("Mail", "message://")])
            .unwrap();
        builder.set_name(name).unwrap();

        let mut config = builder.build().unwrap();
        config.created_at = Utc::now() - Duration::minutes(age_minutes);
        config
    }

    #[test]
    fn test_register_and_fetch() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();
        let config = widget("Work", WidgetKind::Main, 0);

        let record = store.register(&config, Some(b"png-bytes")).unwrap();

        assert_eq!(record.preview_file.as_deref(), Some(format!("{}.png", config.id).as_str()));
        let preview = store.preview_path(&record).unwrap();
        assert_eq!(fs::read(preview).unwrap(), b"png-bytes");

        let fetched = store.fetch_widget(config.id).unwrap().unwrap();
        assert_eq!(fetched, record);
        assert_eq!(store.widget_count().unwrap(), 1);
    }

    #[test]
    fn test_failed_record_write_removes_preview() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();
        let config = widget("Work", WidgetKind::Main, 0);

        let widgets = temp.path().join(WIDGETS_DIR);
        fs::create_dir(widgets.join(format!("{}.json.tmp", config.id))).unwrap();

        assert!(store.register(&config, Some(b"png-bytes")).is_err());
        assert!(!widgets.join(format!("{}.png", config.id)).exists());
        assert!(store.fetch_widget(config.id).unwrap().is_none());
    }

    #[test]
    fn test_write_atomic_uses_distinct_temp_names() {
        let temp = TempDir::new().unwrap();
        let record = temp.path().join("a.json");
        let preview = temp.path().join("a.png");

        fs::create_dir(temp.path().join("a.png.tmp")).unwrap();
        write_atomic(&record, b"{}").unwrap();
        assert!(write_atomic(&preview, b"png").is_err());

        assert_eq!(fs::read(&record).unwrap(), b"{}");
        assert!(!temp.path().join("a.json.tmp").exists());
    }

    #[test]
    fn test_register_twice_fails() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();
        let config = widget("Work", WidgetKind::Main, 0);

        store.register(&config, None).unwrap();
        assert!(store.register(&config, None).is_err());
    }

    #[test]
    fn test_fetch_sorted_newest_first_and_by_kind() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();

        store.register(&widget("Old", WidgetKind::Main, 30), None).unwrap();
        store.register(&widget("New", WidgetKind::Auxiliary, 1), None).unwrap();
        store.register(&widget("Mid", WidgetKind::Main, 10), None).unwrap();

        let names: Vec<String> = store
            .fetch_widgets()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["New", "Mid", "Old"]);

        let aux = store.fetch_widgets_of_kind(WidgetKind::Auxiliary).unwrap();
        assert_eq!(aux.len(), 1);
        assert_eq!(aux[0].name, "New");
    }

    #[test]
    fn test_replace_keeps_preview_when_none_given() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();
        let mut config = widget("Work", WidgetKind::Main, 0);
        store.register(&config, Some(b"v1")).unwrap();

        config.name = "Play".to_string();
        let record = store.replace_widget(&config, None).unwrap();

        assert_eq!(record.name, "Play");
        assert!(record.preview_file.is_some());
        assert_eq!(store.widget_count().unwrap(), 1);
    }

    #[test]
    fn test_replace_unknown_widget_fails() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();
        let config = widget("Work", WidgetKind::Main, 0);

        assert!(store.replace_widget(&config, None).is_err());
    }

    #[test]
    fn test_delete_removes_record_and_preview() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();
        let config = widget("Work", WidgetKind::Main, 0);
        let record = store.register(&config, Some(b"img")).unwrap();
        let preview = store.preview_path(&record).unwrap();

        assert!(store.delete_widget(config.id).unwrap());
        assert!(!preview.exists());
        assert!(store.fetch_widget(config.id).unwrap().is_none());
        assert!(!store.delete_widget(config.id).unwrap());
    }

    #[test]
    fn test_corrupt_record_fails_fetch() {
        let temp = TempDir::new().unwrap();
        let store = WidgetStore::open(temp.path()).unwrap();
        fs::write(temp.path().join("widgets").join("broken.json"), "{").unwrap();

        assert!(store.fetch_widgets().is_err());
    }
}
