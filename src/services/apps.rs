//! Installed-app directory.
//!
//! The directory lives in `<root>/apps.json`. On first run it is seeded from
//! the bundled `data/apps.json`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::AppInfo;
use crate::services::store::write_atomic;

const APPS_FILE: &str = "apps.json";

/// Bundled app list used to seed an empty directory.
const BUNDLED_APPS: &str = include_str!("../../data/apps.json");

/// Name-sorted list of apps modules can launch.
#[derive(Debug, Clone)]
pub struct AppDirectory {
    path: PathBuf,
}

impl AppDirectory {
    /// Opens the directory stored under `root`. Nothing is read yet.
    #[must_use]
    pub fn open(root: &Path) -> Self {
        Self {
            path: root.join(APPS_FILE),
        }
    }

    /// Seeds the directory from the bundled list if it holds no apps.
    ///
    /// Returns the number of apps seeded (0 when the directory was already
    /// populated).
    pub fn execute_initial_setup(&self) -> Result<usize> {
        if !self.fetch_apps()?.is_empty() {
            return Ok(0);
        }

        let apps: Vec<AppInfo> =
            serde_json::from_str(BUNDLED_APPS).context("Failed to parse bundled apps.json")?;
        self.save_apps(apps.clone())
            .inspect_err(|e| tracing::error!("Failed to populate app directory: {e:#}"))?;

        tracing::info!("Populated apps with {} items", apps.len());
        Ok(apps.len())
    }

    /// All apps, sorted by name. A missing file means no apps.
    pub fn fetch_apps(&self) -> Result<Vec<AppInfo>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read app directory: {}", self.path.display()))?;
        let mut apps: Vec<AppInfo> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse app directory: {}", self.path.display()))?;

        apps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(apps)
    }

    /// Finds an app by exact name and URL scheme.
    pub fn find_app(&self, name: &str, url_scheme: &str) -> Result<Option<AppInfo>> {
        Ok(self
            .fetch_apps()?
            .into_iter()
            .find(|app| app.name == name && app.url_scheme == url_scheme))
    }

    /// Finds an app by name, ignoring case.
    pub fn fetch_app_named(&self, name: &str) -> Result<Option<AppInfo>> {
        Ok(self
            .fetch_apps()?
            .into_iter()
            .find(|app| app.name.eq_ignore_ascii_case(name)))
    }

    /// Replaces the stored list.
    pub fn save_apps(&self, mut apps: Vec<AppInfo>) -> Result<()> {
        apps.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(&apps).context("Failed to serialize app directory")?;
        write_atomic(&self.path, content.as_bytes())
    }
}
