//! Installed-app descriptors that modules launch.

use serde::{Deserialize, Serialize};

/// An app a module can be bound to.
///
/// Apps are identified by the pair of display name and URL scheme; two
/// entries with the same name but different schemes are distinct apps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppInfo {
    /// Display name (e.g., "Calendar")
    pub name: String,
    /// URL scheme used to open the app (e.g., "calshow://")
    pub url_scheme: String,
}

impl AppInfo {
    /// Creates a new app descriptor.
    pub fn new(name: impl Into<String>, url_scheme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_scheme: url_scheme.into(),
        }
    }
}
