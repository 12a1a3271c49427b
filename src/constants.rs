//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "Modulite";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "modulite";

/// Longest widget name accepted, in characters.
pub const MAX_WIDGET_NAME_LEN: usize = 24;

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "MODULITE_CONFIG_DIR";
