//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the modulite binary (set by cargo at compile time)
pub fn modulite_bin() -> &'static str {
    env!("CARGO_BIN_EXE_modulite")
}

/// Style documents shipped with the crate.
pub fn bundled_styles_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("styles")
}

/// Isolated config, data, and styles directories for one test.
///
/// Every command runs with `MODULITE_CONFIG_DIR` pointing into the temp
/// directory so tests never touch the real configuration.
pub struct TestEnv {
    _temp_dir: TempDir,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub styles_dir: PathBuf,
}

impl TestEnv {
    /// Environment using the bundled style documents.
    pub fn new() -> Self {
        Self::with_styles_dir(bundled_styles_dir())
    }

    /// Environment with an empty styles directory of its own.
    pub fn with_own_styles() -> Self {
        let env = Self::new();
        let styles_dir = env.config_dir.join("styles");
        fs::create_dir_all(&styles_dir).expect("Failed to create styles dir");
        Self { styles_dir, ..env }
    }

    fn with_styles_dir(styles_dir: PathBuf) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_dir = temp_dir.path().join("config");
        let data_dir = temp_dir.path().join("data");
        Self {
            _temp_dir: temp_dir,
            config_dir,
            data_dir,
            styles_dir,
        }
    }

    /// Builds a command with the isolated directories applied.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(modulite_bin());
        cmd.env("MODULITE_CONFIG_DIR", &self.config_dir);
        cmd.arg("--styles-dir").arg(&self.styles_dir);
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd.args(args);
        cmd
    }

    /// Builds a command that leaves the styles directory at its default,
    /// `<config>/styles`.
    pub fn command_default_styles(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(modulite_bin());
        cmd.env("MODULITE_CONFIG_DIR", &self.config_dir);
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd.args(args);
        cmd
    }

    /// Runs a command and returns its output.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute command")
    }

    /// Runs a command and asserts it succeeded.
    pub fn run_ok(&self, args: &[&str]) -> Output {
        let output = self.run(args);
        assert_eq!(
            output.status.code(),
            Some(0),
            "`{}` should succeed. stderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Runs a command with `--json` and parses its stdout.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        let output = self.run_ok(&args);
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output")
    }

    /// Purchases the given styles.
    pub fn purchase(&self, ids: &[&str]) {
        let mut args = vec!["styles", "purchase"];
        args.extend_from_slice(ids);
        self.run_ok(&args);
    }

    /// Creates a widget and returns its id.
    pub fn create_widget(&self, kind: &str, style: &str, apps: &[&str]) -> String {
        let mut args = vec!["widget", "create", "--kind", kind, "--style", style];
        for app in apps {
            args.push("--app");
            args.push(app);
        }
        let record = self.run_json(&args);
        record["id"]
            .as_str()
            .expect("Record should carry an id")
            .to_string()
    }

    /// Path of a stored widget record.
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.data_dir.join("widgets").join(format!("{id}.json"))
    }

    /// Writes a minimal valid style document into the styles directory.
    pub fn write_style(&self, id: &str) -> PathBuf {
        let path = self.styles_dir.join(format!("{id}.json"));
        fs::write(&path, style_document(id)).expect("Failed to write style");
        path
    }
}

/// Minimal valid style document with two main and one auxiliary variant.
pub fn style_document(id: &str) -> String {
    format!(
        r##"{{
  "identifier": "{id}",
  "name": "{id}",
  "preview": "{id}-preview.png",
  "palette": {{ "main": ["#FFFFFF", "#FF0000"], "auxiliary": ["#000000"] }},
  "main_modules": [
    {{ "identifier": "{id}-01", "image": "{id}-01.png" }},
    {{ "identifier": "{id}-02", "image": "{id}-02.png", "default_color": "#00FF00" }}
  ],
  "aux_modules": [{{ "identifier": "{id}-aux-01", "image": "{id}-aux-01.png" }}],
  "main_empty": {{ "identifier": "{id}-empty-main", "image": "{id}-empty.png" }},
  "aux_empty": {{ "identifier": "{id}-empty-aux", "image": "{id}-empty.png" }}
}}"##
    )
}

/// Stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
