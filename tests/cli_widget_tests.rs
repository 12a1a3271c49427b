//! End-to-end tests for `modulite widget` and `modulite apps` commands.

use std::fs;

mod fixtures;
use fixtures::*;

fn slot_apps(detail: &serde_json::Value) -> Vec<Option<String>> {
    detail["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["app"]["name"].as_str().map(str::to_string))
        .collect()
}

// ============================================================================
// Apps
// ============================================================================

#[test]
fn test_apps_list_seeds_directory() {
    let env = TestEnv::new();
    let result = env.run_json(&["apps", "list"]);

    let count = result["count"].as_u64().unwrap();
    assert!(count > 0);
    assert!(env.data_dir.join("apps.json").exists());

    let names: Vec<&str> = result["apps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "Apps should be sorted by name");

    // Second run must not reseed
    let again = env.run_json(&["apps", "list"]);
    assert_eq!(again["count"].as_u64().unwrap(), count);
}

// ============================================================================
// Create Command Tests
// ============================================================================

#[test]
fn test_widget_create_requires_purchase() {
    let env = TestEnv::new();
    let output = env.run(&["widget", "create", "--style", "classic", "--app", "Maps"]);

    assert_eq!(
        output.status.code(),
        Some(1),
        "Unpurchased style should be rejected"
    );
}

#[test]
fn test_widget_create_unknown_style() {
    let env = TestEnv::new();
    let output = env.run(&["widget", "create", "--style", "ghost"]);

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_widget_create_unknown_app() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let output = env.run(&["widget", "create", "--style", "classic", "--app", "NoSuchApp"]);

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_widget_create_too_many_apps() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let output = env.run(&[
        "widget", "create", "--kind", "aux", "--style", "classic", "--app", "Maps", "--app",
        "Notes", "--app", "Music", "--app", "Phone", "--app", "Mail",
    ]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_widget_create_and_show() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("main", "classic", &["Maps", "notes", "Music"]);

    assert!(env.record_path(&id).exists());

    let detail = env.run_json(&["widget", "show", &id]);
    assert_eq!(detail["name"], "Widget 1");
    assert_eq!(detail["kind"], "main");
    assert_eq!(detail["style"], "classic");

    let slots = detail["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 6);
    assert_eq!(
        slot_apps(&detail),
        [
            Some("Maps".to_string()),
            Some("Notes".to_string()),
            Some("Music".to_string()),
            None,
            None,
            None
        ]
    );
    assert_eq!(slots[0]["module_style"], "classic-01");
    assert_eq!(slots[1]["module_style"], "classic-02");
    // classic-01 defaults to the second palette color
    assert_eq!(slots[0]["color"], "#FF9500");
    // classic-02 falls back to the first palette color
    assert_eq!(slots[1]["color"], "#F2F2F7");
}

#[test]
fn test_widget_create_with_name_and_preview() {
    let env = TestEnv::new();
    env.purchase(&["neon"]);
    let preview = env.data_dir.with_file_name("preview.png");
    fs::write(&preview, b"\x89PNG fake").unwrap();

    let record = env.run_json(&[
        "widget",
        "create",
        "--kind",
        "aux",
        "--style",
        "neon",
        "--app",
        "Phone",
        "--name",
        "  Evening  ",
        "--preview",
        preview.to_str().unwrap(),
    ]);

    assert_eq!(record["name"], "Evening");
    assert_eq!(record["kind"], "auxiliary");
    let id = record["id"].as_str().unwrap();
    let stored = env.data_dir.join("widgets").join(format!("{id}.png"));
    assert_eq!(fs::read(stored).unwrap(), b"\x89PNG fake");
}

#[test]
fn test_widget_create_rejects_long_name() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let output = env.run(&[
        "widget",
        "create",
        "--style",
        "classic",
        "--name",
        "A name that is far too long for a widget",
    ]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_widget_placeholder_names_count_up() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let first = env.create_widget("main", "classic", &["Maps"]);
    let second = env.create_widget("main", "classic", &["Maps"]);

    assert_eq!(env.run_json(&["widget", "show", &first])["name"], "Widget 1");
    assert_eq!(env.run_json(&["widget", "show", &second])["name"], "Widget 2");
}

// ============================================================================
// List / Delete Tests
// ============================================================================

#[test]
fn test_widget_list_filters_by_kind() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    env.create_widget("main", "classic", &["Maps"]);
    let aux = env.create_widget("aux", "classic", &["Maps"]);

    assert_eq!(env.run_json(&["widget", "list"])["count"], 2);

    let result = env.run_json(&["widget", "list", "--kind", "aux"]);
    assert_eq!(result["count"], 1);
    assert_eq!(result["widgets"][0]["id"], aux.as_str());
}

#[test]
fn test_widget_list_empty() {
    let env = TestEnv::new();
    let output = env.run_ok(&["widget", "list"]);

    assert!(stdout(&output).contains("No widgets"));
}

#[test]
fn test_widget_delete() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("main", "classic", &["Maps"]);

    env.run_ok(&["widget", "delete", &id]);
    assert!(!env.record_path(&id).exists());

    let output = env.run(&["widget", "delete", &id]);
    assert_eq!(output.status.code(), Some(3), "Second delete should be not found");
}

#[test]
fn test_widget_show_invalid_id() {
    let env = TestEnv::new();
    let output = env.run(&["widget", "show", "not-a-uuid"]);

    assert_eq!(output.status.code(), Some(1));
}

// ============================================================================
// Edit Command Tests
// ============================================================================

#[test]
fn test_widget_move_splices() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("aux", "classic", &["Maps", "Notes", "Music", "Phone"]);

    env.run_ok(&["widget", "move", &id, "--from", "0", "--to", "2"]);

    let detail = env.run_json(&["widget", "show", &id]);
    assert_eq!(
        slot_apps(&detail),
        [
            Some("Notes".to_string()),
            Some("Music".to_string()),
            Some("Maps".to_string()),
            Some("Phone".to_string())
        ]
    );
}

#[test]
fn test_widget_move_out_of_range() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("aux", "classic", &["Maps"]);

    let output = env.run(&["widget", "move", &id, "--from", "0", "--to", "9"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_widget_set_style_and_color() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("main", "classic", &["Maps", "Notes"]);

    env.run_ok(&[
        "widget",
        "set-style",
        &id,
        "--index",
        "1",
        "--module-style",
        "classic-05",
    ]);
    env.run_ok(&["widget", "set-color", &id, "--index", "1", "--color", "#0af"]);

    let detail = env.run_json(&["widget", "show", &id]);
    assert_eq!(detail["slots"][1]["module_style"], "classic-05");
    assert_eq!(detail["slots"][1]["color"], "#00AAFF");
}

#[test]
fn test_widget_set_style_rejects_other_kind() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("main", "classic", &["Maps"]);

    let output = env.run(&[
        "widget",
        "set-style",
        &id,
        "--index",
        "0",
        "--module-style",
        "classic-aux-01",
    ]);
    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn test_widget_set_color_invalid_hex() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("main", "classic", &["Maps"]);

    let output = env.run(&["widget", "set-color", &id, "--index", "0", "--color", "orange"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_widget_set_color_on_empty_slot() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("main", "classic", &["Maps"]);

    let output = env.run(&["widget", "set-color", &id, "--index", "4", "--color", "#FFFFFF"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_widget_clear_and_rename() {
    let env = TestEnv::new();
    env.purchase(&["classic"]);
    let id = env.create_widget("main", "classic", &["Maps", "Notes"]);
    let created_at = env.run_json(&["widget", "show", &id])["created_at"].clone();

    env.run_ok(&["widget", "clear", &id, "--index", "0"]);
    env.run_ok(&["widget", "rename", &id, "--name", "Commute"]);

    let detail = env.run_json(&["widget", "show", &id]);
    assert_eq!(detail["name"], "Commute");
    assert_eq!(detail["created_at"], created_at);
    assert_eq!(slot_apps(&detail)[0], None);
    assert_eq!(slot_apps(&detail)[1], Some("Notes".to_string()));

    let output = env.run(&["widget", "clear", &id, "--index", "0"]);
    assert_eq!(output.status.code(), Some(1), "Clearing an empty slot fails");
}

#[test]
fn test_widget_restyle_keeps_apps() {
    let env = TestEnv::new();
    env.purchase(&["classic", "mono"]);
    let id = env.create_widget("main", "classic", &["Maps", "Notes"]);

    env.run_ok(&["widget", "restyle", &id, "--style", "mono"]);

    let detail = env.run_json(&["widget", "show", &id]);
    assert_eq!(detail["style"], "mono");
    assert_eq!(detail["slots"][0]["module_style"], "mono-01");
    assert_eq!(detail["slots"][1]["module_style"], "mono-02");
    assert_eq!(slot_apps(&detail)[1], Some("Notes".to_string()));
}

#[test]
fn test_widget_edit_missing_widget() {
    let env = TestEnv::new();
    let output = env.run(&[
        "widget",
        "rename",
        "00000000-0000-0000-0000-000000000000",
        "--name",
        "X",
    ]);

    assert_eq!(output.status.code(), Some(3));
}
