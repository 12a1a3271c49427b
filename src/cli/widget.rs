//! Widget commands.
//!
//! Every command loads the catalog and the store, applies one edit through a
//! [`WidgetEditor`], and saves the result.

use crate::cli::common::{
    fetch_record, parse_widget_id, print_json, CliError, CliResult, Workspace,
};
use crate::models::{AppInfo, PersistableWidgetConfiguration, RgbColor, WidgetKind};
use crate::services::{
    placeholder_name, StyleCatalog, WidgetConfigurationBuilder, WidgetEditor, WidgetStore,
};
use clap::{Args, Subcommand};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Create and edit widgets
#[derive(Debug, Clone, Args)]
pub struct WidgetArgs {
    /// Widget subcommand
    #[command(subcommand)]
    pub command: WidgetCommand,
}

/// Widget subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum WidgetCommand {
    /// Create a widget with one module per app
    Create(CreateWidgetArgs),
    /// List stored widgets, newest first
    List(ListWidgetsArgs),
    /// Show one widget
    Show(ShowWidgetArgs),
    /// Delete a widget and its preview
    Delete(DeleteWidgetArgs),
    /// Move a module to another slot
    Move(MoveModuleArgs),
    /// Change the variant of one module
    SetStyle(SetModuleStyleArgs),
    /// Change the tint of one module
    SetColor(SetModuleColorArgs),
    /// Empty one slot
    Clear(ClearModuleArgs),
    /// Rename a widget
    Rename(RenameWidgetArgs),
    /// Switch a widget to another style
    Restyle(RestyleWidgetArgs),
}

/// Create a widget
#[derive(Debug, Clone, Args)]
pub struct CreateWidgetArgs {
    /// Widget kind (main or aux); defaults to the configured kind
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Widget style identifier
    #[arg(long, value_name = "ID")]
    pub style: String,

    /// App name to bind, in slot order (repeatable)
    #[arg(long = "app", value_name = "NAME")]
    pub apps: Vec<String>,

    /// Widget name (defaults to "Widget N")
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Rendered preview image to store with the widget
    #[arg(long, value_name = "FILE")]
    pub preview: Option<PathBuf>,

    /// Output the stored record as JSON
    #[arg(long)]
    pub json: bool,
}

/// List widgets
#[derive(Debug, Clone, Args)]
pub struct ListWidgetsArgs {
    /// Only widgets of this kind (main or aux)
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show a widget
#[derive(Debug, Clone, Args)]
pub struct ShowWidgetArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Delete a widget
#[derive(Debug, Clone, Args)]
pub struct DeleteWidgetArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,
}

/// Move a module
#[derive(Debug, Clone, Args)]
pub struct MoveModuleArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,

    /// Current slot index
    #[arg(long, value_name = "INDEX")]
    pub from: usize,

    /// Target slot index
    #[arg(long, value_name = "INDEX")]
    pub to: usize,
}

/// Change a module variant
#[derive(Debug, Clone, Args)]
pub struct SetModuleStyleArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,

    /// Slot index
    #[arg(long, value_name = "INDEX")]
    pub index: usize,

    /// Module style identifier
    #[arg(long, value_name = "ID")]
    pub module_style: String,
}

/// Change a module tint
#[derive(Debug, Clone, Args)]
pub struct SetModuleColorArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,

    /// Slot index
    #[arg(long, value_name = "INDEX")]
    pub index: usize,

    /// Color in hex format (#RRGGBB or #RGB)
    #[arg(long, value_name = "HEX")]
    pub color: String,
}

/// Empty a slot
#[derive(Debug, Clone, Args)]
pub struct ClearModuleArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,

    /// Slot index
    #[arg(long, value_name = "INDEX")]
    pub index: usize,
}

/// Rename a widget
#[derive(Debug, Clone, Args)]
pub struct RenameWidgetArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,

    /// New name
    #[arg(long, value_name = "NAME")]
    pub name: String,
}

/// Switch widget style
#[derive(Debug, Clone, Args)]
pub struct RestyleWidgetArgs {
    /// Widget id
    #[arg(value_name = "UUID")]
    pub id: String,

    /// New widget style identifier
    #[arg(long, value_name = "ID")]
    pub style: String,
}

// JSON response types
#[derive(Debug, Serialize)]
struct WidgetItem {
    id: Uuid,
    name: String,
    kind: WidgetKind,
    style: String,
    modules: usize,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct ListWidgetsResponse {
    widgets: Vec<WidgetItem>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct SlotItem {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    app: Option<AppInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    module_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(Debug, Serialize)]
struct WidgetDetail {
    id: Uuid,
    name: String,
    kind: WidgetKind,
    style: String,
    created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<PathBuf>,
    slots: Vec<SlotItem>,
}

impl WidgetArgs {
    /// Execute the widget command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        match &self.command {
            WidgetCommand::Create(args) => args.execute(workspace),
            WidgetCommand::List(args) => args.execute(workspace),
            WidgetCommand::Show(args) => args.execute(workspace),
            WidgetCommand::Delete(args) => args.execute(workspace),
            WidgetCommand::Move(args) => args.execute(workspace),
            WidgetCommand::SetStyle(args) => args.execute(workspace),
            WidgetCommand::SetColor(args) => args.execute(workspace),
            WidgetCommand::Clear(args) => args.execute(workspace),
            WidgetCommand::Rename(args) => args.execute(workspace),
            WidgetCommand::Restyle(args) => args.execute(workspace),
        }
    }
}

impl CreateWidgetArgs {
    /// Execute the create command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let kind = match &self.kind {
            Some(kind) => parse_kind(kind)?,
            None => workspace.config.editor.default_kind,
        };

        let catalog = workspace.load_catalog()?;
        let store = workspace.open_store()?;
        let directory = workspace.app_directory()?;

        let mut apps = Vec::with_capacity(self.apps.len());
        for name in &self.apps {
            let app = directory
                .fetch_app_named(name)
                .map_err(|e| CliError::io(format!("{e:#}")))?
                .ok_or_else(|| CliError::not_found(format!("App '{name}' not found")))?;
            apps.push(app);
        }

        let preview = self
            .preview
            .as_ref()
            .map(|path| {
                std::fs::read(path).map_err(|e| {
                    CliError::io(format!("Failed to read preview {}: {e}", path.display()))
                })
            })
            .transpose()?;

        let mut builder = WidgetConfigurationBuilder::new(&catalog, kind, &self.style)?;
        builder.set_apps(apps)?;

        let name = match &self.name {
            Some(name) => name.clone(),
            None => placeholder_name(
                store
                    .widget_count()
                    .map_err(|e| CliError::io(format!("{e:#}")))?,
            ),
        };
        builder.set_name(&name)?;

        let editor = WidgetEditor::new(builder);
        let record = editor.save(&store, preview.as_deref())?;

        if self.json {
            print_json(&record)?;
        } else {
            println!("Widget '{}' created: {}", record.name, record.id);
        }
        Ok(())
    }
}

impl ListWidgetsArgs {
    /// Execute the list command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let store = workspace.open_store()?;

        let records = match &self.kind {
            Some(kind) => store.fetch_widgets_of_kind(parse_kind(kind)?),
            None => store.fetch_widgets(),
        }
        .map_err(|e| CliError::io(format!("{e:#}")))?;

        let widgets: Vec<WidgetItem> = records
            .into_iter()
            .map(|record| WidgetItem {
                id: record.id,
                name: record.name,
                kind: record.kind,
                style: record.style_identifier,
                modules: record.modules.len(),
                created_at: record.created_at.to_rfc3339(),
            })
            .collect();

        let response = ListWidgetsResponse {
            count: widgets.len(),
            widgets,
        };

        if self.json {
            print_json(&response)?;
        } else if response.count == 0 {
            println!("No widgets.");
        } else {
            println!("Widgets ({}):", response.count);
            println!();
            for widget in response.widgets {
                println!(
                    "  {}  {:<24} {:<9} {:<12} {} modules",
                    widget.id, widget.name, widget.kind, widget.style, widget.modules
                );
            }
        }

        Ok(())
    }
}

impl ShowWidgetArgs {
    /// Execute the show command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let id = parse_widget_id(&self.id)?;
        let catalog = workspace.load_catalog()?;
        let store = workspace.open_store()?;
        let record = fetch_record(&store, id)?;

        let detail = widget_detail(&catalog, &store, &record);

        if self.json {
            print_json(&detail)?;
            return Ok(());
        }

        println!("{} ({})", detail.name, detail.id);
        println!("  Kind:    {}", detail.kind);
        println!("  Style:   {}", detail.style);
        println!("  Created: {}", detail.created_at);
        if let Some(preview) = &detail.preview {
            println!("  Preview: {}", preview.display());
        }
        println!();
        for slot in detail.slots {
            match (slot.app, slot.module_style) {
                (app, Some(module_style)) => println!(
                    "  [{}] {:<20} {:<24} {}",
                    slot.index,
                    app.map(|a| a.name).unwrap_or_default(),
                    module_style,
                    slot.color.unwrap_or_default()
                ),
                _ => println!("  [{}] (empty)", slot.index),
            }
        }

        Ok(())
    }
}

impl DeleteWidgetArgs {
    /// Execute the delete command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let id = parse_widget_id(&self.id)?;
        let store = workspace.open_store()?;

        let deleted = store
            .delete_widget(id)
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        if !deleted {
            return Err(CliError::not_found(format!("Widget '{id}' not found")));
        }

        println!("Widget '{id}' deleted.");
        Ok(())
    }
}

impl MoveModuleArgs {
    /// Execute the move command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        edit_widget(workspace, &self.id, |editor| {
            let slots = editor.builder().get_current_modules().len();
            for index in [self.from, self.to] {
                if index >= slots {
                    return Err(CliError::validation(format!(
                        "Slot {index} is out of range (widget has {slots} slots)"
                    )));
                }
            }
            editor.move_item(self.from, self.to);
            Ok(())
        })?;

        println!("Moved module {} to {}.", self.from, self.to);
        Ok(())
    }
}

impl SetModuleStyleArgs {
    /// Execute the set-style command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        edit_widget(workspace, &self.id, |editor| {
            let builder = editor.builder();
            let style = builder
                .get_available_styles()
                .iter()
                .find(|s| s.identifier == self.module_style)
                .cloned()
                .ok_or_else(|| {
                    CliError::not_found(format!(
                        "Module style '{}' not available for this widget",
                        self.module_style
                    ))
                })?;

            editor.select_cell(self.index);
            editor.apply_style_to_selected(&style)?;
            Ok(())
        })?;

        println!("Module {} now uses '{}'.", self.index, self.module_style);
        Ok(())
    }
}

impl SetModuleColorArgs {
    /// Execute the set-color command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let color = validate_and_parse_hex(&self.color).map_err(CliError::validation)?;

        edit_widget(workspace, &self.id, |editor| {
            editor.select_cell(self.index);
            editor.apply_color_to_selected(color)?;
            Ok(())
        })?;

        println!("Module {} tinted {}.", self.index, color);
        Ok(())
    }
}

impl ClearModuleArgs {
    /// Execute the clear command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        edit_widget(workspace, &self.id, |editor| {
            editor.builder_mut().clear_module(self.index)?;
            Ok(())
        })?;

        println!("Slot {} cleared.", self.index);
        Ok(())
    }
}

impl RenameWidgetArgs {
    /// Execute the rename command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let record = edit_widget(workspace, &self.id, |editor| {
            editor.builder_mut().set_name(&self.name)?;
            Ok(())
        })?;

        println!("Widget renamed to '{}'.", record.name);
        Ok(())
    }
}

impl RestyleWidgetArgs {
    /// Execute the restyle command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        edit_widget(workspace, &self.id, |editor| {
            editor.builder_mut().set_widget_style(&self.style)?;
            Ok(())
        })?;

        println!("Widget now uses style '{}'.", self.style);
        Ok(())
    }
}

/// Loads a stored widget into an editor, applies `edit`, and saves it back.
fn edit_widget<F>(
    workspace: &Workspace,
    id: &str,
    edit: F,
) -> CliResult<PersistableWidgetConfiguration>
where
    F: FnOnce(&mut WidgetEditor<'_>) -> CliResult<()>,
{
    let id = parse_widget_id(id)?;
    let catalog = workspace.load_catalog()?;
    let store = workspace.open_store()?;
    let record = fetch_record(&store, id)?;

    let builder = WidgetConfigurationBuilder::from_persisted(&catalog, &record).ok_or_else(|| {
        CliError::validation(format!(
            "Widget '{id}' references styles missing from {}",
            workspace.styles_dir.display()
        ))
    })?;

    let mut editor = WidgetEditor::new(builder);
    edit(&mut editor)?;
    Ok(editor.save(&store, None)?)
}

fn widget_detail(
    catalog: &StyleCatalog,
    store: &WidgetStore,
    record: &PersistableWidgetConfiguration,
) -> WidgetDetail {
    let slot_count = record.kind.slot_count();
    let mut slots: Vec<SlotItem> = (0..slot_count)
        .map(|index| SlotItem {
            index,
            app: None,
            module_style: None,
            color: None,
        })
        .collect();

    match WidgetConfigurationBuilder::from_persisted(catalog, record) {
        Some(builder) => {
            for (slot, module) in slots.iter_mut().zip(builder.get_current_modules()) {
                if let Some(module) = module {
                    slot.app.clone_from(&module.app);
                    slot.module_style = Some(module.selected_style.identifier.clone());
                    slot.color = builder.get_module_color(slot.index).map(|c| c.to_hex());
                }
            }
        }
        None => {
            tracing::warn!(
                "Widget {} cannot be resolved against the catalog; showing stored values",
                record.id
            );
            for module in &record.modules {
                if let Some(slot) = slots.get_mut(module.index) {
                    slot.app = match (&module.app_name, &module.url_scheme) {
                        (Some(name), Some(scheme)) => Some(AppInfo::new(name, scheme)),
                        _ => None,
                    };
                    slot.module_style = Some(module.selected_style_key.clone());
                    slot.color = module.selected_color.map(|c| c.to_hex());
                }
            }
        }
    }

    WidgetDetail {
        id: record.id,
        name: record.name.clone(),
        kind: record.kind,
        style: record.style_identifier.clone(),
        created_at: record.created_at.to_rfc3339(),
        preview: store.preview_path(record),
        slots,
    }
}

fn parse_kind(kind: &str) -> CliResult<WidgetKind> {
    kind.parse()
        .map_err(|e: anyhow::Error| CliError::validation(e.to_string()))
}

/// Validates hex color format (#RRGGBB or #RGB) and returns RgbColor
fn validate_and_parse_hex(color: &str) -> Result<RgbColor, String> {
    let hex_regex = Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$")
        .map_err(|_| "Failed to create hex regex".to_string())?;

    if !hex_regex.is_match(color) {
        return Err(format!(
            "Invalid hex color format: '{color}'. Expected #RRGGBB or #RGB"
        ));
    }

    RgbColor::from_hex(color).map_err(|e| format!("Failed to parse color: {e}"))
}
