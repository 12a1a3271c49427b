//! Style catalog commands.
//!
//! Lists and shows styles, and records purchases in the configuration file.

use crate::cli::common::{print_json, CliError, CliResult, Workspace};
use crate::models::{ModuleStyle, WidgetKind, WidgetStyle};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Browse styles and manage purchases
#[derive(Debug, Clone, Args)]
pub struct StylesArgs {
    /// Styles subcommand
    #[command(subcommand)]
    pub command: StylesCommand,
}

/// Style subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum StylesCommand {
    /// List all styles in the catalog
    List(ListStylesArgs),
    /// Show one style with its module variants
    Show(ShowStyleArgs),
    /// Mark styles as purchased (replaces the purchased set)
    Purchase(PurchaseStylesArgs),
    /// Revoke all purchases
    Revoke,
}

/// List all styles
#[derive(Debug, Clone, Args)]
pub struct ListStylesArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show a single style
#[derive(Debug, Clone, Args)]
pub struct ShowStyleArgs {
    /// Style identifier
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Purchase styles
#[derive(Debug, Clone, Args)]
pub struct PurchaseStylesArgs {
    /// Identifiers of every style that should be owned
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

// JSON response types
#[derive(Debug, Serialize)]
struct StyleItem {
    identifier: String,
    name: String,
    purchased: bool,
    main_modules: usize,
    aux_modules: usize,
}

#[derive(Debug, Serialize)]
struct ListStylesResponse {
    styles: Vec<StyleItem>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct ModuleItem {
    identifier: String,
    kind: String,
    image: String,
    default_color: String,
    colors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct StyleDetail {
    identifier: String,
    name: String,
    preview: String,
    purchased: bool,
    main_palette: Vec<String>,
    aux_palette: Vec<String>,
    modules: Vec<ModuleItem>,
}

impl StylesArgs {
    /// Execute the styles command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        match &self.command {
            StylesCommand::List(args) => args.execute(workspace),
            StylesCommand::Show(args) => args.execute(workspace),
            StylesCommand::Purchase(args) => args.execute(workspace),
            StylesCommand::Revoke => revoke(workspace),
        }
    }
}

impl ListStylesArgs {
    /// Execute the list command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let catalog = workspace.load_catalog()?;

        let styles: Vec<StyleItem> = catalog
            .get_all_styles()
            .iter()
            .map(|style| StyleItem {
                identifier: style.identifier.clone(),
                name: style.name.clone(),
                purchased: style.is_purchased,
                main_modules: style.main_modules.len(),
                aux_modules: style.aux_modules.len(),
            })
            .collect();

        let response = ListStylesResponse {
            count: styles.len(),
            styles,
        };

        if self.json {
            print_json(&response)?;
        } else if response.count == 0 {
            println!("No styles found in {}.", workspace.styles_dir.display());
        } else {
            println!("Styles ({}):", response.count);
            println!();
            for style in response.styles {
                let owned = if style.purchased { "owned" } else { "-" };
                println!("  {:<20} {:<24} {}", style.identifier, style.name, owned);
            }
        }

        Ok(())
    }
}

impl ShowStyleArgs {
    /// Execute the show command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let catalog = workspace.load_catalog()?;
        let style = catalog
            .get_style(&self.id)
            .ok_or_else(|| CliError::not_found(format!("Style '{}' not found", self.id)))?;

        let detail = style_detail(style);

        if self.json {
            print_json(&detail)?;
            return Ok(());
        }

        println!("{} ({})", detail.name, detail.identifier);
        println!("  Preview:   {}", detail.preview);
        println!("  Purchased: {}", if detail.purchased { "yes" } else { "no" });
        println!("  Main palette: {}", detail.main_palette.join(" "));
        println!("  Aux palette:  {}", detail.aux_palette.join(" "));
        println!();
        println!("Modules:");
        for module in detail.modules {
            println!(
                "  {:<24} {:<16} {}",
                module.identifier, module.kind, module.default_color
            );
        }

        Ok(())
    }
}

impl PurchaseStylesArgs {
    /// Execute the purchase command
    pub fn execute(&self, workspace: &Workspace) -> CliResult<()> {
        let catalog = workspace.load_catalog()?;

        if let Some(unknown) = self.ids.iter().find(|id| catalog.get_style(id).is_none()) {
            return Err(CliError::not_found(format!("Style '{unknown}' not found")));
        }

        let mut config = workspace.config.clone();
        config.set_purchased_styles(self.ids.iter().cloned());
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        tracing::info!("Purchased styles set to {:?}", config.entitlements.purchased_styles);
        println!(
            "Purchased styles: {}",
            config
                .entitlements
                .purchased_styles
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(())
    }
}

fn revoke(workspace: &Workspace) -> CliResult<()> {
    let mut config = workspace.config.clone();
    config.set_purchased_styles(std::iter::empty());
    config
        .save()
        .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

    println!("All style purchases revoked.");
    Ok(())
}

fn style_detail(style: &WidgetStyle) -> StyleDetail {
    let module_item = |module: &ModuleStyle| {
        let palette = style.palette_for(module.kind.widget_kind());
        ModuleItem {
            identifier: module.identifier.clone(),
            kind: format!("{:?}", module.kind),
            image: module.image.clone(),
            default_color: module.resolved_default_color(palette).to_hex(),
            colors: module
                .available_colors(palette)
                .iter()
                .map(|c| c.to_hex())
                .collect(),
        }
    };

    StyleDetail {
        identifier: style.identifier.clone(),
        name: style.name.clone(),
        preview: style.preview.clone(),
        purchased: style.is_purchased,
        main_palette: hex_list(style.palette_for(WidgetKind::Main)),
        aux_palette: hex_list(style.palette_for(WidgetKind::Auxiliary)),
        modules: style.all_modules().map(module_item).collect(),
    }
}

fn hex_list(colors: &[crate::models::RgbColor]) -> Vec<String> {
    colors.iter().map(|c| c.to_hex()).collect()
}
