//! Mutable staging area for one widget while it is being edited.
//!
//! The builder holds one entry per slot of the widget (`None` = empty slot)
//! and produces an immutable [`WidgetConfiguration`] on [`build`].
//!
//! # Index contract
//!
//! Every index-taking accessor treats an out-of-range index like an empty
//! slot: getters return `None`/`false`, mutators return
//! [`BuilderError::NoModule`]. The one exception is [`move_item`], which
//! panics on out-of-range input.
//!
//! [`build`]: WidgetConfigurationBuilder::build
//! [`move_item`]: WidgetConfigurationBuilder::move_item

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::constants::MAX_WIDGET_NAME_LEN;
use crate::error::BuilderError;
use crate::models::{
    AppInfo, ModuleConfiguration, ModuleStyle, PersistableWidgetConfiguration, RgbColor,
    WidgetConfiguration, WidgetKind, WidgetStyle,
};
use crate::services::StyleCatalog;

/// Editing session state for a single widget.
///
/// Borrows the catalog for the whole session; purchase updates have to wait
/// until the builder is dropped.
#[derive(Debug, Clone)]
pub struct WidgetConfigurationBuilder<'a> {
    catalog: &'a StyleCatalog,
    style: &'a WidgetStyle,
    kind: WidgetKind,
    id: Uuid,
    created_at: Option<DateTime<Utc>>,
    name: Option<String>,
    modules: Vec<Option<ModuleConfiguration>>,
}

impl<'a> WidgetConfigurationBuilder<'a> {
    /// Starts a new widget of `kind` using the purchased style `style_identifier`.
    ///
    /// All slots start empty.
    pub fn new(
        catalog: &'a StyleCatalog,
        kind: WidgetKind,
        style_identifier: &str,
    ) -> Result<Self, BuilderError> {
        let style = purchased_style(catalog, style_identifier)?;

        Ok(Self {
            catalog,
            style,
            kind,
            id: Uuid::new_v4(),
            created_at: None,
            name: None,
            modules: vec![None; kind.slot_count()],
        })
    }

    /// Seeds a builder from a stored record.
    ///
    /// The id and creation time are kept so that building replaces the
    /// stored widget. Returns `None` when the record cannot be reconstructed
    /// with this catalog. Purchase state is not checked: editing a widget
    /// made with a since-revoked style stays possible.
    #[must_use]
    pub fn from_persisted(
        catalog: &'a StyleCatalog,
        record: &PersistableWidgetConfiguration,
    ) -> Option<Self> {
        let configuration = WidgetConfiguration::from_persisted(record, catalog)?;
        let style = catalog.get_style(&configuration.style_identifier)?;

        Some(Self {
            catalog,
            style,
            kind: configuration.kind,
            id: configuration.id,
            created_at: Some(configuration.created_at),
            name: Some(configuration.name),
            modules: configuration.modules,
        })
    }

    // ------------------------------------------------------------------
    // Widget-level state
    // ------------------------------------------------------------------

    /// Widget id the built configuration will carry.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Widget size class.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Currently selected widget style.
    #[must_use]
    pub const fn style(&self) -> &'a WidgetStyle {
        self.style
    }

    /// Name set so far, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the widget name.
    ///
    /// Leading and trailing whitespace is trimmed. Names must be non-empty,
    /// at most 24 characters, and on a single line.
    pub fn set_name(&mut self, name: &str) -> Result<(), BuilderError> {
        let name = validate_widget_name(name)?;
        self.name = Some(name);
        Ok(())
    }

    /// Switches the widget to another purchased style.
    ///
    /// Occupied slots keep their app and move to the new style's variant at
    /// `position % variants`; their colors reset to the new variant default.
    pub fn set_widget_style(&mut self, style_identifier: &str) -> Result<(), BuilderError> {
        let style = purchased_style(self.catalog, style_identifier)?;
        self.style = style;

        let variants = style.modules_for(self.kind);
        for module in self.modules.iter_mut().flatten() {
            module.selected_style = variants[module.position % variants.len()].clone();
            module.selected_color = None;
        }

        tracing::debug!("Widget {} switched to style '{}'", self.id, style_identifier);
        Ok(())
    }

    /// Replaces all slots with one module per app.
    ///
    /// App `i` lands at position `i` with the style's variant at
    /// `i % variants`; remaining slots become empty.
    pub fn set_apps(&mut self, apps: Vec<AppInfo>) -> Result<(), BuilderError> {
        let capacity = self.kind.slot_count();
        if apps.len() > capacity {
            return Err(BuilderError::TooManyApps {
                given: apps.len(),
                capacity,
            });
        }

        let variants = self.style.modules_for(self.kind);
        let mut modules: Vec<Option<ModuleConfiguration>> = apps
            .into_iter()
            .enumerate()
            .map(|(position, app)| {
                let style = variants[position % variants.len()].clone();
                Some(ModuleConfiguration::new(position, style, Some(app), None))
            })
            .collect();
        modules.resize(capacity, None);

        self.modules = modules;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Slot accessors
    // ------------------------------------------------------------------

    /// All slots in position order.
    #[must_use]
    pub fn get_current_modules(&self) -> &[Option<ModuleConfiguration>] {
        &self.modules
    }

    /// Module at `index`; `None` for an empty or out-of-range slot.
    #[must_use]
    pub fn get_module(&self, index: usize) -> Option<&ModuleConfiguration> {
        self.modules.get(index).and_then(Option::as_ref)
    }

    /// True for an empty or out-of-range slot.
    #[must_use]
    pub fn is_module_empty(&self, index: usize) -> bool {
        self.get_module(index).is_none()
    }

    /// Effective tint of the module at `index`.
    ///
    /// Falls back to the variant default when no color was chosen.
    #[must_use]
    pub fn get_module_color(&self, index: usize) -> Option<RgbColor> {
        let module = self.get_module(index)?;
        Some(module.selected_color.unwrap_or_else(|| {
            module
                .selected_style
                .resolved_default_color(self.style.palette_for(self.kind))
        }))
    }

    /// Sets the variant of the module at `index`.
    ///
    /// The variant must exist in the catalog and be a non-empty variant for
    /// this widget's kind.
    pub fn set_module_style(&mut self, index: usize, style: &ModuleStyle) -> Result<(), BuilderError> {
        if self.catalog.get_module_style(&style.identifier).is_none() {
            return Err(BuilderError::UnknownStyle(style.identifier.clone()));
        }
        if style.kind != self.kind.module_kind() {
            return Err(BuilderError::IncompatibleModuleStyle(style.identifier.clone()));
        }

        let module = self.module_mut(index)?;
        module.selected_style = style.clone();
        Ok(())
    }

    /// Sets the tint of the module at `index`.
    pub fn set_module_color(&mut self, index: usize, color: RgbColor) -> Result<(), BuilderError> {
        self.module_mut(index)?.selected_color = Some(color);
        Ok(())
    }

    /// Empties the slot at `index`.
    pub fn clear_module(&mut self, index: usize) -> Result<(), BuilderError> {
        match self.modules.get_mut(index) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                Ok(())
            }
            _ => Err(BuilderError::NoModule(index)),
        }
    }

    /// Moves the slot at `from` to `to`, shifting the slots in between.
    ///
    /// This is an array splice, not a swap: `[A, B, C, D]` with
    /// `move_item(0, 2)` becomes `[B, C, A, D]`. Every module's `position` is
    /// renumbered to its new index.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is not a valid slot index.
    pub fn move_item(&mut self, from: usize, to: usize) {
        let len = self.modules.len();
        assert!(
            from < len && to < len,
            "move_item({from}, {to}) out of range for {len} slots"
        );

        let slot = self.modules.remove(from);
        self.modules.insert(to, slot);

        for (position, module) in self.modules.iter_mut().enumerate() {
            if let Some(module) = module {
                module.position = position;
            }
        }
    }

    // ------------------------------------------------------------------
    // Catalog delegation
    // ------------------------------------------------------------------

    /// Variants selectable for this widget's occupied slots.
    #[must_use]
    pub fn get_available_styles(&self) -> &'a [ModuleStyle] {
        self.style.modules_for(self.kind)
    }

    /// Variant at `index` of [`get_available_styles`](Self::get_available_styles).
    #[must_use]
    pub fn get_available_style(&self, index: usize) -> Option<&'a ModuleStyle> {
        self.get_available_styles().get(index)
    }

    /// Palette of the widget style for this widget's kind.
    #[must_use]
    pub fn get_available_colors(&self) -> &'a [RgbColor] {
        self.style.palette_for(self.kind)
    }

    /// Color at `index` of [`get_available_colors`](Self::get_available_colors).
    #[must_use]
    pub fn get_available_color(&self, index: usize) -> Option<RgbColor> {
        self.get_available_colors().get(index).copied()
    }

    /// Colors offered to the module at `index`.
    ///
    /// A variant that declares its own colors narrows the palette; empty and
    /// out-of-range slots get an empty list.
    #[must_use]
    pub fn get_available_colors_for_module(&self, index: usize) -> &[RgbColor] {
        match self.get_module(index) {
            Some(module) => module
                .selected_style
                .available_colors(self.get_available_colors()),
            None => &[],
        }
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// Snapshots the current state into an immutable configuration.
    ///
    /// The only requirement is that a name has been set.
    pub fn build(&self) -> Result<WidgetConfiguration, BuilderError> {
        let name = self
            .name
            .clone()
            .ok_or_else(|| BuilderError::InvalidName("a name is required".to_string()))?;

        Ok(WidgetConfiguration {
            id: self.id,
            name,
            kind: self.kind,
            style_identifier: self.style.identifier.clone(),
            modules: self.modules.clone(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }

    fn module_mut(&mut self, index: usize) -> Result<&mut ModuleConfiguration, BuilderError> {
        self.modules
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(BuilderError::NoModule(index))
    }
}

/// Validates and normalizes a widget name.
pub fn validate_widget_name(name: &str) -> Result<String, BuilderError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(BuilderError::InvalidName("name cannot be empty".to_string()));
    }

    if trimmed.contains(|c| c == '\n' || c == '\r') {
        return Err(BuilderError::InvalidName(
            "name cannot contain line breaks".to_string(),
        ));
    }

    let length = trimmed.chars().count();
    if length > MAX_WIDGET_NAME_LEN {
        return Err(BuilderError::InvalidName(format!(
            "name exceeds {MAX_WIDGET_NAME_LEN} characters (got {length})"
        )));
    }

    Ok(trimmed.to_string())
}

/// Name suggested for a new widget when the user leaves it blank.
#[must_use]
pub fn placeholder_name(existing_widgets: usize) -> String {
    format!("Widget {}", existing_widgets + 1)
}

fn purchased_style<'a>(
    catalog: &'a StyleCatalog,
    identifier: &str,
) -> Result<&'a WidgetStyle, BuilderError> {
    let style = catalog
        .get_style(identifier)
        .ok_or_else(|| BuilderError::UnknownStyle(identifier.to_string()))?;

    if !style.is_purchased {
        return Err(BuilderError::StyleNotPurchased(identifier.to_string()));
    }

    Ok(style)
}
