//! Editor session: a builder plus the currently selected cell.

use crate::error::EditorError;
use crate::models::{ModuleStyle, PersistableWidgetConfiguration, RgbColor};
use crate::services::{WidgetConfigurationBuilder, WidgetStore};

/// Drives a [`WidgetConfigurationBuilder`] from cell-selection events.
///
/// Style and color changes always target the selected cell. Reads and writes
/// happen on one thread; there is no locking.
#[derive(Debug)]
pub struct WidgetEditor<'a> {
    builder: WidgetConfigurationBuilder<'a>,
    selected: Option<usize>,
}

impl<'a> WidgetEditor<'a> {
    /// Starts an editing session with nothing selected.
    #[must_use]
    pub fn new(builder: WidgetConfigurationBuilder<'a>) -> Self {
        Self {
            builder,
            selected: None,
        }
    }

    /// Read access to the underlying builder.
    #[must_use]
    pub const fn builder(&self) -> &WidgetConfigurationBuilder<'a> {
        &self.builder
    }

    /// Mutable access for widget-level changes (name, apps, style).
    pub fn builder_mut(&mut self) -> &mut WidgetConfigurationBuilder<'a> {
        &mut self.builder
    }

    /// Index of the selected cell.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Selects the cell at `index`; selecting the selected cell deselects it.
    pub fn select_cell(&mut self, index: usize) {
        if self.selected == Some(index) {
            self.selected = None;
        } else {
            self.selected = Some(index);
        }
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Effective color of the selected module.
    #[must_use]
    pub fn selected_module_color(&self) -> Option<RgbColor> {
        let Some(index) = self.selected else {
            tracing::debug!("Tried to get color without selecting any module");
            return None;
        };
        self.builder.get_module_color(index)
    }

    /// Variant of the selected module.
    #[must_use]
    pub fn selected_module_style(&self) -> Option<&ModuleStyle> {
        let Some(index) = self.selected else {
            tracing::debug!("Tried to get style without selecting any module");
            return None;
        };
        self.builder.get_module(index).map(|m| &m.selected_style)
    }

    /// Colors offered to the selected module; empty when nothing is selected.
    #[must_use]
    pub fn available_colors_for_selected(&self) -> &[RgbColor] {
        match self.selected {
            Some(index) => self.builder.get_available_colors_for_module(index),
            None => &[],
        }
    }

    /// Applies a variant to the selected module.
    pub fn apply_style_to_selected(&mut self, style: &ModuleStyle) -> Result<(), EditorError> {
        let index = self.selected.ok_or(EditorError::NothingSelected)?;
        self.builder.set_module_style(index, style)?;
        Ok(())
    }

    /// Applies a tint to the selected module.
    pub fn apply_color_to_selected(&mut self, color: RgbColor) -> Result<(), EditorError> {
        let index = self.selected.ok_or(EditorError::NothingSelected)?;
        self.builder.set_module_color(index, color)?;
        Ok(())
    }

    /// Moves a cell; a selected cell stays selected at its new index.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is out of range, like
    /// [`WidgetConfigurationBuilder::move_item`].
    pub fn move_item(&mut self, from: usize, to: usize) {
        self.builder.move_item(from, to);

        self.selected = self.selected.map(|index| {
            if index == from {
                to
            } else if from < index && index <= to {
                index - 1
            } else if to <= index && index < from {
                index + 1
            } else {
                index
            }
        });
    }

    /// Builds the widget and stores it with its preview.
    ///
    /// Widgets that already exist in the store are replaced, new ones are
    /// registered.
    pub fn save(
        &self,
        store: &WidgetStore,
        preview: Option<&[u8]>,
    ) -> Result<PersistableWidgetConfiguration, EditorError> {
        let config = self.builder.build()?;

        let record = if store.fetch_widget(config.id)?.is_some() {
            store.replace_widget(&config, preview)?
        } else {
            store.register(&config, preview)?
        };

        Ok(record)
    }
}
