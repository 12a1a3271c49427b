//! Widget styles and the module variants they bundle.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::RgbColor;

/// Size class of a widget.
///
/// The kind decides how many module slots a widget has and which module
/// variants of a style apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Large widget with six module slots
    #[default]
    Main,
    /// Small widget with four module slots
    Auxiliary,
}

impl WidgetKind {
    /// Number of module slots a widget of this kind holds.
    #[must_use]
    pub const fn slot_count(self) -> usize {
        match self {
            Self::Main => 6,
            Self::Auxiliary => 4,
        }
    }

    /// Module kind used for occupied slots of this widget kind.
    #[must_use]
    pub const fn module_kind(self) -> ModuleKind {
        match self {
            Self::Main => ModuleKind::Main,
            Self::Auxiliary => ModuleKind::Auxiliary,
        }
    }

    /// Lowercase name as used in records and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Auxiliary => "auxiliary",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" => Ok(Self::Main),
            "aux" | "auxiliary" => Ok(Self::Auxiliary),
            other => anyhow::bail!("Unknown widget kind '{other}'. Expected 'main' or 'aux'"),
        }
    }
}

/// Which slot family a module variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Occupied slot in a main widget
    Main,
    /// Occupied slot in an auxiliary widget
    Auxiliary,
    /// Placeholder for an empty main slot
    EmptyMain,
    /// Placeholder for an empty auxiliary slot
    EmptyAuxiliary,
}

impl ModuleKind {
    /// Returns true for the placeholder variants.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::EmptyMain | Self::EmptyAuxiliary)
    }

    /// Widget kind this module variant is drawn in.
    #[must_use]
    pub const fn widget_kind(self) -> WidgetKind {
        match self {
            Self::Main | Self::EmptyMain => WidgetKind::Main,
            Self::Auxiliary | Self::EmptyAuxiliary => WidgetKind::Auxiliary,
        }
    }
}

/// One visual variant of a module tile.
///
/// Module styles are referenced by `identifier` everywhere outside the
/// catalog; two module styles are the same selection iff their identifiers
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStyle {
    /// Stable key, unique across the whole catalog (e.g., "classic-main-01")
    pub identifier: String,
    /// Slot family of this variant
    pub kind: ModuleKind,
    /// Asset name of the tile artwork
    pub image: String,
    /// Colors offered for this variant; empty means the style palette applies
    pub colors: Vec<RgbColor>,
    /// Tint applied when a module is created with this variant
    pub default_color: Option<RgbColor>,
}

impl ModuleStyle {
    /// Colors selectable for this variant, falling back to the given palette.
    #[must_use]
    pub fn available_colors<'a>(&'a self, palette: &'a [RgbColor]) -> &'a [RgbColor] {
        if self.colors.is_empty() {
            palette
        } else {
            &self.colors
        }
    }

    /// Initial tint for a module using this variant.
    ///
    /// Resolution order: the declared default, the first variant color, the
    /// first palette color, white.
    #[must_use]
    pub fn resolved_default_color(&self, palette: &[RgbColor]) -> RgbColor {
        self.default_color
            .or_else(|| self.colors.first().copied())
            .or_else(|| palette.first().copied())
            .unwrap_or_default()
    }
}

/// Per-kind color palettes declared by a style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StylePalette {
    /// Colors offered to main widget modules
    #[serde(default)]
    pub main: Vec<RgbColor>,
    /// Colors offered to auxiliary widget modules
    #[serde(default)]
    pub auxiliary: Vec<RgbColor>,
}

/// A named visual theme bundling module variants for both widget kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetStyle {
    /// Stable key used for persistence and purchases (e.g., "classic")
    pub identifier: String,
    /// Display name (e.g., "Classic")
    pub name: String,
    /// Asset name of the style preview
    pub preview: String,
    /// Color palettes per widget kind
    pub palette: StylePalette,
    /// Variants for occupied main slots
    pub main_modules: Vec<ModuleStyle>,
    /// Variants for occupied auxiliary slots
    pub aux_modules: Vec<ModuleStyle>,
    /// Placeholder for empty main slots
    pub main_empty: ModuleStyle,
    /// Placeholder for empty auxiliary slots
    pub aux_empty: ModuleStyle,
    /// Whether the user owns this style
    pub is_purchased: bool,
}

impl WidgetStyle {
    /// Variants available for occupied slots of the given widget kind.
    #[must_use]
    pub fn modules_for(&self, kind: WidgetKind) -> &[ModuleStyle] {
        match kind {
            WidgetKind::Main => &self.main_modules,
            WidgetKind::Auxiliary => &self.aux_modules,
        }
    }

    /// Placeholder variant for empty slots of the given widget kind.
    #[must_use]
    pub fn empty_module(&self, kind: WidgetKind) -> &ModuleStyle {
        match kind {
            WidgetKind::Main => &self.main_empty,
            WidgetKind::Auxiliary => &self.aux_empty,
        }
    }

    /// Palette offered to modules of the given widget kind.
    #[must_use]
    pub fn palette_for(&self, kind: WidgetKind) -> &[RgbColor] {
        match kind {
            WidgetKind::Main => &self.palette.main,
            WidgetKind::Auxiliary => &self.palette.auxiliary,
        }
    }

    /// Iterates every module variant of this style, empties included.
    pub fn all_modules(&self) -> impl Iterator<Item = &ModuleStyle> {
        self.main_modules
            .iter()
            .chain(self.aux_modules.iter())
            .chain(std::iter::once(&self.main_empty))
            .chain(std::iter::once(&self.aux_empty))
    }

    /// Updates the purchase flag.
    pub fn set_purchased(&mut self, purchased: bool) {
        self.is_purchased = purchased;
    }
}
