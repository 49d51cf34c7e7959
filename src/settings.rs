use serde::{Deserialize, Serialize};

use crate::color::BrushColor;
use crate::export::ExportConfig;

pub const MIN_BRUSH_WIDTH: f32 = 1.0;
pub const MAX_BRUSH_WIDTH: f32 = 30.0;

/// Named brush colors offered by the control panel.
pub const PALETTE: [(&str, &str); 6] = [
    ("Void", "#E0E0E0"),
    ("Crimson", "#FF3366"),
    ("Gold", "#FFD700"),
    ("Arcane", "#00FFFF"),
    ("Deep", "#9933FF"),
    ("Emerald", "#50C878"),
];

/// Number of rotated copies drawn for each stroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetryMode {
    Two,
    Four,
    #[default]
    Six,
    Eight,
    Twelve,
}

impl SymmetryMode {
    pub const ALL: [SymmetryMode; 5] = [Self::Two, Self::Four, Self::Six, Self::Eight, Self::Twelve];

    pub fn count(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Six => 6,
            Self::Eight => 8,
            Self::Twelve => 12,
        }
    }

    pub fn from_count(count: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.count() == count)
    }
}

/// Brush parameters applied to the next captured stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: BrushColor,
    width: f32,
    pub symmetry: SymmetryMode,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: BrushColor::new(PALETTE[2].1),
            width: 4.0,
            symmetry: SymmetryMode::default(),
        }
    }
}

impl BrushSettings {
    pub fn new(color: BrushColor, width: f32, symmetry: SymmetryMode) -> Self {
        let mut settings = Self { color, width: MIN_BRUSH_WIDTH, symmetry };
        settings.set_width(width);
        settings
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = if width.is_finite() {
            width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH)
        } else {
            MIN_BRUSH_WIDTH
        };
    }
}

/// Everything restored between sessions through eframe storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub brush: BrushSettings,
    pub export: ExportConfig,
}
