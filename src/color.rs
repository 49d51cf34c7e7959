use serde::{Deserialize, Serialize};

/// Opaque color token chosen in the control surface (e.g. `"#FFD700"`).
///
/// Strokes store the token as-is. It is only interpreted when a surface needs
/// actual channel values, see [`BrushColor::to_rgba`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrushColor(String);

/// Straight (non-premultiplied) 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Scale the alpha channel by `factor` (clamped to `[0, 1]`).
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

/// Used when a token cannot be parsed.
pub const FALLBACK_RGBA: Rgba = Rgba::opaque(0xE0, 0xE0, 0xE0);

impl BrushColor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret `#rgb`, `#rrggbb` or `#rrggbbaa`; anything else maps to
    /// [`FALLBACK_RGBA`].
    pub fn to_rgba(&self) -> Rgba {
        parse_hex(&self.0).unwrap_or(FALLBACK_RGBA)
    }
}

impl From<&str> for BrushColor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

fn parse_hex(token: &str) -> Option<Rgba> {
    let hex = token.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(Rgba::opaque(out[0], out[1], out[2]))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
            Some(Rgba::new(r, g, b, a))
        }
        _ => None,
    }
}
