use ab_glyph::{Font, FontRef, GlyphId, ScaleFont, point};

use crate::color::Rgba;
use crate::document::session_duration_ms;
use crate::error::ExportResult;
use crate::fit::FrameLayout;
use crate::stroke::StrokeRef;
use crate::util::time::duration_label;

use super::PixmapSurface;

pub const TITLE: &str = "MAGICAL PAINT";

const BACKGROUND: Rgba = Rgba::opaque(5, 5, 8);
const ACCENT: Rgba = Rgba::new(255, 215, 0, 200);
const ACCENT_FAINT: Rgba = Rgba::new(255, 215, 0, 40);
const FOOTER_TEXT: Rgba = Rgba::new(224, 224, 224, 180);

/// Text printed around an exported drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub title: String,
    pub duration_ms: u64,
    pub stroke_count: usize,
}

impl Caption {
    pub fn for_strokes(strokes: &[StrokeRef]) -> Self {
        Self {
            title: TITLE.to_owned(),
            duration_ms: session_duration_ms(strokes),
            stroke_count: strokes.len(),
        }
    }

    pub fn footer(&self) -> String {
        format!("DURATION {}   STROKES {}", duration_label(self.duration_ms), self.stroke_count)
    }
}

/// Background, border, title and footer. Strokes go on top.
pub fn paint_backdrop(surface: &mut PixmapSurface, layout: &FrameLayout, caption: &Caption) -> ExportResult<()> {
    let font = caption_font()?;
    surface.fill(BACKGROUND);

    let k = layout.width / 1200.0;
    let inset = 40.0 * k;
    let (w, h) = (layout.width, layout.height);

    // Double border.
    for (offset, color) in [(0.0, ACCENT), (12.0 * k, ACCENT_FAINT)] {
        let (x0, y0) = (inset + offset, inset + offset);
        let (x1, y1) = (w - inset - offset, h - inset - offset);
        let lw = 2.0 * k;
        surface.frame_line((x0, y0), (x1, y0), lw, color);
        surface.frame_line((x1, y0), (x1, y1), lw, color);
        surface.frame_line((x1, y1), (x0, y1), lw, color);
        surface.frame_line((x0, y1), (x0, y0), lw, color);
    }

    let title_px = (TITLE_PX * k) as f32;
    let title_y = layout.margins.top * 0.4;
    draw_text(surface, &font, &caption.title, title_px, w / 2.0, title_y, ACCENT);

    let rule_y = title_y + font.as_scaled(title_px).height() as f64 + 30.0 * k;
    surface.frame_line((w * 0.3, rule_y), (w * 0.7, rule_y), 2.0 * k, ACCENT_FAINT);

    let footer_px = (FOOTER_PX * k) as f32;
    let footer_y = h - layout.margins.bottom * 0.5;
    draw_text(surface, &font, &caption.footer(), footer_px, w / 2.0, footer_y, FOOTER_TEXT);
    Ok(())
}

/// Pixel sizes at the reference width of 1200.
const TITLE_PX: f64 = 64.0;
const FOOTER_PX: f64 = 24.0;

/// egui's bundled Ubuntu Light.
fn caption_font() -> ExportResult<FontRef<'static>> {
    Ok(FontRef::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)?)
}

fn text_width<F: Font>(font: &F, px: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(px);
    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

/// One centered line; `top` is where the ascent starts.
fn draw_text<F: Font>(
    surface: &mut PixmapSurface,
    font: &F,
    text: &str,
    px: f32,
    center_x: f64,
    top: f64,
    color: Rgba,
) {
    let scaled = font.as_scaled(px);
    let baseline = top as f32 + scaled.ascent();
    let mut x = center_x as f32 - text_width(font, px, text) / 2.0;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            x += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(px, point(x, baseline));
        x += scaled.h_advance(id);
        prev = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            surface.blend_frame_pixel(
                bounds.min.x as i64 + gx as i64,
                bounds.min.y as i64 + gy as i64,
                coverage,
                color,
            );
        });
    }
}
