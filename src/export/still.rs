use crate::error::ExportResult;
use crate::fit::{FrameLayout, compute_fit};
use crate::renderer::{RenderMode, render_strokes};
use crate::stroke::StrokeRef;

use super::{Caption, ExportConfig, PixmapSurface, SaveSink, export_filename, paint_backdrop};

/// Rasterize the whole log, framed and decorated, into a fresh surface.
pub fn render_still(strokes: &[StrokeRef], config: &ExportConfig) -> ExportResult<PixmapSurface> {
    let mut surface = PixmapSurface::new(config.still_width, config.still_height)?;
    let layout = FrameLayout::for_frame(config.still_width, config.still_height);
    paint_backdrop(&mut surface, &layout, &Caption::for_strokes(strokes))?;

    let fit = compute_fit(strokes, &layout);
    log::debug!(
        "Still fit: scale {:.3} around ({:.1}, {:.1})",
        fit.scale,
        fit.center_x,
        fit.center_y
    );
    surface.set_transform(fit.transform(&layout));
    render_strokes(&mut surface, strokes, RenderMode::Replay);
    Ok(surface)
}

/// Render and hand a PNG to `sink`. Returns the filename, or `None` when
/// there was nothing to export (the sink is not called in that case).
pub fn export_still(
    strokes: &[StrokeRef],
    config: &ExportConfig,
    sink: &mut dyn SaveSink,
    created_at_ms: u64,
) -> ExportResult<Option<String>> {
    if strokes.is_empty() {
        log::info!("Nothing to export");
        return Ok(None);
    }

    let png = render_still(strokes, config)?.encode_png()?;
    let filename = export_filename("png", created_at_ms);
    sink.save(&filename, &png)?;
    log::info!("Exported still {} ({} strokes)", filename, strokes.len());
    Ok(Some(filename))
}
