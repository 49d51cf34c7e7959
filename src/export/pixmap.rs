use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::color::Rgba;
use crate::error::{ExportError, ExportResult};
use crate::geometry::{Point, Transform2D};
use crate::renderer::{StrokeStyle, Surface, glow_layers};

/// Offscreen raster frame used by both export paths.
pub struct PixmapSurface {
    pixmap: Pixmap,
    world_to_frame: Transform2D,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("world_to_frame", &self.world_to_frame)
            .finish()
    }
}

fn to_skia(t: &Transform2D) -> Transform {
    Transform::from_row(t.a as f32, t.b as f32, t.c as f32, t.d as f32, t.e as f32, t.f as f32)
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> ExportResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(ExportError::FrameAllocation { width, height })?;
        Ok(Self { pixmap, world_to_frame: Transform2D::IDENTITY })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Set the world-to-frame transform used by the [`Surface`] methods.
    pub fn set_transform(&mut self, world_to_frame: Transform2D) {
        self.world_to_frame = world_to_frame;
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    /// Axis-aligned rectangle in frame pixels, ignoring the world transform.
    pub fn fill_frame_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        if let Some(rect) = tiny_skia::Rect::from_xywh(x as f32, y as f32, w as f32, h as f32) {
            self.pixmap.fill_rect(rect, &paint_for(color), Transform::identity(), None);
        }
    }

    /// Blend `color` into one frame pixel at `coverage` in [0, 1].
    /// Out-of-frame pixels are ignored.
    pub fn blend_frame_pixel(&mut self, x: i64, y: i64, coverage: f32, color: Rgba) {
        if coverage <= 0.0 || x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.fill_frame_rect(x as f64, y as f64, 1.0, 1.0, color.with_alpha_factor(coverage.min(1.0)));
    }

    /// Straight line in frame pixels, ignoring the world transform.
    pub fn frame_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgba) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0 as f32, from.1 as f32);
        pb.line_to(to.0 as f32, to.1 as f32);
        if let Some(path) = pb.finish() {
            let stroke = tiny_skia::Stroke { width: width as f32, ..Default::default() };
            self.pixmap
                .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
        }
    }

    /// Premultiplied RGBA8 rows. Exports paint an opaque background first,
    /// so this equals straight alpha.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Rgba::new(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.width(), self.height());
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        img
    }

    pub fn encode_png(&self) -> ExportResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

impl Surface for PixmapSurface {
    fn stroke_path(&mut self, path: &[Point], rotation: f64, style: &StrokeStyle) {
        let mut pb = PathBuilder::new();
        let Some((first, rest)) = path.split_first() else {
            return;
        };
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        let Some(skia_path) = pb.finish() else {
            return;
        };

        let transform = to_skia(&self.world_to_frame.then(&Transform2D::rotate(rotation)));
        let mut stroke = tiny_skia::Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        if style.glow > 0.0 {
            for (width, alpha) in glow_layers(style, self.zoom()) {
                stroke.width = width as f32;
                let paint = paint_for(style.color.with_alpha_factor(alpha));
                self.pixmap.stroke_path(&skia_path, &paint, &stroke, transform, None);
            }
        }
        stroke.width = style.width as f32;
        self.pixmap
            .stroke_path(&skia_path, &paint_for(style.color), &stroke, transform, None);
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) {
            let stroke = tiny_skia::Stroke { width: width as f32, ..Default::default() };
            self.pixmap
                .stroke_path(&path, &paint_for(color), &stroke, to_skia(&self.world_to_frame), None);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                to_skia(&self.world_to_frame),
                None,
            );
        }
    }

    fn zoom(&self) -> f64 {
        self.world_to_frame.scale_factor()
    }
}
