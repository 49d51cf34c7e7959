// src/renderer.rs
use egui::{Painter, Pos2, Shape};

use crate::animation::AnimationFrame;
use crate::color::{BrushColor, Rgba};
use crate::geometry::{Point, Transform2D, replica_angle};
use crate::stroke::StrokeRef;

/// Halo radius while drawing, in screen pixels.
pub const LIVE_GLOW: f64 = 5.0;
/// Halo radius during replay and in exports, in pixels.
pub const REPLAY_GLOW: f64 = 20.0;

pub const GUIDE_RINGS: [f64; 3] = [100.0, 250.0, 400.0];
pub const GUIDE_COLOR: Rgba = Rgba::new(255, 215, 0, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Live,
    Replay,
}

impl RenderMode {
    pub fn glow_radius(self) -> f64 {
        match self {
            Self::Live => LIVE_GLOW,
            Self::Replay => REPLAY_GLOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    /// Line width in world units.
    pub width: f64,
    /// Blur halo radius in pixels, independent of zoom; 0 disables the halo.
    pub glow: f64,
}

/// Translucent passes painted under the core line to fake a blur halo,
/// widest first. Each entry is `(total width in world units, alpha factor)`
/// for a surface drawing at `zoom` pixels per world unit.
pub fn glow_layers(style: &StrokeStyle, zoom: f64) -> [(f64, f32); 3] {
    let g = style.glow / zoom.max(f64::EPSILON);
    [(g * 1.6, 0.06), (g, 0.10), (g * 0.45, 0.18)].map(|(extra, alpha)| (style.width + extra, alpha))
}

/// Target of the symmetry drawing primitive.
///
/// Coordinates passed in are world space; each surface owns its own
/// world-to-pixel transform.
pub trait Surface {
    /// Stroke the open polyline `path`, rotated by `rotation` radians about
    /// the world origin. The rotation is applied as a transform on the path.
    fn stroke_path(&mut self, path: &[Point], rotation: f64, style: &StrokeStyle);

    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);

    /// Pixels per world unit.
    fn zoom(&self) -> f64 {
        1.0
    }
}

/// Draw the leading `floor(len * progress)` points of a stroke, once per
/// symmetry replica. Returns how many replicas were issued.
pub fn render_stroke(
    surface: &mut dyn Surface,
    points: &[Point],
    color: &BrushColor,
    width: f64,
    symmetry: u32,
    progress: f64,
    mode: RenderMode,
) -> usize {
    let count = (points.len() as f64 * progress.clamp(0.0, 1.0)).floor() as usize;
    if count < 2 {
        return 0;
    }

    let path = &points[..count];
    let style = StrokeStyle {
        color: color.to_rgba(),
        width,
        glow: mode.glow_radius(),
    };
    for s in 0..symmetry {
        surface.stroke_path(path, replica_angle(s, symmetry), &style);
    }
    symmetry as usize
}

/// Every finished stroke, fully revealed.
pub fn render_strokes(surface: &mut dyn Surface, strokes: &[StrokeRef], mode: RenderMode) -> usize {
    strokes
        .iter()
        .map(|stroke| {
            render_stroke(
                surface,
                stroke.points(),
                stroke.color(),
                stroke.width() as f64,
                stroke.symmetry(),
                1.0,
                mode,
            )
        })
        .sum()
}

/// One replay frame: partial strokes at pulsed width.
pub fn render_replay(surface: &mut dyn Surface, strokes: &[StrokeRef], frame: &AnimationFrame) -> usize {
    let mut issued = 0;
    for (stroke, progress) in strokes.iter().zip(&frame.progress) {
        if *progress <= 0.0 {
            continue;
        }
        issued += render_stroke(
            surface,
            stroke.points(),
            stroke.color(),
            stroke.width() as f64 * frame.width_scale,
            stroke.symmetry(),
            *progress,
            RenderMode::Replay,
        );
    }
    issued
}

/// Faint rings and one spoke per symmetry axis, kept one pixel wide on screen.
pub fn render_guides(surface: &mut dyn Surface, symmetry: u32, viewport_extent: f64) {
    let zoom = surface.zoom().max(f64::EPSILON);
    let hairline = 1.0 / zoom;
    for radius in GUIDE_RINGS {
        surface.stroke_circle(Point::ORIGIN, radius, hairline, GUIDE_COLOR);
    }

    let length = viewport_extent * 2.0 / zoom;
    let spoke = [Point::ORIGIN, Point::new(length, 0.0)];
    let style = StrokeStyle { color: GUIDE_COLOR, width: hairline, glow: 0.0 };
    for s in 0..symmetry {
        surface.stroke_path(&spoke, replica_angle(s, symmetry), &style);
    }
}

/// Live canvas surface backed by an egui painter.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    world_to_screen: Transform2D,
}

impl<'a> EguiSurface<'a> {
    /// `world_to_screen` must already include the canvas rect offset.
    pub fn new(painter: &'a Painter, world_to_screen: Transform2D) -> Self {
        Self { painter, world_to_screen }
    }

    fn to_pos(&self, transform: &Transform2D, p: &Point) -> Pos2 {
        let (x, y) = transform.apply_point(p);
        egui::pos2(x as f32, y as f32)
    }
}

impl Surface for EguiSurface<'_> {
    fn stroke_path(&mut self, path: &[Point], rotation: f64, style: &StrokeStyle) {
        let transform = self.world_to_screen.then(&Transform2D::rotate(rotation));
        let points: Vec<Pos2> = path.iter().map(|p| self.to_pos(&transform, p)).collect();
        let scale = self.zoom();

        if style.glow > 0.0 {
            for (width, alpha) in glow_layers(style, scale) {
                let halo = egui::Stroke::new(
                    (width * scale) as f32,
                    style.color.with_alpha_factor(alpha).to_color32(),
                );
                self.painter.add(Shape::line(points.clone(), halo));
            }
        }
        let core = egui::Stroke::new((style.width * scale) as f32, style.color.to_color32());
        self.painter.add(Shape::line(points, core));
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Rgba) {
        let scale = self.zoom();
        self.painter.circle_stroke(
            self.to_pos(&self.world_to_screen, &center),
            (radius * scale) as f32,
            egui::Stroke::new((width * scale) as f32, color.to_color32()),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.painter.circle_filled(
            self.to_pos(&self.world_to_screen, &center),
            (radius * self.zoom()) as f32,
            color.to_color32(),
        );
    }

    fn zoom(&self) -> f64 {
        self.world_to_screen.scale_factor()
    }
}

/// A path draw captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPath {
    pub points: usize,
    pub rotation: f64,
    pub style: StrokeStyle,
}

/// Surface that only remembers what was asked of it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub paths: Vec<RecordedPath>,
    pub circles_stroked: usize,
    pub circles_filled: usize,
    pub zoom: Option<f64>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotations(&self) -> Vec<f64> {
        self.paths.iter().map(|p| p.rotation).collect()
    }
}

impl Surface for RecordingSurface {
    fn stroke_path(&mut self, path: &[Point], rotation: f64, style: &StrokeStyle) {
        self.paths.push(RecordedPath { points: path.len(), rotation, style: *style });
    }

    fn stroke_circle(&mut self, _center: Point, _radius: f64, _width: f64, _color: Rgba) {
        self.circles_stroked += 1;
    }

    fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Rgba) {
        self.circles_filled += 1;
    }

    fn zoom(&self) -> f64 {
        self.zoom.unwrap_or(1.0)
    }
}
