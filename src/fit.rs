//! Framing of the whole drawing inside a fixed-size export frame.

use crate::geometry::{Point, Transform2D, replica_angle};
use crate::stroke::StrokeRef;

/// Upper bound on magnification so tiny drawings don't blow up.
pub const MAX_FIT_SCALE: f64 = 5.0;
/// Box used when there is nothing to frame.
pub const DEFAULT_EXTENT: f64 = 100.0;

/// Space reserved around the content area, in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMargins {
    pub top: f64,
    pub bottom: f64,
    pub side: f64,
}

/// Reference layout the margins below were designed for.
const REFERENCE_WIDTH: f64 = 1200.0;
const REFERENCE_MARGINS: FrameMargins = FrameMargins { top: 260.0, bottom: 240.0, side: 100.0 };

/// An export frame and the content area left after title/footer decoration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub width: f64,
    pub height: f64,
    pub margins: FrameMargins,
}

impl FrameLayout {
    /// Margins scale with frame width so smaller frames keep the same proportions.
    pub fn for_frame(width: u32, height: u32) -> Self {
        let k = width as f64 / REFERENCE_WIDTH;
        Self {
            width: width as f64,
            height: height as f64,
            margins: FrameMargins {
                top: REFERENCE_MARGINS.top * k,
                bottom: REFERENCE_MARGINS.bottom * k,
                side: REFERENCE_MARGINS.side * k,
            },
        }
    }

    pub fn available_width(&self) -> f64 {
        (self.width - 2.0 * self.margins.side).max(1.0)
    }

    pub fn available_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(1.0)
    }

    pub fn content_center(&self) -> (f64, f64) {
        (
            self.width / 2.0,
            self.margins.top + (self.height - self.margins.top - self.margins.bottom) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const DEFAULT: Bounds = Bounds {
        min_x: -DEFAULT_EXTENT,
        min_y: -DEFAULT_EXTENT,
        max_x: DEFAULT_EXTENT,
        max_y: DEFAULT_EXTENT,
    };

    fn around(p: &Point) -> Self {
        Self { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y }
    }

    fn include(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// Union box of every symmetry replica of every point, each stroke rotated
/// by its own fan count. `None` when there are no points.
pub fn replicated_bounds(strokes: &[StrokeRef]) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for stroke in strokes {
        let k = stroke.symmetry();
        for s in 0..k {
            let angle = replica_angle(s, k);
            for point in stroke.points() {
                let rotated = point.rotated(angle);
                match bounds.as_mut() {
                    Some(b) => b.include(&rotated),
                    None => bounds = Some(Bounds::around(&rotated)),
                }
            }
        }
    }
    bounds
}

/// Uniform scale and world-space center that place the drawing in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl Fit {
    /// `translate(content_center) · scale · translate(-center)`
    pub fn transform(&self, layout: &FrameLayout) -> Transform2D {
        let (cx, cy) = layout.content_center();
        Transform2D::translate(cx, cy)
            .then(&Transform2D::scale(self.scale))
            .then(&Transform2D::translate(-self.center_x, -self.center_y))
    }
}

pub fn compute_fit(strokes: &[StrokeRef], layout: &FrameLayout) -> Fit {
    let bounds = replicated_bounds(strokes).unwrap_or(Bounds::DEFAULT);
    let (center_x, center_y) = bounds.center();

    // A single point or a perfectly straight line has zero extent on one axis.
    let box_w = non_degenerate(bounds.width());
    let box_h = non_degenerate(bounds.height());

    let scale = (layout.available_width() / box_w)
        .min(layout.available_height() / box_h)
        .min(MAX_FIT_SCALE);

    Fit { scale, center_x, center_y }
}

fn non_degenerate(extent: f64) -> f64 {
    if extent.is_finite() && extent > 0.0 { extent } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;
    use std::sync::Arc;

    fn stroke(points: &[(f64, f64)], symmetry: u32) -> StrokeRef {
        let points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Arc::new(Stroke::new(points, "#fff".into(), 2.0, symmetry, 0).unwrap())
    }

    fn still_layout() -> FrameLayout {
        FrameLayout::for_frame(1200, 1600)
    }

    #[test]
    fn empty_log_uses_default_box() {
        let fit = compute_fit(&[], &still_layout());
        assert_eq!((fit.center_x, fit.center_y), (0.0, 0.0));
        // 1000 / 200 = 5, 1100 / 200 = 5.5 -> 5
        assert_eq!(fit.scale, 5.0);
    }

    #[test]
    fn bounds_cover_rotated_replicas() {
        // A short stroke on the +x axis; with 4-fold symmetry it covers all four axes.
        let strokes = vec![stroke(&[(10.0, 0.0), (20.0, 0.0), (30.0, 0.0)], 4)];
        let b = replicated_bounds(&strokes).unwrap();
        assert!((b.min_x + 30.0).abs() < 1e-9 && (b.max_x - 30.0).abs() < 1e-9);
        assert!((b.min_y + 30.0).abs() < 1e-9 && (b.max_y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn each_stroke_uses_its_own_symmetry() {
        let strokes = vec![
            stroke(&[(0.0, 50.0), (0.0, 60.0), (0.0, 70.0)], 1),
            stroke(&[(5.0, 0.0), (6.0, 0.0), (7.0, 0.0)], 2),
        ];
        let b = replicated_bounds(&strokes).unwrap();
        assert!((b.min_y - 0.0).abs() < 1e-9, "first stroke must not be mirrored");
        assert!((b.min_x + 7.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_box_stays_finite() {
        let strokes = vec![stroke(&[(3.0, 4.0), (3.0, 4.0), (3.0, 4.0)], 1)];
        let fit = compute_fit(&strokes, &still_layout());
        assert!(fit.scale.is_finite() && fit.scale <= MAX_FIT_SCALE);
        assert!(fit.center_x.is_finite() && fit.center_y.is_finite());
        assert_eq!((fit.center_x, fit.center_y), (3.0, 4.0));
    }

    #[test]
    fn large_drawings_shrink_to_fit() {
        let strokes = vec![stroke(&[(-2000.0, 0.0), (0.0, 0.0), (2000.0, 0.0)], 2)];
        let layout = still_layout();
        let fit = compute_fit(&strokes, &layout);
        assert!((fit.scale - layout.available_width() / 4000.0).abs() < 1e-9);

        let t = fit.transform(&layout);
        let (x0, _) = t.apply(-2000.0, 0.0);
        let (x1, y1) = t.apply(2000.0, 0.0);
        assert!((x0 - layout.margins.side).abs() < 1e-6);
        assert!((x1 - (layout.width - layout.margins.side)).abs() < 1e-6);
        assert!((y1 - layout.content_center().1).abs() < 1e-6);
    }
}
