use std::sync::Arc;

use crate::color::BrushColor;
use crate::error::StrokeError;
use crate::geometry::Point;
use crate::settings::BrushSettings;

/// Shortest point buffer that is promoted to a stroke.
pub const MIN_STROKE_POINTS: usize = 3;

/// Fraction of the remaining distance covered per move event while stabilizing.
pub const STABILIZE_FACTOR: f64 = 0.15;

// Immutable stroke for sharing
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    color: BrushColor,
    width: f32,
    symmetry: u32,
    timestamp_ms: u64,
}

// Strokes are shared between the live log and export snapshots
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(
        points: Vec<Point>,
        color: BrushColor,
        width: f32,
        symmetry: u32,
        timestamp_ms: u64,
    ) -> Result<Self, StrokeError> {
        if points.len() < MIN_STROKE_POINTS {
            return Err(StrokeError::TooFewPoints { min: MIN_STROKE_POINTS, got: points.len() });
        }
        if width.is_nan() || width <= 0.0 {
            return Err(StrokeError::InvalidWidth(width));
        }
        if symmetry == 0 {
            return Err(StrokeError::ZeroSymmetry);
        }
        Ok(Self { points, color, width, symmetry, timestamp_ms })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> &BrushColor {
        &self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Fan count the stroke was drawn under. Never follows later setting changes.
    pub fn symmetry(&self) -> u32 {
        self.symmetry
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

/// The in-progress point buffer of a draw gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeBuilder {
    points: Vec<Point>,
}

impl StrokeBuilder {
    pub fn starting_at(point: Point) -> Self {
        Self { points: vec![point] }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Append the point for a move towards `target` and return what was appended.
    ///
    /// With `stabilize` the new point only covers [`STABILIZE_FACTOR`] of the
    /// distance from the previous one.
    pub fn extend_toward(&mut self, target: Point, stabilize: bool) -> Point {
        let next = match self.points.last() {
            Some(last) if stabilize => smooth_toward(last, &target, STABILIZE_FACTOR),
            _ => target,
        };
        self.points.push(next);
        next
    }

    /// Snapshot into a stroke tagged with the brush as it is right now.
    ///
    /// Returns `None` when the buffer is too short to keep.
    pub fn finish(self, brush: &BrushSettings, timestamp_ms: u64) -> Option<Stroke> {
        Stroke::new(
            self.points,
            brush.color.clone(),
            brush.width(),
            brush.symmetry.count(),
            timestamp_ms,
        )
        .ok()
    }
}

/// Exponential moving average step from `last` towards `target`.
pub fn smooth_toward(last: &Point, target: &Point, factor: f64) -> Point {
    Point {
        x: last.x + (target.x - last.x) * factor,
        y: last.y + (target.y - last.y) * factor,
        pressure: target.pressure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, i as f64 * 2.0)).collect()
    }

    #[test]
    fn rejects_short_strokes() {
        let err = Stroke::new(line(2), "#fff".into(), 2.0, 4, 0).unwrap_err();
        assert_eq!(err, StrokeError::TooFewPoints { min: 3, got: 2 });
        assert!(Stroke::new(line(3), "#fff".into(), 2.0, 4, 0).is_ok());
    }

    #[test]
    fn rejects_bad_width_and_symmetry() {
        assert_eq!(
            Stroke::new(line(3), "#fff".into(), 0.0, 4, 0).unwrap_err(),
            StrokeError::InvalidWidth(0.0)
        );
        assert_eq!(Stroke::new(line(3), "#fff".into(), 1.0, 0, 0).unwrap_err(), StrokeError::ZeroSymmetry);
    }

    #[test]
    fn stabilized_points_lag_behind_target() {
        let mut builder = StrokeBuilder::starting_at(Point::ORIGIN);
        let p = builder.extend_toward(Point::new(100.0, -20.0), true);
        assert!((p.x - 15.0).abs() < 1e-9);
        assert!((p.y + 3.0).abs() < 1e-9);

        let raw = builder.extend_toward(Point::new(100.0, -20.0), false);
        assert_eq!((raw.x, raw.y), (100.0, -20.0));
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn pressure_is_carried_through_smoothing() {
        let mut builder = StrokeBuilder::starting_at(Point::ORIGIN);
        let p = builder.extend_toward(Point::new(10.0, 0.0).with_pressure(0.7), true);
        assert_eq!(p.pressure, Some(0.7));
        assert_eq!(p.rotated(1.0).pressure, Some(0.7));
    }

    #[test]
    fn stabilize_on_empty_buffer_takes_raw_target() {
        let mut builder = StrokeBuilder::default();
        let p = builder.extend_toward(Point::new(7.0, 8.0), true);
        assert_eq!((p.x, p.y), (7.0, 8.0));
    }

    #[test]
    fn finish_uses_current_brush() {
        let mut builder = StrokeBuilder::starting_at(Point::ORIGIN);
        builder.extend_toward(Point::new(1.0, 1.0), false);
        builder.extend_toward(Point::new(2.0, 2.0), false);
        let brush = BrushSettings::default();
        let stroke = builder.finish(&brush, 1234).expect("three points");
        assert_eq!(stroke.symmetry(), 6);
        assert_eq!(stroke.width(), 4.0);
        assert_eq!(stroke.timestamp_ms(), 1234);
        assert_eq!(stroke.points().len(), 3);
    }
}
