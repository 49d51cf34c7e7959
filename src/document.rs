use crate::stroke::{Stroke, StrokeRef};
use std::sync::Arc;

/// Ordered log of finished strokes.
///
/// Append-only while drawing; shrinks only through [`Document::remove_last_stroke`]
/// and [`Document::clear`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    strokes: Vec<StrokeRef>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(Arc::new(stroke));
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn remove_last_stroke(&mut self) -> Option<StrokeRef> {
        self.strokes.pop()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Cheap copy for work that must not observe later edits (exports).
    pub fn snapshot(&self) -> Vec<StrokeRef> {
        self.strokes.clone()
    }

    pub fn total_points(&self) -> usize {
        total_points(&self.strokes)
    }
}

pub fn total_points(strokes: &[StrokeRef]) -> usize {
    strokes.iter().map(|s| s.points().len()).sum()
}

/// Time between the first and last stroke, never negative.
pub fn session_duration_ms(strokes: &[StrokeRef]) -> u64 {
    match (strokes.first(), strokes.last()) {
        (Some(first), Some(last)) => last.timestamp_ms().saturating_sub(first.timestamp_ms()),
        _ => 0,
    }
}
