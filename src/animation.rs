//! Timed replay of a finished drawing.
//!
//! Stroke `i` starts revealing at `i * STAGGER_MS` and is fully drawn
//! `STROKE_DURATION_MS` later. All strokes share one width pulse.

use crate::stroke::StrokeRef;

pub const STAGGER_MS: f64 = 200.0;
pub const STROKE_DURATION_MS: f64 = 500.0;
/// Extra time after the last stagger slot before the replay ends.
pub const TAIL_MS: f64 = 1000.0;
const PULSE_RATE: f64 = 0.005;
const PULSE_DEPTH: f64 = 0.5;

/// Reveal progress of stroke `index` at `elapsed_ms` into the replay, in `[0, 1]`.
pub fn stroke_progress(index: usize, elapsed_ms: f64) -> f64 {
    let start = index as f64 * STAGGER_MS;
    ((elapsed_ms - start) / STROKE_DURATION_MS).clamp(0.0, 1.0)
}

pub fn total_duration_ms(stroke_count: usize) -> f64 {
    stroke_count as f64 * STAGGER_MS + TAIL_MS
}

/// Width multiplier applied to every stroke while replaying.
pub fn pulse(elapsed_ms: f64) -> f64 {
    1.0 + (elapsed_ms * PULSE_RATE).sin() * PULSE_DEPTH
}

/// What the renderer needs for one replay frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub elapsed_ms: f64,
    /// One entry per stroke in log order. Entries `<= 0` are not drawn.
    pub progress: Vec<f64>,
    pub width_scale: f64,
    /// True on the single frame where the replay ran past its duration.
    pub completed: bool,
}

impl AnimationFrame {
    pub fn visible_strokes(&self) -> usize {
        self.progress.iter().filter(|p| **p > 0.0).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSequencer {
    started_at_ms: f64,
    last_elapsed_ms: f64,
    completed: bool,
}

impl AnimationSequencer {
    pub fn new(started_at_ms: f64) -> Self {
        Self { started_at_ms, last_elapsed_ms: 0.0, completed: false }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Step to `now_ms`. Time that runs backwards is held at the last value
    /// so progress never decreases.
    pub fn advance(&mut self, now_ms: f64, strokes: &[StrokeRef]) -> AnimationFrame {
        let elapsed_ms = (now_ms - self.started_at_ms).max(self.last_elapsed_ms);
        self.last_elapsed_ms = elapsed_ms;

        let progress = (0..strokes.len()).map(|i| stroke_progress(i, elapsed_ms)).collect();

        let completed = !self.completed && elapsed_ms > total_duration_ms(strokes.len());
        if completed {
            self.completed = true;
        }

        AnimationFrame {
            elapsed_ms,
            progress,
            width_scale: pulse(elapsed_ms),
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::stroke::Stroke;
    use std::sync::Arc;

    fn strokes(n: usize) -> Vec<StrokeRef> {
        (0..n)
            .map(|i| {
                let points = (0..4).map(|j| Point::new(j as f64, i as f64)).collect();
                Arc::new(Stroke::new(points, "#fff".into(), 3.0, 4, i as u64).unwrap())
            })
            .collect()
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        for index in 0..5 {
            let start = index as f64 * STAGGER_MS;
            let mut previous = 0.0;
            let mut t = 0.0;
            while t < 3000.0 {
                let p = stroke_progress(index, t);
                assert!(p >= previous);
                if t < start {
                    assert_eq!(p, 0.0);
                }
                previous = p;
                t += 7.3;
            }
            assert_eq!(stroke_progress(index, start + STROKE_DURATION_MS), 1.0);
        }
    }

    #[test]
    fn completion_fires_once() {
        let log = strokes(3);
        let mut sequencer = AnimationSequencer::new(1000.0);
        assert!(!sequencer.advance(1000.0, &log).completed);
        // 3 * 200 + 1000 = 1600 ms
        assert!(!sequencer.advance(2600.0, &log).completed);
        assert!(sequencer.advance(2601.0, &log).completed);
        assert!(!sequencer.advance(2700.0, &log).completed);
        assert!(sequencer.is_completed());
    }

    #[test]
    fn late_strokes_are_hidden() {
        let log = strokes(4);
        let mut sequencer = AnimationSequencer::new(0.0);
        let frame = sequencer.advance(250.0, &log);
        assert_eq!(frame.visible_strokes(), 2);
        assert_eq!(frame.progress[2], 0.0);
    }

    #[test]
    fn backwards_time_does_not_rewind() {
        let log = strokes(2);
        let mut sequencer = AnimationSequencer::new(0.0);
        let a = sequencer.advance(400.0, &log);
        let b = sequencer.advance(100.0, &log);
        assert_eq!(a.progress, b.progress);
    }

    #[test]
    fn pulse_is_shared_and_bounded() {
        for i in 0..100 {
            let scale = pulse(i as f64 * 37.0);
            assert!((0.5..=1.5).contains(&scale));
        }
        assert_eq!(pulse(0.0), 1.0);
    }
}
