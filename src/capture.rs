//! Pointer gestures to strokes.
//!
//! [`handle_event`] drives [`EditorState`] through one input event and
//! reports what happened; the caller applies the outcome to the log, camera
//! and side effects.

use egui::PointerButton;

use crate::camera::{Camera, Viewport};
use crate::command::Command;
use crate::geometry::Point;
use crate::input::{InputEvent, InputLocation, InputModifiers};
use crate::settings::BrushSettings;
use crate::state::EditorState;
use crate::stroke::StrokeBuilder;

/// Everything a gesture step may read.
#[derive(Debug, Clone, Copy)]
pub struct CaptureContext<'a> {
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub modifiers: InputModifiers,
    pub brush: &'a BrushSettings,
    pub now_ms: u64,
}

impl CaptureContext<'_> {
    fn world(&self, location: InputLocation) -> Point {
        self.camera.to_world(location.x, location.y, self.viewport)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// The event meant nothing in the current state.
    Ignored,
    StrokeStarted(Point),
    /// The (possibly smoothed) point that was buffered.
    PointAppended(Point),
    /// Release with enough points; apply the command to the log.
    Committed(Command),
    /// Release with too few points; nothing is stored.
    Discarded { points: usize },
    PanStarted,
    Panned { dx: f64, dy: f64 },
    PanEnded,
}

fn is_pan_button(button: PointerButton, modifiers: InputModifiers) -> bool {
    match button {
        PointerButton::Middle | PointerButton::Secondary => true,
        PointerButton::Primary => modifiers.pan,
        _ => false,
    }
}

fn transition(state: &mut EditorState, next: EditorState) -> bool {
    if !state.can_transition_to(&next) {
        log::warn!("Refusing transition {} -> {}", state.name(), next.name());
        return false;
    }
    log::trace!("{} -> {}", state.name(), next.name());
    *state = next;
    true
}

/// Advance the gesture state machine by one event.
///
/// Out-of-order sequences (release without press, second press while
/// drawing, moves while idle) come back as [`CaptureOutcome::Ignored`].
pub fn handle_event(state: &mut EditorState, event: &InputEvent, ctx: &CaptureContext<'_>) -> CaptureOutcome {
    match event {
        InputEvent::PointerDown { location, button } => {
            if !state.is_idle() {
                return CaptureOutcome::Ignored;
            }
            if is_pan_button(*button, ctx.modifiers) {
                let next = EditorState::Panning { last: (location.x, location.y) };
                if transition(state, next) {
                    return CaptureOutcome::PanStarted;
                }
            } else if *button == PointerButton::Primary {
                let start = ctx.world(*location);
                let next = EditorState::Drawing { stroke: StrokeBuilder::starting_at(start) };
                if transition(state, next) {
                    return CaptureOutcome::StrokeStarted(start);
                }
            }
            CaptureOutcome::Ignored
        }

        InputEvent::PointerMove { location } => match state {
            EditorState::Drawing { stroke } => {
                let target = ctx.world(*location);
                CaptureOutcome::PointAppended(stroke.extend_toward(target, ctx.modifiers.stabilize))
            }
            EditorState::Panning { last } => {
                let (dx, dy) = (location.x - last.0, location.y - last.1);
                *last = (location.x, location.y);
                CaptureOutcome::Panned { dx, dy }
            }
            _ => CaptureOutcome::Ignored,
        },

        InputEvent::PointerUp { button, .. } => match state {
            EditorState::Drawing { .. } if *button == PointerButton::Primary => finish_stroke(state, ctx),
            EditorState::Panning { .. } => end_pan(state),
            _ => CaptureOutcome::Ignored,
        },

        InputEvent::PointerLeave => match state {
            EditorState::Drawing { .. } => finish_stroke(state, ctx),
            EditorState::Panning { .. } => end_pan(state),
            _ => CaptureOutcome::Ignored,
        },

        InputEvent::Wheel { .. } | InputEvent::ModifiersChanged(_) | InputEvent::Undo => CaptureOutcome::Ignored,
    }
}

fn finish_stroke(state: &mut EditorState, ctx: &CaptureContext<'_>) -> CaptureOutcome {
    let EditorState::Drawing { stroke } = std::mem::take(state) else {
        return CaptureOutcome::Ignored;
    };
    let points = stroke.len();
    match stroke.finish(ctx.brush, ctx.now_ms) {
        Some(stroke) => CaptureOutcome::Committed(Command::AddStroke(stroke)),
        None => {
            log::debug!("Discarding stroke with {} points", points);
            CaptureOutcome::Discarded { points }
        }
    }
}

fn end_pan(state: &mut EditorState) -> CaptureOutcome {
    if transition(state, EditorState::Idle) {
        CaptureOutcome::PanEnded
    } else {
        CaptureOutcome::Ignored
    }
}
