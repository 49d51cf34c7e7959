//! Interaction state of the canvas.
//!
//! ```text
//!            primary down              release / leave
//!   Idle ───────────────────► Drawing ─────────────────► Idle
//!    │ ▲
//!    │ │ release            pan button or Space + primary
//!    │ └──────────────────── Panning ◄──────────────────── Idle
//!    │
//!    │ cast                       finished / clear
//!    └─────────────────────► Animating ──────────────────► Idle
//! ```
//!
//! The in-progress point buffer lives inside `Drawing`, so leaving that state
//! always drops or promotes it.

use crate::animation::AnimationSequencer;
use crate::stroke::StrokeBuilder;

#[derive(Debug, Clone, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Drawing {
        stroke: StrokeBuilder,
    },
    /// Screen position of the last drag sample, canvas-relative.
    Panning {
        last: (f64, f64),
    },
    Animating {
        sequencer: AnimationSequencer,
    },
}

impl EditorState {
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            (EditorState::Idle, _) => true,

            (EditorState::Drawing { .. }, EditorState::Idle) => true,
            (EditorState::Panning { .. }, EditorState::Idle) => true,

            // Finishing, clearing, or re-casting.
            (EditorState::Animating { .. }, EditorState::Idle) => true,
            (EditorState::Animating { .. }, EditorState::Animating { .. }) => true,

            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, EditorState::Panning { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, EditorState::Animating { .. })
    }

    pub fn stroke_in_progress(&self) -> Option<&StrokeBuilder> {
        match self {
            EditorState::Drawing { stroke } => Some(stroke),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::Drawing { .. } => "Drawing",
            EditorState::Panning { .. } => "Panning",
            EditorState::Animating { .. } => "Animating",
        }
    }
}
