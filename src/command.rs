use crate::document::Document;
use crate::stroke::Stroke;

/// The only ways the stroke log changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a finished stroke
    AddStroke(Stroke),
    /// Undo: drop the newest stroke, if any
    RemoveLastStroke,
    ClearAll,
}

impl Command {
    /// Apply to `document`. Returns whether the log changed.
    pub fn execute(self, document: &mut Document) -> bool {
        match self {
            Command::AddStroke(stroke) => {
                log::debug!(
                    "Committing stroke: {} points, symmetry {}",
                    stroke.points().len(),
                    stroke.symmetry()
                );
                document.add_stroke(stroke);
                true
            }
            Command::RemoveLastStroke => document.remove_last_stroke().is_some(),
            Command::ClearAll => {
                let changed = !document.is_empty();
                document.clear();
                changed
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddStroke(_) => "AddStroke",
            Command::RemoveLastStroke => "RemoveLastStroke",
            Command::ClearAll => "ClearAll",
        }
    }
}
