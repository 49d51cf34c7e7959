#![warn(clippy::all, rust_2018_idioms)]

pub mod animation;
pub mod app;
pub mod audio;
pub mod camera;
pub mod canvas;
pub mod capture;
pub mod color;
pub mod command;
pub mod document;
pub mod error;
pub mod export;
pub mod fit;
pub mod geometry;
pub mod input;
pub mod panels;
pub mod particles;
pub mod renderer;
pub mod rng;
pub mod settings;
pub mod state;
pub mod stroke;
pub mod util;

pub use app::SigilApp;
pub use camera::{Camera, Viewport};
pub use canvas::Canvas;
pub use command::Command;
pub use document::Document;
pub use error::{ExportError, ExportResult, StrokeError};
pub use input::{InputEvent, InputLocation};
pub use renderer::{RecordingSurface, Surface};
pub use settings::{BrushSettings, Settings, SymmetryMode};
pub use state::EditorState;
pub use stroke::{Stroke, StrokeRef};
