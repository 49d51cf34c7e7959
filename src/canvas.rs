use crate::animation::{AnimationFrame, AnimationSequencer};
use crate::audio::{AudioSink, ChimeThrottle, SilentAudio};
use crate::camera::{Camera, Viewport};
use crate::capture::{CaptureContext, CaptureOutcome, handle_event};
use crate::command::Command;
use crate::document::Document;
use crate::error::ExportResult;
use crate::export::{ExportConfig, SaveSink, VideoExportHandle, export_still, spawn_video_export};
use crate::geometry::Transform2D;
use crate::input::{InputEvent, InputModifiers};
use crate::particles::ParticleEmitter;
use crate::renderer::{RenderMode, Surface, render_guides, render_replay, render_stroke, render_strokes};
use crate::rng::CosmeticRng;
use crate::settings::BrushSettings;
use crate::state::EditorState;

/// Live drawing session: camera, stroke log, gesture state and the cosmetic
/// layers on top. Driven once per frame by input, then `tick`, then `render`.
pub struct Canvas {
    camera: Camera,
    document: Document,
    state: EditorState,
    modifiers: InputModifiers,
    particles: ParticleEmitter,
    chime: ChimeThrottle,
    audio: Box<dyn AudioSink>,
    replay_frame: Option<AnimationFrame>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Box::new(SilentAudio))
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("camera", &self.camera)
            .field("strokes", &self.document.len())
            .field("state", &self.state.name())
            .field("particles", &self.particles.len())
            .finish()
    }
}

impl Canvas {
    pub fn new(audio: Box<dyn AudioSink>) -> Self {
        Self::with_rng(audio, CosmeticRng::from_entropy())
    }

    /// Deterministic cosmetics, for tests.
    pub fn with_rng(audio: Box<dyn AudioSink>, mut rng: CosmeticRng) -> Self {
        let chime_rng = CosmeticRng::new(rng.next_u64());
        Self {
            camera: Camera::default(),
            document: Document::new(),
            state: EditorState::Idle,
            modifiers: InputModifiers::default(),
            particles: ParticleEmitter::new(rng),
            chime: ChimeThrottle::new(chime_rng),
            audio,
            replay_frame: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn particles(&self) -> &ParticleEmitter {
        &self.particles
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// Nothing drawn yet and nothing happening.
    pub fn shows_standby_prompt(&self) -> bool {
        self.document.is_empty() && self.state.is_idle()
    }

    pub fn world_to_screen(&self, viewport: Viewport) -> Transform2D {
        self.camera.world_to_screen(viewport)
    }

    pub fn handle_input(&mut self, event: &InputEvent, viewport: Viewport, brush: &BrushSettings, now_ms: u64) {
        match event {
            InputEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                return;
            }
            InputEvent::Wheel { location, delta } => {
                self.camera.zoom_at(location.x, location.y, *delta, viewport);
                return;
            }
            InputEvent::Undo => {
                self.undo();
                return;
            }
            _ => {}
        }

        let ctx = CaptureContext {
            camera: &self.camera,
            viewport,
            modifiers: self.modifiers,
            brush,
            now_ms,
        };
        match handle_event(&mut self.state, event, &ctx) {
            CaptureOutcome::PointAppended(_) => {
                if self.chime.should_chime(now_ms as f64) {
                    self.audio.play_chime();
                }
            }
            CaptureOutcome::Committed(command) => {
                let name = command.name();
                command.execute(&mut self.document);
                log::info!("{}: {} strokes", name, self.document.len());
            }
            CaptureOutcome::Panned { dx, dy } => self.camera.pan(dx, dy),
            CaptureOutcome::Ignored
            | CaptureOutcome::StrokeStarted(_)
            | CaptureOutcome::Discarded { .. }
            | CaptureOutcome::PanStarted
            | CaptureOutcome::PanEnded => {}
        }
    }

    /// Drop the newest stroke. Refused while a replay is running.
    pub fn undo(&mut self) -> bool {
        if self.state.is_animating() {
            log::debug!("Undo ignored during replay");
            return false;
        }
        let removed = Command::RemoveLastStroke.execute(&mut self.document);
        if removed {
            log::info!("Undo: {} strokes left", self.document.len());
        }
        removed
    }

    /// Empty the log and cancel whatever was in flight.
    pub fn clear(&mut self) {
        if self.state.is_drawing() || self.state.is_animating() {
            self.state = EditorState::Idle;
        }
        self.replay_frame = None;
        self.particles.clear();
        Command::ClearAll.execute(&mut self.document);
        log::info!("Canvas cleared");
    }

    /// Start (or restart) the replay. No-op on an empty log.
    pub fn cast(&mut self, now_ms: u64) -> bool {
        if self.document.is_empty() {
            log::debug!("Cast ignored: nothing drawn");
            return false;
        }
        let next = EditorState::Animating { sequencer: AnimationSequencer::new(now_ms as f64) };
        if !self.state.can_transition_to(&next) {
            log::debug!("Cast ignored while {}", self.state.name());
            return false;
        }
        self.state = next;
        self.replay_frame = None;
        self.audio.play_cast();
        log::info!("Casting {} strokes", self.document.len());
        true
    }

    /// Per-frame update: replay clock and particles.
    pub fn tick(&mut self, now_ms: u64, brush: &BrushSettings) {
        if let EditorState::Animating { sequencer } = &mut self.state {
            let frame = sequencer.advance(now_ms as f64, self.document.strokes());
            if frame.completed {
                log::info!("Replay finished after {:.0} ms", frame.elapsed_ms);
                self.state = EditorState::Idle;
                self.replay_frame = None;
            } else {
                self.replay_frame = Some(frame);
            }
        }

        self.particles.step();
        if let Some(tip) = self.state.stroke_in_progress().and_then(|s| s.last()) {
            self.particles.emit(tip, brush.symmetry.count(), &brush.color);
        }
    }

    /// Guides, strokes (live or replay), the stroke being drawn, then particles.
    pub fn render(&self, surface: &mut dyn Surface, viewport: Viewport, brush: &BrushSettings) {
        render_guides(surface, brush.symmetry.count(), viewport.width.max(viewport.height));

        match (&self.state, &self.replay_frame) {
            (EditorState::Animating { .. }, Some(frame)) => {
                render_replay(surface, self.document.strokes(), frame);
            }
            (EditorState::Animating { .. }, None) => {}
            _ => {
                render_strokes(surface, self.document.strokes(), RenderMode::Live);
            }
        }

        if let Some(stroke) = self.state.stroke_in_progress() {
            render_stroke(
                surface,
                stroke.points(),
                &brush.color,
                brush.width() as f64,
                brush.symmetry.count(),
                1.0,
                RenderMode::Live,
            );
        }

        self.particles.render(surface);
    }

    /// PNG of the whole log. `Ok(None)` when there is nothing to export.
    pub fn export_still(
        &self,
        config: &ExportConfig,
        sink: &mut dyn SaveSink,
        now_ms: u64,
    ) -> ExportResult<Option<String>> {
        export_still(self.document.strokes(), config, sink, now_ms)
    }

    /// Start recording a snapshot of the log in the background.
    pub fn export_video(
        &self,
        config: &ExportConfig,
        sink: Box<dyn SaveSink + Send>,
        now_ms: u64,
    ) -> ExportResult<Option<VideoExportHandle>> {
        spawn_video_export(self.document.snapshot(), config.clone(), sink, now_ms)
    }
}
