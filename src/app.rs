use crate::audio::{AudioSink, SilentAudio, init_audio};
use crate::camera::Viewport;
use crate::canvas::Canvas;
use crate::export::{FileSink, VideoExportHandle};
use crate::geometry::Transform2D;
use crate::input::InputHandler;
use crate::panels::{central_panel, control_panel};
use crate::renderer::EguiSurface;
use crate::settings::{BrushSettings, Settings};
use crate::util::time::{SessionClock, now_millis};

/// We derive Deserialize/Serialize so we can persist brush and export
/// settings on shutdown. The drawing itself is never stored.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SigilApp {
    settings: Settings,
    #[serde(skip)]
    canvas: Canvas,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    clock: SessionClock,
    #[serde(skip)]
    video_export: Option<VideoExportHandle>,
    /// Last export outcome shown in the control panel.
    #[serde(skip)]
    status: Option<String>,
}

impl Default for SigilApp {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            canvas: Canvas::default(),
            input: InputHandler::new(),
            clock: SessionClock::new(),
            video_export: None,
            status: None,
        }
    }
}

impl SigilApp {
    /// Called once before the first frame. This build has no synthesizer,
    /// so sound cues are silent.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        log::debug!("No audio backend compiled in");
        Self::with_audio(cc, || Ok::<_, std::convert::Infallible>(Box::new(SilentAudio) as Box<dyn AudioSink>))
    }

    /// Like [`Self::new`], with a caller-supplied sound backend. A backend
    /// that fails to open degrades to silence.
    pub fn with_audio<E: std::fmt::Display>(
        cc: &eframe::CreationContext<'_>,
        backend: impl FnOnce() -> Result<Box<dyn AudioSink>, E>,
    ) -> Self {
        let settings: Settings = cc
            .storage
            .and_then(|storage| eframe::get_value::<SigilApp>(storage, eframe::APP_KEY))
            .map(|app| app.settings)
            .unwrap_or_default();
        log::info!(
            "Starting with brush {} / width {} / symmetry {}",
            settings.brush.color.as_str(),
            settings.brush.width(),
            settings.brush.symmetry.count()
        );

        Self {
            settings,
            canvas: Canvas::new(init_audio(backend)),
            ..Default::default()
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn brush_mut(&mut self) -> &mut BrushSettings {
        &mut self.settings.brush
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn video_export(&self) -> Option<&VideoExportHandle> {
        self.video_export.as_ref()
    }

    pub fn cast(&mut self) {
        self.canvas.cast(self.clock.elapsed_ms());
    }

    pub fn undo(&mut self) {
        self.canvas.undo();
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    pub fn export_still(&mut self) {
        let mut sink = FileSink::new(&self.settings.export.output_dir);
        match self.canvas.export_still(&self.settings.export, &mut sink, now_millis()) {
            Ok(Some(filename)) => self.status = Some(format!("Saved {filename}")),
            Ok(None) => {}
            Err(err) => {
                log::error!("Still export failed: {}", err);
                self.status = Some(format!("Export failed: {err}"));
            }
        }
    }

    pub fn export_video(&mut self) {
        if self.video_export.is_some() {
            return;
        }
        let sink = Box::new(FileSink::new(&self.settings.export.output_dir));
        match self.canvas.export_video(&self.settings.export, sink, now_millis()) {
            Ok(Some(handle)) => {
                log::info!("Video export started");
                self.status = Some("Recording...".to_owned());
                self.video_export = Some(handle);
            }
            Ok(None) => {}
            Err(err) => {
                log::error!("Could not start video export: {}", err);
                self.status = Some(format!("Export failed: {err}"));
            }
        }
    }

    fn poll_video_export(&mut self) {
        if !self.video_export.as_ref().is_some_and(|handle| handle.is_finished()) {
            return;
        }
        let Some(handle) = self.video_export.take() else {
            return;
        };
        self.status = match handle.join() {
            Ok(Some(filename)) => Some(format!("Saved {filename}")),
            Ok(None) => None,
            Err(err) => {
                log::error!("Video export failed: {}", err);
                Some(format!("Export failed: {err}"))
            }
        };
    }

    pub(crate) fn run_canvas(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        let now = self.clock.elapsed_ms();
        let viewport = Viewport::new(rect.width() as f64, rect.height() as f64);

        for event in self.input.process_input(ctx, rect) {
            self.canvas.handle_input(&event, viewport, &self.settings.brush, now);
        }
        self.canvas.tick(now, &self.settings.brush);

        let world_to_screen = Transform2D::translate(rect.min.x as f64, rect.min.y as f64)
            .then(&self.canvas.world_to_screen(viewport));
        let mut surface = EguiSurface::new(painter, world_to_screen);
        self.canvas.render(&mut surface, viewport, &self.settings.brush);
    }
}

impl eframe::App for SigilApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_video_export();

        control_panel(self, ctx);
        central_panel(self, ctx);

        // Replay, particles and export progress all animate without input.
        ctx.request_repaint();
    }
}
