use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::document::total_points;
use crate::error::{ExportError, ExportResult};
use crate::fit::{FrameLayout, compute_fit};
use crate::renderer::{RenderMode, Surface, render_stroke};
use crate::stroke::StrokeRef;

use super::{Caption, ExportConfig, PixmapSurface, SaveSink, export_filename, paint_backdrop};

/// Consumes finished RGBA8 frames and produces the container bytes.
pub trait VideoEncoder {
    fn push_frame(&mut self, rgba: &[u8]) -> ExportResult<()>;

    fn finish(self) -> ExportResult<Vec<u8>>;
}

/// Pipes raw frames into the system `ffmpeg` and reads back the MP4 it wrote.
///
/// The scratch file is removed on drop, whether or not `finish` succeeded.
pub struct FfmpegEncoder {
    frame_len: usize,
    out_path: PathBuf,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    pub fn new(program: &str, width: u32, height: u32, fps: u32, out_path: impl Into<PathBuf>) -> ExportResult<Self> {
        if width == 0 || height == 0 || fps == 0 {
            return Err(ExportError::Encoder("video width, height and fps must be non-zero".into()));
        }
        if width % 2 != 0 || height % 2 != 0 {
            // yuv420p needs even dimensions.
            return Err(ExportError::Encoder(format!("video size {width}x{height} must be even")));
        }
        let out_path = out_path.into();
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut cmd = Command::new(program);
        cmd.stdin(Stdio::piped()).stdout(Stdio::null()).stderr(Stdio::piped());
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&out_path);

        let mut child = cmd
            .spawn()
            .map_err(|e| ExportError::Encoder(format!("failed to spawn {program}: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::Encoder("failed to open encoder stdin".into()))?;

        log::debug!("Encoding {}x{} @ {} fps to {}", width, height, fps, out_path.display());
        Ok(Self {
            frame_len: width as usize * height as usize * 4,
            out_path,
            child: Some(child),
            stdin: Some(stdin),
        })
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn push_frame(&mut self, rgba: &[u8]) -> ExportResult<()> {
        if rgba.len() != self.frame_len {
            return Err(ExportError::Encoder(format!(
                "frame is {} bytes, expected {}",
                rgba.len(),
                self.frame_len
            )));
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ExportError::Encoder("encoder already finished".into()));
        };

        use std::io::Write as _;
        stdin
            .write_all(rgba)
            .map_err(|e| ExportError::Encoder(format!("failed to write frame: {e}")))
    }

    fn finish(mut self) -> ExportResult<Vec<u8>> {
        drop(self.stdin.take());
        let Some(child) = self.child.take() else {
            return Err(ExportError::Encoder("encoder already finished".into()));
        };
        let output = child
            .wait_with_output()
            .map_err(|e| ExportError::Encoder(format!("failed to wait for encoder: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::Encoder(format!(
                "encoder exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(std::fs::read(&self.out_path)?)
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                log::debug!("Stopping unfinished encoder");
                let _ = child.kill();
            }
            let _ = child.wait();
        }
        remove_quietly(&self.out_path);
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("Could not remove {}: {}", path.display(), err),
    }
}

/// Line segments per frame so the drawing part lasts roughly `target_seconds`.
pub fn points_per_frame(total_points: usize, fps: u32, target_seconds: f64) -> usize {
    let frames = (fps as f64 * target_seconds).max(1.0);
    ((total_points as f64 / frames).ceil() as usize).max(1)
}

/// Position of the next segment to draw: the segment ends at
/// `strokes[stroke_index].points()[point_index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoCursor {
    pub stroke_index: usize,
    pub point_index: usize,
}

impl Default for VideoCursor {
    fn default() -> Self {
        Self { stroke_index: 0, point_index: 1 }
    }
}

impl VideoCursor {
    pub fn is_done(&self, strokes: &[StrokeRef]) -> bool {
        self.stroke_index >= strokes.len()
    }

    /// Draw up to `budget` segments onto `surface`. Returns how many were drawn.
    pub fn advance(&mut self, surface: &mut dyn Surface, strokes: &[StrokeRef], budget: usize) -> usize {
        let mut drawn = 0;
        self.skip_finished(strokes);
        while drawn < budget && !self.is_done(strokes) {
            let stroke = &strokes[self.stroke_index];
            let segment = &stroke.points()[self.point_index - 1..=self.point_index];
            render_stroke(
                surface,
                segment,
                stroke.color(),
                stroke.width() as f64,
                stroke.symmetry(),
                1.0,
                RenderMode::Replay,
            );
            self.point_index += 1;
            drawn += 1;
            self.skip_finished(strokes);
        }
        drawn
    }

    fn skip_finished(&mut self, strokes: &[StrokeRef]) {
        while let Some(stroke) = strokes.get(self.stroke_index) {
            if self.point_index < stroke.points().len() {
                break;
            }
            self.stroke_index += 1;
            self.point_index = 1;
        }
    }
}

/// Shared between the export thread and the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportProgress {
    pub frames_written: u32,
    pub estimated_frames: u32,
    pub done: bool,
}

impl ExportProgress {
    pub fn fraction(&self) -> f32 {
        if self.done {
            return 1.0;
        }
        if self.estimated_frames == 0 {
            return 0.0;
        }
        (self.frames_written as f32 / self.estimated_frames as f32).min(1.0)
    }
}

fn estimated_frames(strokes: &[StrokeRef], per_frame: usize, hold_frames: u32) -> u32 {
    let segments: usize = strokes.iter().map(|s| s.points().len().saturating_sub(1)).sum();
    (segments.div_ceil(per_frame) as u32).saturating_add(hold_frames)
}

/// Progressive replay of the whole log into `encoder`, then a short hold on
/// the finished frame. The frame is never cleared between pushes, so every
/// frame contains all segments drawn so far.
pub fn record_video<E: VideoEncoder>(
    strokes: &[StrokeRef],
    config: &ExportConfig,
    mut encoder: E,
    sink: &mut dyn SaveSink,
    created_at_ms: u64,
    progress: Option<&Mutex<ExportProgress>>,
) -> ExportResult<Option<String>> {
    if strokes.is_empty() {
        log::info!("Nothing to record");
        return Ok(None);
    }

    let mut surface = PixmapSurface::new(config.video_width, config.video_height)?;
    let layout = FrameLayout::for_frame(config.video_width, config.video_height);
    paint_backdrop(&mut surface, &layout, &Caption::for_strokes(strokes))?;
    surface.set_transform(compute_fit(strokes, &layout).transform(&layout));

    let per_frame = points_per_frame(total_points(strokes), config.fps, config.target_seconds);
    let hold = config.hold_frames();
    if let Some(progress) = progress {
        *progress.lock() = ExportProgress {
            frames_written: 0,
            estimated_frames: estimated_frames(strokes, per_frame, hold),
            done: false,
        };
    }
    let report = |frames: u32| {
        if let Some(progress) = progress {
            progress.lock().frames_written = frames;
        }
    };

    let mut cursor = VideoCursor::default();
    let mut frames = 0u32;
    while !cursor.is_done(strokes) {
        cursor.advance(&mut surface, strokes, per_frame);
        encoder.push_frame(surface.data())?;
        frames += 1;
        report(frames);
    }
    for _ in 0..hold {
        encoder.push_frame(surface.data())?;
        frames += 1;
        report(frames);
    }

    let bytes = encoder.finish()?;
    let filename = export_filename("mp4", created_at_ms);
    sink.save(&filename, &bytes)?;
    log::info!("Exported video {} ({} frames, {} segments/frame)", filename, frames, per_frame);
    Ok(Some(filename))
}

/// Background video export. Owns its snapshot of the log.
pub struct VideoExportHandle {
    progress: Arc<Mutex<ExportProgress>>,
    thread: JoinHandle<ExportResult<Option<String>>>,
}

impl VideoExportHandle {
    pub fn progress(&self) -> ExportProgress {
        self.progress.lock().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn join(self) -> ExportResult<Option<String>> {
        self.thread
            .join()
            .unwrap_or_else(|_| Err(ExportError::Encoder("video export thread panicked".into())))
    }
}

/// Start recording on a worker thread. `Ok(None)` when the log is empty.
pub fn spawn_video_export(
    strokes: Vec<StrokeRef>,
    config: ExportConfig,
    mut sink: Box<dyn SaveSink + Send>,
    created_at_ms: u64,
) -> ExportResult<Option<VideoExportHandle>> {
    if strokes.is_empty() {
        log::info!("Nothing to record");
        return Ok(None);
    }

    let progress = Arc::new(Mutex::new(ExportProgress::default()));
    let shared = Arc::clone(&progress);
    let thread = std::thread::Builder::new()
        .name("video-export".into())
        .spawn(move || {
            let scratch = std::env::temp_dir()
                .join(format!("sigil-{}-{}.mp4", created_at_ms, std::process::id()));
            let result = FfmpegEncoder::new(
                &config.ffmpeg_program,
                config.video_width,
                config.video_height,
                config.fps,
                scratch,
            )
            .and_then(|encoder| {
                record_video(&strokes, &config, encoder, &mut *sink, created_at_ms, Some(&shared))
            });
            shared.lock().done = true;
            result
        })?;

    Ok(Some(VideoExportHandle { progress, thread }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::renderer::RecordingSurface;
    use crate::stroke::Stroke;

    #[derive(Default)]
    struct FakeEncoder {
        frames: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl VideoEncoder for FakeEncoder {
        fn push_frame(&mut self, rgba: &[u8]) -> ExportResult<()> {
            self.frames.lock().push(rgba.to_vec());
            Ok(())
        }

        fn finish(self) -> ExportResult<Vec<u8>> {
            Ok(b"fake-mp4".to_vec())
        }
    }

    #[derive(Default)]
    struct MemorySink {
        saved: Vec<(String, Vec<u8>)>,
    }

    impl SaveSink for MemorySink {
        fn save(&mut self, filename: &str, bytes: &[u8]) -> ExportResult<()> {
            self.saved.push((filename.to_owned(), bytes.to_vec()));
            Ok(())
        }
    }

    fn line(n: usize, symmetry: u32) -> StrokeRef {
        let points = (0..n).map(|i| Point::new(5.0 + i as f64 * 3.0, 0.0)).collect();
        Arc::new(Stroke::new(points, "#00FFFF".into(), 3.0, symmetry, 0).unwrap())
    }

    fn small_config() -> ExportConfig {
        ExportConfig { video_width: 90, video_height: 120, ..Default::default() }
    }

    #[test]
    fn segment_budget_targets_five_seconds() {
        assert_eq!(points_per_frame(10, 30, 5.0), 1);
        assert_eq!(points_per_frame(150, 30, 5.0), 1);
        assert_eq!(points_per_frame(151, 30, 5.0), 2);
        assert_eq!(points_per_frame(0, 30, 5.0), 1);
    }

    #[test]
    fn cursor_walks_every_segment_once() {
        let strokes = vec![line(4, 2), line(3, 6)];
        let mut cursor = VideoCursor::default();
        let mut surface = RecordingSurface::new();

        assert_eq!(cursor.advance(&mut surface, &strokes, 2), 2);
        assert_eq!(cursor, VideoCursor { stroke_index: 0, point_index: 3 });
        // Budget spans the stroke boundary.
        assert_eq!(cursor.advance(&mut surface, &strokes, 2), 2);
        assert_eq!(cursor, VideoCursor { stroke_index: 1, point_index: 2 });
        assert_eq!(cursor.advance(&mut surface, &strokes, 10), 1);
        assert!(cursor.is_done(&strokes));

        // 3 segments x 2 replicas + 2 segments x 6 replicas
        assert_eq!(surface.paths.len(), 3 * 2 + 2 * 6);
        assert!(surface.paths.iter().all(|p| p.points == 2));
    }

    #[test]
    fn records_drawing_frames_then_hold() {
        let strokes = vec![line(5, 4), line(5, 4)];
        let encoder = FakeEncoder::default();
        let frames = Arc::clone(&encoder.frames);
        let progress = Mutex::new(ExportProgress::default());
        let mut sink = MemorySink::default();

        let name = record_video(&strokes, &small_config(), encoder, &mut sink, 7, Some(&progress)).unwrap();
        assert_eq!(name.as_deref(), Some("sigil-7.mp4"));
        assert_eq!(sink.saved, vec![("sigil-7.mp4".to_owned(), b"fake-mp4".to_vec())]);

        let frames = frames.lock();
        // 8 segments at one per frame, then 30 hold frames.
        assert_eq!(frames.len(), 8 + 30);
        assert!(frames.iter().all(|f| f.len() == 90 * 120 * 4));
        assert_eq!(frames[8], frames[frames.len() - 1]);
        assert_ne!(frames[0], frames[7], "frames must accumulate");

        let progress = progress.lock();
        assert_eq!(progress.frames_written, 38);
        assert_eq!(progress.estimated_frames, 38);
    }

    #[test]
    fn empty_log_skips_encoder_and_sink() {
        let encoder = FakeEncoder::default();
        let frames = Arc::clone(&encoder.frames);
        let mut sink = MemorySink::default();
        assert_eq!(record_video(&[], &small_config(), encoder, &mut sink, 1, None).unwrap(), None);
        assert!(frames.lock().is_empty());
        assert!(sink.saved.is_empty());
    }

    /// Accepts a few frames, then refuses the rest.
    struct FailingEncoder {
        accept: usize,
        fail_on_finish: bool,
    }

    impl VideoEncoder for FailingEncoder {
        fn push_frame(&mut self, _rgba: &[u8]) -> ExportResult<()> {
            if self.accept == 0 {
                return Err(ExportError::Encoder("pipe closed".into()));
            }
            self.accept -= 1;
            Ok(())
        }

        fn finish(self) -> ExportResult<Vec<u8>> {
            if self.fail_on_finish {
                return Err(ExportError::Encoder("encoder exited with 1".into()));
            }
            Ok(Vec::new())
        }
    }

    #[test]
    fn encoder_failure_ends_the_attempt_without_saving() {
        let strokes = vec![line(5, 4)];
        for encoder in [
            FailingEncoder { accept: 2, fail_on_finish: false },
            FailingEncoder { accept: usize::MAX, fail_on_finish: true },
        ] {
            let mut sink = MemorySink::default();
            let result = record_video(&strokes, &small_config(), encoder, &mut sink, 3, None);
            assert!(matches!(result, Err(ExportError::Encoder(_))));
            assert!(sink.saved.is_empty());
        }
    }

    #[derive(Clone, Default)]
    struct SharedSink {
        saved: Arc<Mutex<Vec<String>>>,
    }

    impl SaveSink for SharedSink {
        fn save(&mut self, filename: &str, _bytes: &[u8]) -> ExportResult<()> {
            self.saved.lock().push(filename.to_owned());
            Ok(())
        }
    }

    #[test]
    fn background_export_reports_missing_encoder() {
        let sink = SharedSink::default();
        let config = ExportConfig { ffmpeg_program: "sigil-no-such-encoder".into(), ..small_config() };
        let handle = spawn_video_export(vec![line(5, 2)], config, Box::new(sink.clone()), 11)
            .unwrap()
            .expect("non-empty log starts a worker");
        let progress = Arc::clone(&handle.progress);

        assert!(matches!(handle.join(), Err(ExportError::Encoder(_))));
        assert!(progress.lock().done);
        assert!(sink.saved.lock().is_empty());
    }

    #[test]
    fn background_export_of_empty_log_starts_nothing() {
        let handle = spawn_video_export(Vec::new(), small_config(), Box::new(SharedSink::default()), 1).unwrap();
        assert!(handle.is_none());
    }

    /// Stand-in for ffmpeg: touches its output path, drains stdin, exits with `code`.
    #[cfg(unix)]
    fn fake_ffmpeg(name: &str, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt as _;
        let path = std::env::temp_dir().join(format!("{name}-{}.sh", std::process::id()));
        let script = format!(
            "#!/bin/sh\nfor last; do :; done\necho partial > \"$last\"\ncat > /dev/null\necho boom >&2\nexit {code}\n"
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn wait_for(path: &Path) {
        for _ in 0..200 {
            if path.exists() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("{} never appeared", path.display());
    }

    #[cfg(unix)]
    #[test]
    fn failed_encoder_leaves_no_scratch_file() {
        let program = fake_ffmpeg("sigil-ffmpeg-fails", 1);
        let scratch = std::env::temp_dir().join(format!("sigil-fail-{}.mp4", std::process::id()));
        let encoder = FfmpegEncoder::new(program.to_str().unwrap(), 90, 120, 30, &scratch).unwrap();

        let mut sink = MemorySink::default();
        let result = record_video(&[line(4, 2)], &small_config(), encoder, &mut sink, 1, None);
        match result {
            Err(ExportError::Encoder(message)) => assert!(message.contains("boom"), "{message}"),
            other => panic!("expected encoder error, got {other:?}"),
        }
        assert!(sink.saved.is_empty());
        assert!(!scratch.exists());
        let _ = std::fs::remove_file(program);
    }

    #[cfg(unix)]
    #[test]
    fn abandoned_encoder_is_stopped_and_cleaned_up() {
        let program = fake_ffmpeg("sigil-ffmpeg-abandoned", 0);
        let scratch = std::env::temp_dir().join(format!("sigil-abandoned-{}.mp4", std::process::id()));
        let mut encoder = FfmpegEncoder::new(program.to_str().unwrap(), 90, 120, 30, &scratch).unwrap();
        wait_for(&scratch);

        assert!(encoder.push_frame(&[0; 16]).is_err());
        drop(encoder);
        assert!(!scratch.exists());
        let _ = std::fs::remove_file(program);
    }

    #[test]
    fn odd_sizes_are_rejected_before_spawning() {
        let err = FfmpegEncoder::new("ffmpeg", 91, 120, 30, std::env::temp_dir().join("x.mp4"));
        assert!(matches!(err, Err(ExportError::Encoder(_))));
    }

    #[test]
    fn progress_fraction() {
        let p = ExportProgress { frames_written: 5, estimated_frames: 10, done: false };
        assert_eq!(p.fraction(), 0.5);
        assert_eq!(ExportProgress { done: true, ..p }.fraction(), 1.0);
        assert_eq!(ExportProgress::default().fraction(), 0.0);
    }
}
