//! Offline re-render of the stroke log into still images and video clips.
//!
//! Exports work on a snapshot of the log and their own offscreen frame; they
//! never read or change the live camera or particles.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

mod backdrop;
mod pixmap;
mod still;
mod video;

pub use backdrop::{Caption, TITLE, paint_backdrop};
pub use pixmap::PixmapSurface;
pub use still::{export_still, render_still};
pub use video::{
    ExportProgress, FfmpegEncoder, VideoCursor, VideoEncoder, VideoExportHandle, points_per_frame,
    record_video, spawn_video_export,
};

/// Frame sizes, timing and tool locations for exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub still_width: u32,
    pub still_height: u32,
    pub video_width: u32,
    pub video_height: u32,
    pub fps: u32,
    /// Length of the drawing part of the clip.
    pub target_seconds: f64,
    /// Final frame hold after everything is drawn.
    pub hold_seconds: f64,
    pub ffmpeg_program: String,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            still_width: 1200,
            still_height: 1600,
            video_width: 900,
            video_height: 1200,
            fps: 30,
            target_seconds: 5.0,
            hold_seconds: 1.0,
            ffmpeg_program: "ffmpeg".to_owned(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportConfig {
    pub fn hold_frames(&self) -> u32 {
        (self.fps as f64 * self.hold_seconds.max(0.0)).round() as u32
    }
}

/// Where finished exports go (download folder, file dialog, memory in tests).
pub trait SaveSink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> ExportResult<()>;
}

/// Writes exports into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveSink for FileSink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> ExportResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).map_err(|e| ExportError::Sink {
            filename: filename.to_owned(),
            reason: e.to_string(),
        })?;
        log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// `sigil-<unix-ms>.<ext>`
pub fn export_filename(extension: &str, created_at_ms: u64) -> String {
    format!("sigil-{created_at_ms}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_embeds_timestamp() {
        assert_eq!(export_filename("png", 1_700_000_000_123), "sigil-1700000000123.png");
    }

    #[test]
    fn default_hold_is_one_second() {
        assert_eq!(ExportConfig::default().hold_frames(), 30);
    }

    #[test]
    fn file_sink_writes_into_directory() {
        let dir = std::env::temp_dir().join(format!("sigil-sink-test-{}", std::process::id()));
        let mut sink = FileSink::new(&dir);
        sink.save("a.bin", &[1, 2, 3]).unwrap();
        assert_eq!(std::fs::read(dir.join("a.bin")).unwrap(), vec![1, 2, 3]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
