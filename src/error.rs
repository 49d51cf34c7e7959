use thiserror::Error;

/// Reasons a captured point buffer cannot become a [`crate::Stroke`].
#[derive(Debug, Error, PartialEq)]
pub enum StrokeError {
    #[error("stroke needs at least {min} points, got {got}")]
    TooFewPoints { min: usize, got: usize },
    #[error("stroke width must be positive, got {0}")]
    InvalidWidth(f32),
    #[error("symmetry count must be at least 1")]
    ZeroSymmetry,
}

/// Failures of a single export attempt. None of these touch live drawing state.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to allocate a {width}x{height} export frame")]
    FrameAllocation { width: u32, height: u32 },
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("video encoder error: {0}")]
    Encoder(String),
    #[error("caption font could not be loaded: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("save sink rejected '{filename}': {reason}")]
    Sink { filename: String, reason: String },
}

pub type ExportResult<T> = Result<T, ExportError>;
