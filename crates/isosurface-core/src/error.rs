//! Error types for isosurface-rs.

use glam::DVec3;
use thiserror::Error;

/// The main error type for isosurface extraction.
#[derive(Error, Debug)]
pub enum IsosurfaceError {
    /// The grid must have at least one cell per axis.
    #[error("resolution must be at least 1")]
    ZeroResolution,

    /// Domain bounds are inverted, degenerate, or not finite along an axis.
    #[error("invalid domain on axis {axis}: bounds {min}..{max} must be finite with a finite, non-zero cell size")]
    InvalidDomain { axis: char, min: f64, max: f64 },

    /// At least one worker is required.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// The total cell count does not fit in a `usize`.
    #[error("resolution {resolution} produces more cells than can be indexed")]
    TooManyCells { resolution: u32 },

    /// The iso-threshold is NaN or infinite.
    #[error("iso-threshold must be finite, got {0}")]
    NonFiniteThreshold(f64),

    /// The scalar field refused to evaluate a point.
    #[error("scalar field failed at {point}: {message}")]
    Field { point: DVec3, message: String },

    /// The scalar field produced NaN or an infinity.
    #[error("scalar field returned non-finite value {value} at {point}")]
    NonFiniteSample { point: DVec3, value: f64 },

    /// The worker thread pool could not be created.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IsosurfaceError {
    /// Convenience constructor for field implementations that can fail.
    pub fn field(point: DVec3, message: impl Into<String>) -> Self {
        Self::Field {
            point,
            message: message.into(),
        }
    }

    /// Returns true for errors detected before extraction starts.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ZeroResolution
                | Self::InvalidDomain { .. }
                | Self::ZeroWorkers
                | Self::TooManyCells { .. }
                | Self::NonFiniteThreshold(_)
                | Self::Json(_)
        )
    }
}

impl From<rayon::ThreadPoolBuildError> for IsosurfaceError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::WorkerPool(err.to_string())
    }
}

/// A specialized Result type for isosurface operations.
pub type Result<T> = std::result::Result<T, IsosurfaceError>;
