//! Configuration errors
//!
//! Raised while building a track or loading settings. The per-step
//! simulation path never fails.

use thiserror::Error;

/// Errors raised when a track or configuration cannot support a simulation.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("track raster is empty")]
    EmptyRaster,
    #[error("raster of {width}x{height} pixels is too large to address")]
    RasterTooLarge { width: usize, height: usize },
    #[error("raster buffer holds {actual} bytes, expected {expected}")]
    RasterSizeMismatch { expected: usize, actual: usize },
    #[error("track has no start tiles")]
    MissingStartTiles,
    #[error("track has no end tiles")]
    MissingEndTiles,
    #[error("start marker spans {width}x{height} pixels; its height must be non-zero")]
    DegenerateStartMarker { width: i64, height: i64 },
    #[error("{field} must be greater than {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be strictly between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json invalid: {0}")]
    Json(#[from] serde_json::Error),
}
