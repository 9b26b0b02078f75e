//! Error types for on-disk impulse response stores

use std::path::PathBuf;

use bx_spatial::SpatialError;
use thiserror::Error;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error in {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Impulse response directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Malformed impulse response filename: {0}")]
    MalformedFilename(String),

    #[error("Sample rate mismatch in {path}: expected {expected} Hz, got {got} Hz")]
    SampleRateMismatch {
        path: PathBuf,
        expected: u32,
        got: u32,
    },

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("Unexpected channel count in {path}: expected {expected}, got {got}")]
    ChannelCount {
        path: PathBuf,
        expected: usize,
        got: usize,
    },
}

/// Result type alias
pub type StoreResult<T> = Result<T, StoreError>;

impl From<rubato::ResamplerConstructionError> for StoreError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        StoreError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for StoreError {
    fn from(e: rubato::ResampleError) -> Self {
        StoreError::Resample(e.to_string())
    }
}

impl From<StoreError> for SpatialError {
    fn from(e: StoreError) -> Self {
        SpatialError::Store(e.to_string())
    }
}
