//! Error types for angle resolution and binaural mixing

use thiserror::Error;

/// Spatial audio error types
#[derive(Error, Debug)]
pub enum SpatialError {
    /// Listener profile outside the measured subject set
    #[error("Invalid listener profile: {0} - valid profiles are D1, D2 and H3 to H20")]
    InvalidProfile(String),

    /// Sample rate without a measured IR set
    #[error("Invalid sample rate: {0} - valid rates are 44100, 48000, 96000")]
    InvalidSampleRate(u32),

    /// Unknown impulse response type
    #[error("Invalid response type: {0} - valid types are HRIR and BRIR")]
    InvalidResponseType(String),

    /// Unknown speaker layout name
    #[error("Unsupported layout: {name} - valid layouts are {valid}")]
    UnsupportedLayout { name: String, valid: String },

    /// Unknown resolution mode
    #[error("Invalid mode: {0} - valid modes are auto, nearest, planar, two_point, three_point")]
    InvalidMode(String),

    /// Unknown reverb identifier
    #[error("Invalid reverb type: {0} - choose from 1 (lecture_theatre), 2 (office), 3 (small_room), 4 (meeting_room)")]
    InvalidReverb(String),

    /// Pan position outside [-1, 1]
    #[error("Pan value must be between -1 and 1, got {0}")]
    InvalidPan(f64),

    /// Mix called without tracks
    #[error("Mix requires at least one track")]
    EmptyMix,

    /// Track buffers differ in length
    #[error("All tracks must have the same length: track '{track}' has {got} samples, expected {expected}")]
    TrackLengthMismatch {
        track: String,
        expected: usize,
        got: usize,
    },

    /// Track without azimuth or elevation in a binaural mix
    #[error("Track '{0}' must have azimuth and elevation specified")]
    MissingDirection(String),

    /// Track without pan in a stereo mix
    #[error("Track '{0}' must have a panning value (-1 to 1) specified")]
    MissingPan(String),

    /// Surround input does not match its layout
    #[error("Number of channels in the input ({got}) does not match the number of channels in the input speaker layout ({expected})")]
    InvalidChannelCount { expected: usize, got: usize },

    /// No directions to resolve against
    #[error("No measured angles available for {0}")]
    EmptyAngleSet(String),

    /// No impulse response stored at a measured angle
    #[error("No {response} impulse response for subject {profile} at azimuth {azimuth:.1}, elevation {elevation:.1}; try the {alternative} response type, it may have the angles needed for this layout")]
    ImpulseResponseNotFound {
        profile: String,
        response: String,
        alternative: String,
        azimuth: f64,
        elevation: f64,
    },

    /// No bounding triangle after all wrap-around retries
    #[error("Triangulation failed: no bounding triangle for azimuth {azimuth:.2}, elevation {elevation:.2}")]
    Triangulation { azimuth: f64, elevation: f64 },

    /// Backing impulse response store failure
    #[error("Impulse response store error: {0}")]
    Store(String),

    /// Config (de)serialization error
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;
