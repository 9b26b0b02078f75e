//! Mix input tracks

use crate::position::Direction;

/// One mono source in a mix
///
/// Binaural mixes need `azimuth` and `elevation`; stereo mixes need `pan`.
#[derive(Debug, Clone, PartialEq)]
pub struct Track<'a> {
    /// Name used in errors and logs
    pub name: String,
    /// Mono samples
    pub audio: &'a [f32],
    /// Degrees, [0, 360) after normalization
    pub azimuth: Option<f64>,
    /// Degrees from the horizon
    pub elevation: Option<f64>,
    /// Stereo position, -1 (left) to 1 (right)
    pub pan: Option<f64>,
    /// Linear gain applied after rendering
    pub level: f32,
    /// Reverb send, kept in 0 (dry) to 1 (fully wet) by `with_reverb`
    reverb: f32,
}

impl<'a> Track<'a> {
    /// Create a dry, unity-level track with no position
    pub fn new(name: impl Into<String>, audio: &'a [f32]) -> Self {
        Self {
            name: name.into(),
            audio,
            azimuth: None,
            elevation: None,
            pan: None,
            level: 1.0,
            reverb: 0.0,
        }
    }

    /// Set azimuth and elevation
    pub fn with_direction(mut self, azimuth: f64, elevation: f64) -> Self {
        self.azimuth = Some(azimuth);
        self.elevation = Some(elevation);
        self
    }

    /// Set azimuth only
    pub fn with_azimuth(mut self, azimuth: f64) -> Self {
        self.azimuth = Some(azimuth);
        self
    }

    /// Set elevation only
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Set stereo pan
    pub fn with_pan(mut self, pan: f64) -> Self {
        self.pan = Some(pan);
        self
    }

    /// Set level
    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    /// Set reverb send (clamped to 0-1, NaN reads as dry)
    pub fn with_reverb(mut self, reverb: f32) -> Self {
        self.reverb = if reverb.is_nan() { 0.0 } else { reverb.clamp(0.0, 1.0) };
        self
    }

    /// Reverb send in [0, 1]
    pub fn reverb(&self) -> f32 {
        self.reverb
    }

    /// Source direction when both angles are set
    pub fn direction(&self) -> Option<Direction> {
        Some(Direction::new(self.azimuth?, self.elevation?))
    }

    /// Samples
    pub fn len(&self) -> usize {
        self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}
