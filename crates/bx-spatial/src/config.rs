//! Resolver and mixer configuration

use serde::{Deserialize, Serialize};

use crate::error::SpatialResult;
use crate::ir::ReverbKind;

/// What to do when no bounding triangle exists for a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangulationFailurePolicy {
    /// Return the triangulation error
    #[default]
    Fail,
    /// Snap to the nearest measured angle and note the fallback
    NearestAngle,
}

/// What the mixer does when one track cannot be resolved or loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackFailurePolicy {
    /// Abort the whole mix
    #[default]
    Abort,
    /// Log a warning and leave the track out
    Skip,
}

/// Angle resolution tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Below this Cartesian distance the nearest angle is used directly
    pub distance_threshold: f64,

    /// Max difference between the 2-point residual and the nearest angle's
    /// distance for the blend to collapse to that single angle
    pub collapse_tolerance: f64,

    /// Triangulation failure handling
    pub on_triangulation_failure: TriangulationFailurePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.035,
            collapse_tolerance: 0.0005,
            on_triangulation_failure: TriangulationFailurePolicy::Fail,
        }
    }
}

impl ResolverConfig {
    /// Set nearest-snap threshold
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Set 2-point collapse tolerance
    pub fn with_collapse_tolerance(mut self, tolerance: f64) -> Self {
        self.collapse_tolerance = tolerance;
        self
    }

    /// Set triangulation failure policy
    pub fn with_triangulation_failure(mut self, policy: TriangulationFailurePolicy) -> Self {
        self.on_triangulation_failure = policy;
        self
    }
}

/// Mixer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixConfig {
    /// Angle resolution settings
    pub resolver: ResolverConfig,

    /// Room response used for the reverb send
    pub reverb: ReverbKind,

    /// Per-track failure handling
    pub on_track_failure: TrackFailurePolicy,

    /// Level applied to every channel when re-rendering surround files
    pub surround_channel_level: f32,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            reverb: ReverbKind::LectureTheatre,
            on_track_failure: TrackFailurePolicy::Abort,
            surround_channel_level: 0.5,
        }
    }
}

impl MixConfig {
    /// Set resolver settings
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set reverb room
    pub fn with_reverb(mut self, reverb: ReverbKind) -> Self {
        self.reverb = reverb;
        self
    }

    /// Set track failure policy
    pub fn with_track_failure(mut self, policy: TrackFailurePolicy) -> Self {
        self.on_track_failure = policy;
        self
    }

    /// Set surround channel level
    pub fn with_surround_channel_level(mut self, level: f32) -> Self {
        self.surround_channel_level = level;
        self
    }

    /// Parse from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> SpatialResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> SpatialResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
