//! Impulse response model and storage seams
//!
//! Measured HRIR/BRIR sets are addressed by [`IrContext`] (listener profile,
//! response type, sample rate) plus a measured [`Direction`]. Storage lives
//! behind three traits so the resolver and mixer never touch the filesystem:
//! - [`ImpulseResponseProvider`] loads one stereo IR
//! - [`AngleDiscovery`] lists the measured directions
//! - [`ReverbLibrary`] serves the mono room responses used for the reverb send

mod cache;
mod memory;

pub use cache::CachedProvider;
pub use memory::MemoryStore;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{SpatialError, SpatialResult};
use crate::position::Direction;

/// Measured listener (dummy head or human subject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerProfile {
    /// Dummy head, D1 or D2
    Dummy(u8),
    /// Human subject, H3 to H20
    Human(u8),
}

impl ListenerProfile {
    /// Every valid profile, in subject order
    pub fn all() -> impl Iterator<Item = ListenerProfile> {
        (1..=2).map(Self::Dummy).chain((3..=20).map(Self::Human))
    }

    /// Subject number
    pub fn subject(&self) -> u8 {
        match self {
            Self::Dummy(n) | Self::Human(n) => *n,
        }
    }
}

impl FromStr for ListenerProfile {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpatialError::InvalidProfile(s.to_string());
        let (kind, number) = s.split_at_checked(1).ok_or_else(invalid)?;
        let number: u8 = number.parse().map_err(|_| invalid())?;

        match kind {
            "D" if (1..=2).contains(&number) => Ok(Self::Dummy(number)),
            "H" if (3..=20).contains(&number) => Ok(Self::Human(number)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ListenerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dummy(n) => write!(f, "D{}", n),
            Self::Human(n) => write!(f, "H{}", n),
        }
    }
}

/// Sample rates with a measured IR set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum SampleRate {
    Hz44100 = 44100,
    Hz48000 = 48000,
    Hz96000 = 96000,
}

impl SampleRate {
    /// Validate a rate in Hz
    pub fn from_hz(hz: u32) -> SpatialResult<Self> {
        match hz {
            44100 => Ok(Self::Hz44100),
            48000 => Ok(Self::Hz48000),
            96000 => Ok(Self::Hz96000),
            other => Err(SpatialError::InvalidSampleRate(other)),
        }
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::Hz48000
    }
}

/// Anechoic head response or binaural room response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseType {
    #[serde(rename = "HRIR")]
    Hrir,
    #[serde(rename = "BRIR")]
    Brir,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hrir => "HRIR",
            Self::Brir => "BRIR",
        }
    }

    /// The other response type, suggested when an angle is missing
    pub fn alternative(&self) -> Self {
        match self {
            Self::Hrir => Self::Brir,
            Self::Brir => Self::Hrir,
        }
    }
}

impl FromStr for ResponseType {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HRIR" => Ok(Self::Hrir),
            "BRIR" => Ok(Self::Brir),
            _ => Err(SpatialError::InvalidResponseType(s.to_string())),
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses one measured IR set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrContext {
    pub profile: ListenerProfile,
    pub response: ResponseType,
    pub sample_rate: SampleRate,
}

impl IrContext {
    /// Create from already-validated parts
    pub fn new(profile: ListenerProfile, response: ResponseType, sample_rate: SampleRate) -> Self {
        Self {
            profile,
            response,
            sample_rate,
        }
    }

    /// Parse and validate user-facing values ("D2", "BRIR", 48000)
    pub fn parse(profile: &str, response: &str, sample_rate: u32) -> SpatialResult<Self> {
        Ok(Self::new(
            profile.parse()?,
            response.parse()?,
            SampleRate::from_hz(sample_rate)?,
        ))
    }

    /// Not-found error for a direction in this set
    pub fn not_found(&self, direction: Direction) -> SpatialError {
        SpatialError::ImpulseResponseNotFound {
            profile: self.profile.to_string(),
            response: self.response.to_string(),
            alternative: self.response.alternative().to_string(),
            azimuth: direction.azimuth,
            elevation: direction.elevation,
        }
    }
}

impl fmt::Display for IrContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} Hz", self.profile, self.response, self.sample_rate.as_u32())
    }
}

/// Stereo impulse response, immutable once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    /// Left ear
    pub left: Vec<f32>,
    /// Right ear
    pub right: Vec<f32>,
}

impl ImpulseResponse {
    /// Create new impulse response
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        Self { left, right }
    }

    /// Single-sample unit impulse on both ears
    pub fn identity() -> Self {
        Self::new(vec![1.0], vec![1.0])
    }

    /// Filter length (longest ear)
    pub fn len(&self) -> usize {
        self.left.len().max(self.right.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weighted sum of several responses, zero-padded to the longest
    pub fn blend(parts: &[(Arc<ImpulseResponse>, f64)]) -> Self {
        let len = parts.iter().map(|(ir, _)| ir.len()).max().unwrap_or(0);
        let mut left = vec![0.0f32; len];
        let mut right = vec![0.0f32; len];

        for (ir, weight) in parts {
            let weight = *weight as f32;
            for (out, &sample) in left.iter_mut().zip(&ir.left) {
                *out += sample * weight;
            }
            for (out, &sample) in right.iter_mut().zip(&ir.right) {
                *out += sample * weight;
            }
        }

        Self { left, right }
    }
}

/// Room response used for the reverb send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReverbKind {
    LectureTheatre,
    Office,
    SmallRoom,
    MeetingRoom,
}

impl ReverbKind {
    pub const ALL: [ReverbKind; 4] = [
        Self::LectureTheatre,
        Self::Office,
        Self::SmallRoom,
        Self::MeetingRoom,
    ];

    /// Numeric identifier ("1" to "4")
    pub fn id(&self) -> u8 {
        match self {
            Self::LectureTheatre => 1,
            Self::Office => 2,
            Self::SmallRoom => 3,
            Self::MeetingRoom => 4,
        }
    }

    /// Name used for the stored response file
    pub fn name(&self) -> &'static str {
        match self {
            Self::LectureTheatre => "lecture_theatre",
            Self::Office => "office",
            Self::SmallRoom => "small_room",
            Self::MeetingRoom => "meeting_room",
        }
    }
}

impl Default for ReverbKind {
    fn default() -> Self {
        Self::LectureTheatre
    }
}

impl FromStr for ReverbKind {
    type Err = SpatialError;

    /// Accepts the numeric id or the name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| s == kind.id().to_string() || s == kind.name())
            .ok_or_else(|| SpatialError::InvalidReverb(s.to_string()))
    }
}

impl fmt::Display for ReverbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loads the stereo impulse response measured at a direction
pub trait ImpulseResponseProvider: Send + Sync {
    /// Fails with [`SpatialError::ImpulseResponseNotFound`] when the angle was never measured
    fn load(&self, ctx: &IrContext, direction: Direction) -> SpatialResult<Arc<ImpulseResponse>>;
}

/// Lists the directions measured for an IR set
pub trait AngleDiscovery: Send + Sync {
    fn measured_angles(&self, ctx: &IrContext) -> SpatialResult<Vec<Direction>>;
}

/// Serves mono room responses
pub trait ReverbLibrary: Send + Sync {
    fn reverb(&self, kind: ReverbKind, sample_rate: SampleRate) -> SpatialResult<Arc<[f32]>>;
}
