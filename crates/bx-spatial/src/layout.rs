//! Surround speaker layouts
//!
//! Channel order follows the SMPTE/Dolby convention used by multichannel
//! WAV masters. Azimuths run anticlockwise from the front (L = 30, R = 330).

use std::fmt;

use crate::error::{SpatialError, SpatialResult};
use crate::position::Direction;

/// Name of the layout that leaves the measured angle set unfiltered
pub const UNRESTRICTED: &str = "none";

/// Single loudspeaker in a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurroundChannel {
    /// Channel label (e.g. "L", "Lss", "Ltf")
    pub name: &'static str,
    /// Speaker direction
    pub direction: Direction,
}

impl SurroundChannel {
    const fn new(name: &'static str, azimuth: f64, elevation: f64) -> Self {
        Self {
            name,
            direction: Direction::from_normalized(azimuth, elevation),
        }
    }

    /// Is this the subwoofer channel
    pub fn is_lfe(&self) -> bool {
        self.name == "Lfe"
    }
}

/// Named, ordered speaker layout
#[derive(Debug, PartialEq)]
pub struct SpeakerLayout {
    /// Layout name ("7.1.4", "5.1", ...)
    pub name: &'static str,
    /// Channels in file order
    pub channels: &'static [SurroundChannel],
}

const L: SurroundChannel = SurroundChannel::new("L", 30.0, 0.0);
const R: SurroundChannel = SurroundChannel::new("R", 330.0, 0.0);
const C: SurroundChannel = SurroundChannel::new("C", 0.0, 0.0);
const LFE: SurroundChannel = SurroundChannel::new("Lfe", 0.0, 0.0);
const LSS: SurroundChannel = SurroundChannel::new("Lss", 90.0, 0.0);
const RSS: SurroundChannel = SurroundChannel::new("Rss", 270.0, 0.0);
const LRS_7: SurroundChannel = SurroundChannel::new("Lrs", 135.0, 0.0);
const RRS_7: SurroundChannel = SurroundChannel::new("Rrs", 225.0, 0.0);
const LRS_5: SurroundChannel = SurroundChannel::new("Lrs", 120.0, 0.0);
const RRS_5: SurroundChannel = SurroundChannel::new("Rrs", 240.0, 0.0);
const LW: SurroundChannel = SurroundChannel::new("Lw", 60.0, 0.0);
const RW: SurroundChannel = SurroundChannel::new("Rw", 300.0, 0.0);
const LTF: SurroundChannel = SurroundChannel::new("Ltf", 45.0, 35.3);
const RTF: SurroundChannel = SurroundChannel::new("Rtf", 315.0, 35.3);
const LTB: SurroundChannel = SurroundChannel::new("Ltb", 135.0, 35.3);
const RTB: SurroundChannel = SurroundChannel::new("Rtb", 225.0, 35.3);

/// Every supported layout, in lookup order
pub static LAYOUTS: &[SpeakerLayout] = &[
    SpeakerLayout {
        name: "7.1",
        channels: &[L, R, C, LFE, LSS, RSS, LRS_7, RRS_7],
    },
    SpeakerLayout {
        name: "7.1.4",
        channels: &[L, R, C, LFE, LSS, RSS, LRS_7, RRS_7, LTF, RTF, LTB, RTB],
    },
    SpeakerLayout {
        name: "7.1.2",
        channels: &[L, R, C, LFE, LSS, RSS, LRS_7, RRS_7, LTF, RTF],
    },
    SpeakerLayout {
        name: "5.1",
        channels: &[L, R, C, LFE, LRS_5, RRS_5],
    },
    SpeakerLayout {
        name: "5.1.4",
        channels: &[L, R, C, LFE, LRS_5, RRS_5, LTF, RTF, LTB, RTB],
    },
    SpeakerLayout {
        name: "5.1.2",
        channels: &[L, R, C, LFE, LRS_5, RRS_5, LTF, RTF],
    },
    SpeakerLayout {
        name: "9.1.4",
        channels: &[L, R, C, LFE, LSS, RSS, LRS_7, RRS_7, LW, RW, LTF, RTF, LTB, RTB],
    },
    SpeakerLayout {
        name: "9.1.2",
        channels: &[L, R, C, LFE, LSS, RSS, LRS_7, RRS_7, LW, RW, LTF, RTF],
    },
    SpeakerLayout {
        name: "9.1",
        channels: &[L, R, C, LFE, LSS, RSS, LRS_7, RRS_7, LW, RW],
    },
];

impl SpeakerLayout {
    /// Look up a layout by name
    pub fn by_name(name: &str) -> SpatialResult<&'static SpeakerLayout> {
        LAYOUTS
            .iter()
            .find(|layout| layout.name == name)
            .ok_or_else(|| SpatialError::UnsupportedLayout {
                name: name.to_string(),
                valid: Self::supported_names().join(", "),
            })
    }

    /// Names of all supported layouts
    pub fn supported_names() -> Vec<&'static str> {
        LAYOUTS.iter().map(|layout| layout.name).collect()
    }

    /// Total channel count (including LFE)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Directions of all non-LFE channels
    pub fn speaker_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.channels
            .iter()
            .filter(|channel| !channel.is_lfe())
            .map(|channel| channel.direction)
    }

    /// Has any overhead speaker
    pub fn has_elevation(&self) -> bool {
        self.channels.iter().any(|channel| channel.direction.elevation != 0.0)
    }

    /// Find channel by label
    pub fn channel(&self, name: &str) -> Option<&SurroundChannel> {
        self.channels.iter().find(|channel| channel.name == name)
    }
}

/// Angle set restriction applied when rendering
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RenderLayout {
    /// Every measured angle
    #[default]
    Unrestricted,
    /// Only the speaker directions of a surround layout
    Surround(&'static SpeakerLayout),
}

impl RenderLayout {
    /// Parse a layout name, accepting "none" for the full angle set
    pub fn parse(name: &str) -> SpatialResult<Self> {
        if name == UNRESTRICTED {
            Ok(Self::Unrestricted)
        } else {
            SpeakerLayout::by_name(name).map(Self::Surround)
        }
    }

    /// Layout name ("none" when unrestricted)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unrestricted => UNRESTRICTED,
            Self::Surround(layout) => layout.name,
        }
    }

    /// Can a source be placed above or below the horizon
    pub fn has_elevation(&self) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Surround(layout) => layout.has_elevation(),
        }
    }
}

impl fmt::Display for RenderLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_counts() {
        let expected = [
            ("7.1", 8),
            ("7.1.4", 12),
            ("7.1.2", 10),
            ("5.1", 6),
            ("5.1.4", 10),
            ("5.1.2", 8),
            ("9.1.4", 14),
            ("9.1.2", 12),
            ("9.1", 10),
        ];
        for (name, count) in expected {
            assert_eq!(SpeakerLayout::by_name(name).unwrap().channel_count(), count, "{}", name);
        }
    }

    #[test]
    fn test_supported_order() {
        assert_eq!(
            SpeakerLayout::supported_names(),
            vec!["7.1", "7.1.4", "7.1.2", "5.1", "5.1.4", "5.1.2", "9.1.4", "9.1.2", "9.1"]
        );
    }

    #[test]
    fn test_unknown_layout_lists_valid() {
        let err = SpeakerLayout::by_name("22.2").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("22.2"));
        assert!(message.contains("7.1.4"));
    }

    #[test]
    fn test_lfe_excluded() {
        let layout = SpeakerLayout::by_name("5.1").unwrap();
        let dirs: Vec<_> = layout.speaker_directions().collect();
        assert_eq!(dirs.len(), 5);
    }

    #[test]
    fn test_surround_rear_angles() {
        let five = SpeakerLayout::by_name("5.1").unwrap();
        assert_eq!(five.channel("Lrs").unwrap().direction.azimuth, 120.0);
        let seven = SpeakerLayout::by_name("7.1").unwrap();
        assert_eq!(seven.channel("Lrs").unwrap().direction.azimuth, 135.0);
    }

    #[test]
    fn test_render_layout() {
        assert_eq!(RenderLayout::parse("none").unwrap(), RenderLayout::Unrestricted);
        assert!(RenderLayout::Unrestricted.has_elevation());
        assert!(!RenderLayout::parse("7.1").unwrap().has_elevation());
        assert!(RenderLayout::parse("5.1.2").unwrap().has_elevation());
        assert!(RenderLayout::parse("stereo").is_err());
        assert_eq!(RenderLayout::parse("9.1.4").unwrap().to_string(), "9.1.4");
    }
}
