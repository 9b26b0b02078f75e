//! Multi-track binaural and stereo mixing
//!
//! Every track is optionally sent through the configured room response
//! (wet/dry cross-fade), then rendered (HRIR/BRIR or pan law), scaled by its
//! level and summed. All tracks in a mix must be the same length.

mod surround;
mod track;

pub use track::Track;

use std::sync::Arc;

use crate::binaural::{BinauralRenderer, RenderContext, StereoBuffer, convolve};
use crate::config::{MixConfig, TrackFailurePolicy};
use crate::error::{SpatialError, SpatialResult};
use crate::ir::{AngleDiscovery, ImpulseResponseProvider, ReverbLibrary, SampleRate};
use crate::position::pan_gains;

/// Track field a mix requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Direction,
    Pan,
}

/// Multi-track mixer
pub struct Mixer {
    renderer: BinauralRenderer,
    reverbs: Arc<dyn ReverbLibrary>,
    config: MixConfig,
}

impl Mixer {
    /// Create new mixer
    pub fn new(renderer: BinauralRenderer, reverbs: Arc<dyn ReverbLibrary>, config: MixConfig) -> Self {
        Self {
            renderer,
            reverbs,
            config,
        }
    }

    /// Create from a store serving responses, angles and reverbs
    pub fn from_store<S>(store: Arc<S>, config: MixConfig) -> Self
    where
        S: AngleDiscovery + ImpulseResponseProvider + ReverbLibrary + 'static,
    {
        let renderer = BinauralRenderer::from_store(Arc::clone(&store), config.resolver.clone());
        Self::new(renderer, store, config)
    }

    pub fn renderer(&self) -> &BinauralRenderer {
        &self.renderer
    }

    pub fn config(&self) -> &MixConfig {
        &self.config
    }

    /// Mix positioned tracks to binaural stereo
    ///
    /// Output length is the track length (plus the reverb tail when any track
    /// uses the send) plus the longest rendered impulse response, minus one.
    pub fn mix_binaural(&self, tracks: &[Track], ctx: &RenderContext) -> SpatialResult<StereoBuffer> {
        validate(tracks, Placement::Direction)?;

        let reverb = self.reverb_for(tracks, ctx.ir.sample_rate)?;
        let reference_len = reference_length(tracks, reverb.as_deref());
        let mut output = StereoBuffer::new(reference_len);

        for track in tracks {
            let Some(direction) = track.direction() else {
                return Err(SpatialError::MissingDirection(track.name.clone()));
            };

            let signal = blend_reverb(track, reverb.as_deref(), reference_len);
            let rendered = match self.renderer.render_source(&signal, direction, ctx) {
                Ok(rendered) => rendered,
                Err(e) => {
                    self.on_track_failure(track, e)?;
                    continue;
                }
            };

            log::info!(
                "Mixed track '{}' at {} (level {:.2}, reverb {:.2})",
                track.name,
                direction,
                track.level,
                track.reverb()
            );
            output.add_scaled(&rendered, track.level);
        }

        Ok(output)
    }

    /// Mix panned tracks to plain stereo
    pub fn mix_stereo(&self, tracks: &[Track], sample_rate: SampleRate) -> SpatialResult<StereoBuffer> {
        validate(tracks, Placement::Pan)?;

        let reverb = self.reverb_for(tracks, sample_rate)?;
        let reference_len = reference_length(tracks, reverb.as_deref());
        let mut output = StereoBuffer::new(reference_len);

        for track in tracks {
            let Some(pan) = track.pan else {
                return Err(SpatialError::MissingPan(track.name.clone()));
            };
            let (left, right) = pan_gains(pan)?;

            let signal = blend_reverb(track, reverb.as_deref(), reference_len);
            log::info!("Mixed track '{}' at pan {:.2}", track.name, pan);
            output.add_mono(
                &signal,
                left as f32 * track.level,
                right as f32 * track.level,
            );
        }

        Ok(output)
    }

    /// Load the room response once, only if some track sends to it
    fn reverb_for(&self, tracks: &[Track], sample_rate: SampleRate) -> SpatialResult<Option<Arc<[f32]>>> {
        if tracks.iter().any(|t| t.reverb() > 0.0) {
            self.reverbs.reverb(self.config.reverb, sample_rate).map(Some)
        } else {
            Ok(None)
        }
    }

    fn on_track_failure(&self, track: &Track, error: SpatialError) -> SpatialResult<()> {
        match self.config.on_track_failure {
            TrackFailurePolicy::Abort => Err(error),
            TrackFailurePolicy::Skip => {
                log::warn!("Skipping track '{}': {}", track.name, error);
                Ok(())
            }
        }
    }
}

/// Non-empty, equal lengths, placement present (and pan in range)
fn validate(tracks: &[Track], placement: Placement) -> SpatialResult<()> {
    let Some(first) = tracks.first() else {
        return Err(SpatialError::EmptyMix);
    };

    for track in tracks {
        if track.len() != first.len() {
            return Err(SpatialError::TrackLengthMismatch {
                track: track.name.clone(),
                expected: first.len(),
                got: track.len(),
            });
        }

        match placement {
            Placement::Direction if track.direction().is_none() => {
                return Err(SpatialError::MissingDirection(track.name.clone()));
            }
            Placement::Pan => match track.pan {
                None => return Err(SpatialError::MissingPan(track.name.clone())),
                Some(pan) => {
                    pan_gains(pan)?;
                }
            },
            Placement::Direction => {}
        }
    }

    Ok(())
}

/// Track length, extended by the reverb tail when a send is active
fn reference_length(tracks: &[Track], reverb: Option<&[f32]>) -> usize {
    let len = tracks.iter().map(Track::len).max().unwrap_or(0);
    match reverb {
        Some(ir) if len > 0 && !ir.is_empty() => len + ir.len() - 1,
        _ => len,
    }
}

/// Wet/dry cross-fade, zero-padded to `reference_len`
fn blend_reverb(track: &Track, reverb: Option<&[f32]>, reference_len: usize) -> Vec<f32> {
    let mut dry = track.audio.to_vec();
    dry.resize(reference_len.max(dry.len()), 0.0);

    match reverb {
        Some(ir) if track.reverb() > 0.0 => {
            let wet = convolve(track.audio, ir);
            let mix = track.reverb();
            for (out, w) in dry.iter_mut().zip(&wet) {
                *out = w * mix + *out * (1.0 - mix);
            }
            if wet.len() < dry.len() {
                for out in &mut dry[wet.len()..] {
                    *out *= 1.0 - mix;
                }
            }
            dry
        }
        _ => dry,
    }
}
