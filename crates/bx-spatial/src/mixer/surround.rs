//! Surround to binaural re-rendering

use super::{Mixer, Track};
use crate::binaural::{RenderContext, StereoBuffer};
use crate::error::{SpatialError, SpatialResult};
use crate::layout::SpeakerLayout;

impl Mixer {
    /// Render each surround channel as a source at its speaker position
    ///
    /// `channels` must be in the layout's channel order. Every channel is
    /// mixed dry at the configured surround level.
    pub fn render_surround_to_binaural(
        &self,
        channels: &[Vec<f32>],
        input_layout: &SpeakerLayout,
        ctx: &RenderContext,
    ) -> SpatialResult<StereoBuffer> {
        if channels.len() != input_layout.channel_count() {
            return Err(SpatialError::InvalidChannelCount {
                expected: input_layout.channel_count(),
                got: channels.len(),
            });
        }

        let level = self.config.surround_channel_level;
        let tracks: Vec<Track> = input_layout
            .channels
            .iter()
            .zip(channels)
            .map(|(channel, audio)| {
                Track::new(channel.name, audio)
                    .with_direction(channel.direction.azimuth, channel.direction.elevation)
                    .with_level(level)
            })
            .collect();

        log::info!(
            "Rendering {} surround channels ({}) to binaural via {}",
            tracks.len(),
            input_layout.name,
            ctx.layout
        );
        self.mix_binaural(&tracks, ctx)
    }
}
