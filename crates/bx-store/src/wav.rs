//! WAV decoding into per-channel f32 buffers

use std::path::Path;

use crate::error::{StoreError, StoreResult};

/// Decoded WAV file
#[derive(Debug, Clone)]
pub struct WavData {
    /// Samples per channel
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl WavData {
    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Average of all channels
    pub fn into_mono(self) -> Vec<f32> {
        let count = self.channels.len();
        let mut channels = self.channels.into_iter();
        let Some(mut mono) = channels.next() else {
            return Vec::new();
        };
        if count == 1 {
            return mono;
        }

        for channel in channels {
            for (m, s) in mono.iter_mut().zip(channel) {
                *m += s;
            }
        }
        let scale = 1.0 / count as f32;
        mono.iter_mut().for_each(|m| *m *= scale);
        mono
    }
}

/// Read a WAV file, normalizing integer samples to [-1, 1)
pub fn read_wav(path: &Path) -> StoreResult<WavData> {
    let wav_error = |source| StoreError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let reader = hound::WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();
    let num_channels = spec.channels.max(1) as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wav_error)?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_error)?
        }
    };

    // Deinterleave channels
    let num_samples = samples.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(num_samples); num_channels];
    for (i, sample) in samples.into_iter().enumerate() {
        channels[i % num_channels].push(sample);
    }

    Ok(WavData {
        channels,
        sample_rate: spec.sample_rate,
    })
}
