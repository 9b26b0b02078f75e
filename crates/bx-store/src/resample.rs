//! Sample rate conversion for room responses

use rubato::{FftFixedIn, Resampler};

use crate::error::StoreResult;

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Output frames for `frames` input frames at the new rate
pub fn resampled_len(frames: usize, source_rate: u32, target_rate: u32) -> usize {
    (frames as f64 * target_rate as f64 / source_rate as f64).ceil() as usize
}

/// Resample a mono signal, compensating the resampler delay
///
/// The result is exactly [`resampled_len`] frames long.
pub fn resample_mono(samples: &[f32], source_rate: u32, target_rate: u32) -> StoreResult<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1,
    )?;

    let delay = resampler.output_delay();
    let expected = resampled_len(samples.len(), source_rate, target_rate);
    let mut output = Vec::with_capacity(delay + expected + CHUNK_SIZE);

    // Zero-filled chunks past the end flush the delay line
    let mut pos = 0;
    while output.len() < delay + expected {
        let needed = resampler.input_frames_next();
        let mut chunk = vec![0.0f32; needed];
        if pos < samples.len() {
            let copy = needed.min(samples.len() - pos);
            chunk[..copy].copy_from_slice(&samples[pos..pos + copy]);
        }
        pos += needed;

        let input = vec![chunk];
        let out = resampler.process(&input, None)?;
        output.extend_from_slice(&out[0]);
    }

    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}
