//! Binaural rendering with measured HRIR/BRIR sets
//!
//! Resolves a source direction to one or more measured angles, blends the
//! raw impulse responses with the plan weights and convolves once.

mod convolution;
mod renderer;

pub use convolution::{convolve, convolve_stereo};
pub use renderer::{BinauralRenderer, RenderContext};

/// Two-channel output buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoBuffer {
    /// Left ear
    pub left: Vec<f32>,
    /// Right ear
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// Silent buffer
    pub fn new(len: usize) -> Self {
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
        }
    }

    /// Wrap two equal-length channels
    pub fn from_channels(left: Vec<f32>, right: Vec<f32>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        Self { left, right }
    }

    /// Frames per channel
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Zero-pad both channels to at least `len` frames
    pub fn grow_to(&mut self, len: usize) {
        if len > self.len() {
            self.left.resize(len, 0.0);
            self.right.resize(len, 0.0);
        }
    }

    /// Accumulate another buffer scaled by `gain`, growing as needed
    pub fn add_scaled(&mut self, other: &StereoBuffer, gain: f32) {
        self.grow_to(other.len());
        for (dst, src) in self.left.iter_mut().zip(&other.left) {
            *dst += src * gain;
        }
        for (dst, src) in self.right.iter_mut().zip(&other.right) {
            *dst += src * gain;
        }
    }

    /// Accumulate a mono signal with separate ear gains, growing as needed
    pub fn add_mono(&mut self, signal: &[f32], left_gain: f32, right_gain: f32) {
        self.grow_to(signal.len());
        for (i, &sample) in signal.iter().enumerate() {
            self.left[i] += sample * left_gain;
            self.right[i] += sample * right_gain;
        }
    }

    /// Largest absolute sample on either channel
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Interleave as L R L R ...
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(l, r)| [*l, *r])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_scaled_grows() {
        let mut acc = StereoBuffer::new(2);
        let other = StereoBuffer::from_channels(vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]);
        acc.add_scaled(&other, 0.5);

        assert_eq!(acc.len(), 3);
        assert_eq!(acc.left, vec![0.5, 0.5, 0.5]);
        assert_eq!(acc.right, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_add_mono() {
        let mut acc = StereoBuffer::default();
        acc.add_mono(&[1.0, -1.0], 0.25, 0.75);
        assert_eq!(acc.left, vec![0.25, -0.25]);
        assert_eq!(acc.right, vec![0.75, -0.75]);
        assert_eq!(acc.peak(), 0.75);
        assert_eq!(acc.to_interleaved(), vec![0.25, 0.75, -0.25, -0.75]);
    }
}
