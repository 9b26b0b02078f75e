//! Offline linear convolution
//!
//! Short kernels run in the time domain; anything longer goes through a
//! single zero-padded real FFT. The signal spectrum is shared between ears.

use std::sync::Arc;

use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

use super::StereoBuffer;
use crate::ir::ImpulseResponse;

/// Kernels (or signals) up to this length use direct convolution
const DIRECT_MAX_TAPS: usize = 64;

/// Full linear convolution, `signal.len() + kernel.len() - 1` samples
///
/// Empty input on either side gives an empty output.
pub fn convolve(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    if signal.len().min(kernel.len()) <= DIRECT_MAX_TAPS {
        return direct_convolve(signal, kernel);
    }

    let mut plan = FftPlan::new(signal.len() + kernel.len() - 1);
    match plan.spectrum(signal) {
        Some(spectrum) => plan
            .apply(&spectrum, kernel, signal.len() + kernel.len() - 1)
            .unwrap_or_else(|| direct_convolve(signal, kernel)),
        None => direct_convolve(signal, kernel),
    }
}

/// Convolve a mono signal with both ears of an impulse response
///
/// Both channels come out `signal.len() + ir.len() - 1` long.
pub fn convolve_stereo(signal: &[f32], ir: &ImpulseResponse) -> StereoBuffer {
    if signal.is_empty() || ir.is_empty() {
        return StereoBuffer::new(0);
    }

    let out_len = signal.len() + ir.len() - 1;

    let (mut left, mut right) = if ir.len().min(signal.len()) <= DIRECT_MAX_TAPS {
        (convolve(signal, &ir.left), convolve(signal, &ir.right))
    } else {
        let mut plan = FftPlan::new(out_len);
        let spectrum = plan.spectrum(signal);
        let mut ear = |kernel: &[f32]| {
            if kernel.is_empty() {
                return Vec::new();
            }
            spectrum
                .as_ref()
                .and_then(|s| plan.apply(s, kernel, signal.len() + kernel.len() - 1))
                .unwrap_or_else(|| direct_convolve(signal, kernel))
        };
        (ear(&ir.left), ear(&ir.right))
    };

    left.resize(out_len, 0.0);
    right.resize(out_len, 0.0);
    StereoBuffer::from_channels(left, right)
}

fn direct_convolve(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    let mut output = vec![0.0f32; signal.len() + kernel.len() - 1];
    for (i, &x) in signal.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &h) in kernel.iter().enumerate() {
            output[i + j] += x * h;
        }
    }
    output
}

/// Forward/inverse real FFT pair sized for one output length
struct FftPlan {
    size: usize,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    scratch: Vec<f64>,
}

impl FftPlan {
    fn new(out_len: usize) -> Self {
        let size = out_len.next_power_of_two();
        let mut planner = RealFftPlanner::<f64>::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
            scratch: vec![0.0; size],
        }
    }

    fn spectrum(&mut self, samples: &[f32]) -> Option<Vec<Complex<f64>>> {
        self.scratch.fill(0.0);
        for (dst, &src) in self.scratch.iter_mut().zip(samples) {
            *dst = src as f64;
        }
        let mut spectrum = self.forward.make_output_vec();
        self.forward.process(&mut self.scratch, &mut spectrum).ok()?;
        Some(spectrum)
    }

    /// Multiply with a kernel's spectrum and return the first `len` samples
    fn apply(&mut self, signal: &[Complex<f64>], kernel: &[f32], len: usize) -> Option<Vec<f32>> {
        let mut product = self.spectrum(kernel)?;
        for (p, s) in product.iter_mut().zip(signal) {
            *p *= *s;
        }
        // DC and Nyquist bins of a real signal carry no imaginary part
        if let Some(first) = product.first_mut() {
            first.im = 0.0;
        }
        if let Some(last) = product.last_mut() {
            last.im = 0.0;
        }

        let mut time = self.inverse.make_output_vec();
        self.inverse.process(&mut product, &mut time).ok()?;

        let scale = 1.0 / self.size as f64;
        Some(time.iter().take(len).map(|&v| (v * scale) as f32).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_signal(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i * 7 % 13) as f32 - 6.0) / 6.0).collect()
    }

    #[test]
    fn test_identity_kernel() {
        let signal = test_signal(100);
        assert_eq!(convolve(&signal, &[1.0]), signal);
    }

    #[test]
    fn test_delay_and_length() {
        let out = convolve(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.5]);
        assert_eq!(out, vec![0.0, 0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(convolve(&[], &[1.0]).is_empty());
        assert!(convolve(&[1.0], &[]).is_empty());
    }

    #[test]
    fn test_fft_matches_direct() {
        let signal = test_signal(1000);
        let kernel = test_signal(300);

        let fast = convolve(&signal, &kernel);
        let slow = direct_convolve(&signal, &kernel);

        assert_eq!(fast.len(), 1299);
        for (a, b) in fast.iter().zip(&slow) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_stereo_pads_shorter_ear() {
        let ir = ImpulseResponse::new(vec![1.0; 200], vec![0.5]);
        let out = convolve_stereo(&test_signal(500), &ir);

        assert_eq!(out.len(), 699);
        assert_eq!(out.left.len(), out.right.len());
        assert_abs_diff_eq!(out.right[698], 0.0);
        assert_abs_diff_eq!(out.right[10], test_signal(500)[10] * 0.5, epsilon = 1e-6);
    }
}
