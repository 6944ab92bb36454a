//! Window functions for spectral analysis.
//!
//! Windows here are periodic ("DFT-even"): a window of `size` samples is the
//! first `size` samples of a symmetric window of `size + 1`. This is the
//! convention that makes 50 %-overlapped Hann frames overlap-add cleanly.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    /// Periodic Hann window.
    Hann,
    /// Rectangular window (all ones).
    #[default]
    Boxcar,
}

/// Generates a window function of the specified type and size.
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f64> {
    match window_type {
        WindowType::Hann => hann_window(size),
        WindowType::Boxcar => vec![1.0; size],
    }
}

/// Returns `Some(trivial_window)` for degenerate sizes (0 or 1), or `None`
/// to indicate the caller should compute the full window.
#[inline]
fn trivial_window(size: usize) -> Option<Vec<f64>> {
    match size {
        0 => Some(vec![]),
        1 => Some(vec![1.0]),
        _ => None,
    }
}

/// Generates a periodic Hann window.
#[inline]
pub fn hann_window(size: usize) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n).cos()))
        .collect()
}

/// Sum of the window coefficients (the coherent gain times the length).
#[inline]
pub fn window_sum(window: &[f64]) -> f64 {
    window.iter().sum()
}

/// Sum of the squared window coefficients.
#[inline]
pub fn window_energy(window: &[f64]) -> f64 {
    window.iter().map(|w| w * w).sum()
}

/// Applies a window function to a slice in-place.
#[inline]
pub fn apply_window(data: &mut [f64], window: &[f64]) {
    for (sample, &w) in data.iter_mut().zip(window.iter()) {
        *sample *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window_is_periodic() {
        let w = hann_window(256);
        assert_eq!(w.len(), 256);
        assert!(w[0].abs() < 1e-15);
        assert!((w[128] - 1.0).abs() < 1e-15);
        // Periodic: w[i] == w[n - i], the last sample is not zero
        for i in 1..128 {
            assert!((w[i] - w[256 - i]).abs() < 1e-12);
        }
        assert!(w[255] > 0.0);
    }

    #[test]
    fn test_hann_half_overlap_sums_to_one() {
        let w = hann_window(512);
        for i in 0..256 {
            assert!((w[i] + w[i + 256] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_window_sums() {
        let w = hann_window(256);
        assert!((window_sum(&w) - 128.0).abs() < 1e-9);
        assert!((window_energy(&w) - 96.0).abs() < 1e-9);
        let b = generate_window(WindowType::Boxcar, 16);
        assert_eq!(window_sum(&b), 16.0);
    }

    #[test]
    fn test_single_sample_window() {
        assert_eq!(hann_window(1), vec![1.0]);
        assert!(hann_window(0).is_empty());
    }

    #[test]
    fn test_apply_window() {
        let window = vec![0.5, 1.0, 0.5];
        let mut data = vec![2.0, 3.0, 4.0];
        apply_window(&mut data, &window);
        assert_eq!(data, vec![1.0, 3.0, 2.0]);
    }
}
