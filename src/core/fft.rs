//! FFT-related constants and utilities shared across the crate.

use rustfft::num_complex::Complex;

/// Zero-valued complex number, used for FFT buffer initialization.
pub const COMPLEX_ZERO: Complex<f64> = Complex::new(0.0, 0.0);

/// Overlap-added squared window values at or below this are treated as
/// uncovered during inverse STFT normalization.
pub const WINDOW_SUM_EPSILON: f64 = 1e-10;

/// Number of one-sided bins produced by an FFT of `fft_size` real samples.
#[inline]
pub fn one_sided_bins(fft_size: usize) -> usize {
    fft_size / 2 + 1
}

/// Fills the upper half of `buf` with the complex conjugates of its lower
/// half so that an inverse FFT of `buf` is real-valued.
#[inline]
pub fn mirror_negative_frequencies(buf: &mut [Complex<f64>]) {
    let fft_size = buf.len();
    let num_bins = one_sided_bins(fft_size);
    for bin in 1..num_bins {
        let mirrored = fft_size - bin;
        if mirrored != bin {
            buf[mirrored] = buf[bin].conj();
        }
    }
}
