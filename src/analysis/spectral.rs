//! Power spectral density and spectral flatness measurements.

use crate::core::decibel::power_db;
use crate::core::fft::{one_sided_bins, COMPLEX_ZERO};
use crate::core::stats::mean;
use crate::core::stft::{power, Stft};
use crate::core::window::{apply_window, generate_window, window_energy, WindowType};
use crate::error::{validate_signal, SpectralError};
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

/// Keeps logarithms finite for silent bins in flatness computations.
const FLATNESS_FLOOR: f64 = 1e-20;

/// Parameters for [`periodogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsdParams {
    /// FFT length; also the segment length for signals longer than it.
    pub fft_resolution: usize,
    /// Taper applied to each segment before the FFT.
    pub window: WindowType,
}

impl Default for PsdParams {
    fn default() -> Self {
        Self {
            fft_resolution: 1024,
            window: WindowType::Boxcar,
        }
    }
}

impl PsdParams {
    pub fn new(fft_resolution: usize) -> Self {
        Self {
            fft_resolution,
            ..Self::default()
        }
    }

    pub fn with_window(mut self, window: WindowType) -> Self {
        self.window = window;
        self
    }
}

/// One-sided power spectral density of `signal` (unit sample rate).
///
/// Each segment is mean-removed, tapered, transformed at
/// `fft_resolution` points and scaled by `1 / sum(window^2)`; interior bins
/// are doubled to fold in the negative frequencies. A signal no longer than
/// the resolution is one zero-padded segment. A longer signal is cut into
/// consecutive non-overlapping segments of `fft_resolution` samples whose
/// densities are averaged; a trailing partial segment is ignored.
///
/// Returns `fft_resolution / 2 + 1` values.
pub fn periodogram(signal: &[f64], params: &PsdParams) -> Result<Vec<f64>, SpectralError> {
    validate_signal(signal, "signal")?;
    let nfft = params.fft_resolution;
    if nfft == 0 {
        return Err(SpectralError::InvalidArgument(
            "fft_resolution must be positive".to_string(),
        ));
    }

    let segment_len = signal.len().min(nfft);
    let num_segments = signal.len() / segment_len;
    let window = generate_window(params.window, segment_len);
    let scale = 1.0 / window_energy(&window);
    let num_bins = one_sided_bins(nfft);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(nfft);
    let mut fft_buf = vec![COMPLEX_ZERO; nfft];
    let mut segment = vec![0.0f64; segment_len];
    let mut density = vec![0.0f64; num_bins];

    for chunk in signal.chunks_exact(segment_len) {
        let offset = mean(chunk);
        for (dst, &src) in segment.iter_mut().zip(chunk) {
            *dst = src - offset;
        }
        apply_window(&mut segment, &window);

        fft_buf.fill(COMPLEX_ZERO);
        for (slot, &s) in fft_buf.iter_mut().zip(&segment) {
            *slot = Complex::new(s, 0.0);
        }
        fft.process(&mut fft_buf);

        for (acc, value) in density.iter_mut().zip(&fft_buf[..num_bins]) {
            *acc += value.norm_sqr() * scale;
        }
    }

    let averaging = 1.0 / num_segments as f64;
    // DC, and Nyquist for even lengths, have no negative-frequency twin
    let doubled_end = if nfft % 2 == 0 { num_bins - 1 } else { num_bins };
    for (bin, value) in density.iter_mut().enumerate() {
        *value *= averaging;
        if bin > 0 && bin < doubled_end {
            *value *= 2.0;
        }
    }

    Ok(density)
}

/// Ratio of the geometric to the arithmetic mean of a power spectrum.
///
/// 1.0 for a perfectly flat spectrum, approaching 0 for a pure tone.
pub fn spectral_flatness(power_spectrum: &[f64]) -> f64 {
    if power_spectrum.is_empty() {
        return 0.0;
    }
    let n = power_spectrum.len() as f64;
    let log_mean = power_spectrum
        .iter()
        .map(|&p| (p + FLATNESS_FLOOR).ln())
        .sum::<f64>()
        / n;
    log_mean.exp() / (mean(power_spectrum) + FLATNESS_FLOOR)
}

/// Per-frame spectral flatness of `signal` in dB, averaged over all frames.
pub fn mean_spectral_flatness_db(
    signal: &[f64],
    frame_length: usize,
    fft_resolution: usize,
) -> Result<f64, SpectralError> {
    let spectrogram = Stft::new(frame_length, fft_resolution)?.forward(signal)?;
    let power = power(&spectrogram);

    let mut total = 0.0;
    let mut frames = 0usize;
    let mut column_buf = Vec::with_capacity(power.nrows());
    for column in power.columns() {
        column_buf.clear();
        column_buf.extend(column.iter().copied());
        total += power_db(spectral_flatness(&column_buf))?;
        frames += 1;
    }

    Ok(total / frames as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_white_sequence_density_level() {
        // Alternating +/-1 has all of its power at Nyquist
        let x: Vec<f64> = (0..1024).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let psd = periodogram(&x, &PsdParams::new(1024)).unwrap();
        assert_eq!(psd.len(), 513);
        // Total power: sum of the one-sided density over the bin spacing equals the variance
        let total: f64 = psd.iter().sum::<f64>() / 1024.0;
        assert!((total - 1.0).abs() < 1e-9, "total power {}", total);
        assert!(psd[..512].iter().all(|&p| p < 1e-12));
    }

    #[test]
    fn test_parseval_for_sine() {
        let x: Vec<f64> = (0..2048)
            .map(|i| (2.0 * PI * 64.0 * i as f64 / 1024.0).sin())
            .collect();
        let psd = periodogram(&x, &PsdParams::new(1024)).unwrap();
        let total: f64 = psd.iter().sum::<f64>() / 1024.0;
        assert!((total - 0.5).abs() < 1e-9, "total power {}", total);
        let peak = psd
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 64);
    }

    #[test]
    fn test_short_signal_single_segment() {
        let x = vec![1.0, -1.0, 1.0, -1.0];
        let psd = periodogram(&x, &PsdParams::new(16)).unwrap();
        assert_eq!(psd.len(), 9);
        assert!(psd.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_constant_is_removed() {
        let psd = periodogram(&[3.0; 256], &PsdParams::new(256)).unwrap();
        assert!(psd.iter().all(|&p| p.abs() < 1e-20));
    }

    #[test]
    fn test_flatness_extremes() {
        assert!((spectral_flatness(&[2.0; 64]) - 1.0).abs() < 1e-12);
        let mut tonal = vec![0.0; 64];
        tonal[10] = 1.0;
        assert!(spectral_flatness(&tonal) < 1e-6);
    }

    #[test]
    fn test_mean_flatness_tone_is_low() {
        let x: Vec<f64> = (0..8192)
            .map(|i| (2.0 * PI * 440.0 * i as f64 / 22050.0).sin())
            .collect();
        let flatness = mean_spectral_flatness_db(&x, 256, 1024).unwrap();
        assert!(flatness < -20.0, "tone flatness {} dB", flatness);
    }
}
