//! Wiener-style noise suppression in the STFT domain.
//!
//! The noise is assumed stationary: one power spectral density is estimated
//! from the whole noise reference and applied to every frame of the signal.
//! The per-cell gain is `H = 1 - Pv / Px`, where `Px = |X|^2` is the
//! instantaneous power of the cell and `Pv` the noise power expected in that
//! cell, so a cell holding only noise has `Px ≈ Pv` and a gain near zero.

use crate::analysis::spectral::{periodogram, PsdParams};
use crate::core::fft::one_sided_bins;
use crate::core::stft::Stft;
use crate::core::window::{window_energy, window_sum};
use crate::enhance::params::DenoiseParams;
use crate::error::{validate_signal, SpectralError};

/// Suppresses the stationary noise characterized by `noise` in `signal`.
///
/// Returns a signal of the same length as `signal`.
///
/// # Errors
///
/// Returns [`SpectralError::InvalidArgument`] for empty inputs or invalid
/// parameters, and [`SpectralError::NumericDegeneracy`] for non-finite
/// samples.
pub fn denoise(
    signal: &[f64],
    noise: &[f64],
    params: &DenoiseParams,
) -> Result<Vec<f64>, SpectralError> {
    params.validate()?;
    validate_signal(signal, "signal")?;
    validate_signal(noise, "noise")?;

    let stft = Stft::new(params.frame_length, params.fft_resolution)?;
    let mut spectrogram = stft.forward(signal)?;
    let noise_power = cell_noise_power(noise, &stft)?;

    let mut clamped = 0usize;
    for (mut row, &pv) in spectrogram.rows_mut().into_iter().zip(&noise_power) {
        for cell in row.iter_mut() {
            let mut px = cell.norm_sqr();
            if px < params.power_floor {
                px = params.power_floor;
                clamped += 1;
            }
            *cell *= wiener_gain(px, pv, params.gain_floor);
        }
    }

    log::debug!(
        "denoise: {} x {} cells, {} below the power floor",
        spectrogram.nrows(),
        spectrogram.ncols(),
        clamped
    );

    let mut output = stft.inverse(&spectrogram)?;
    output.truncate(signal.len());

    if output.iter().any(|s| !s.is_finite()) {
        return Err(SpectralError::NumericDegeneracy(
            "denoised output contains non-finite samples".to_string(),
        ));
    }
    Ok(output)
}

/// `1 - pv / px`, clamped into `[floor, 1]` when a floor is given.
#[inline]
fn wiener_gain(px: f64, pv: f64, gain_floor: Option<f64>) -> f64 {
    let gain = 1.0 - pv / px;
    match gain_floor {
        Some(floor) => gain.clamp(floor, 1.0),
        None => gain,
    }
}

/// Expected noise power of one STFT cell, per one-sided bin.
///
/// [`periodogram`] yields a one-sided density: interior bins are doubled and
/// every bin is scaled by `1 / sum(w^2)`. The STFT is spectrum-scaled by
/// `1 / sum(w)` over a Hann window. Halving the interior bins and applying
/// `sum(hann^2) / sum(hann)^2` brings the density onto the STFT's scale.
fn cell_noise_power(noise: &[f64], stft: &Stft) -> Result<Vec<f64>, SpectralError> {
    let nfft = stft.fft_resolution();
    let mut power = periodogram(noise, &PsdParams::new(nfft))?;

    let window = stft.window();
    let coherent = window_sum(window);
    let scale = window_energy(window) / (coherent * coherent);
    let num_bins = one_sided_bins(nfft);
    let doubled_end = if nfft % 2 == 0 { num_bins - 1 } else { num_bins };

    for (bin, value) in power.iter_mut().enumerate() {
        if bin > 0 && bin < doubled_end {
            *value *= 0.5;
        }
        *value *= scale;
    }
    Ok(power)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::variance;

    fn tone(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 0.5 * (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 16000.0).sin())
            .collect()
    }

    #[test]
    fn test_output_length_matches_input() {
        let signal = tone(5000);
        let noise: Vec<f64> = (0..3000).map(|i| ((i * 7919) % 13) as f64 / 13.0 - 0.5).collect();
        let out = denoise(&signal, &noise, &DenoiseParams::default()).unwrap();
        assert_eq!(out.len(), signal.len());
    }

    #[test]
    fn test_silent_signal_stays_silent() {
        let signal = vec![0.0; 4096];
        let noise: Vec<f64> = (0..4096).map(|i| (i as f64 * 1.7).sin()).collect();
        let out = denoise(&signal, &noise, &DenoiseParams::default()).unwrap();
        assert!(out.iter().all(|s| s.is_finite() && s.abs() < 1e-12));
    }

    #[test]
    fn test_silent_noise_is_identity() {
        let signal = tone(4096);
        let out = denoise(&signal, &[0.0; 2048], &DenoiseParams::default()).unwrap();
        for (&a, &b) in signal.iter().zip(&out) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gain_floor_attenuates() {
        let signal = tone(8192);
        let noise: Vec<f64> = (0..8192).map(|i| (i as f64 * 2.3).sin() * 0.3).collect();
        let noisy: Vec<f64> = signal.iter().zip(&noise).map(|(s, n)| s + n).collect();
        let params = DenoiseParams::default().with_gain_floor(0.0);
        let out = denoise(&noisy, &noise, &params).unwrap();
        assert!(variance(&out) <= variance(&noisy));
    }

    #[test]
    fn test_noise_power_matches_noise_cells() {
        // Deterministic broadband sequence with unit variance
        let mut state = 0x2545_f491_4f6c_dd1du64;
        let noise: Vec<f64> = (0..1 << 15)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state >> 11) as f64 / (1u64 << 53) as f64 * 12f64.sqrt() - 3f64.sqrt()
            })
            .collect();
        let stft = Stft::new(256, 1024).unwrap();
        let pv = cell_noise_power(&noise, &stft).unwrap();
        let spec = stft.forward(&noise).unwrap();

        let mean_px = spec.iter().map(|c| c.norm_sqr()).sum::<f64>() / spec.len() as f64;
        let mean_pv = pv.iter().sum::<f64>() / pv.len() as f64;
        let ratio = mean_pv / mean_px;
        assert!(
            (0.8..1.25).contains(&ratio),
            "noise power per cell {} vs measured {} (ratio {})",
            mean_pv,
            mean_px,
            ratio
        );
    }

    #[test]
    fn test_gain_is_bounded_by_default() {
        let floor = DenoiseParams::default().gain_floor;
        assert_eq!(wiener_gain(1e-3, 1.0, floor), 0.0);
        assert_eq!(wiener_gain(1.0, 0.0, floor), 1.0);
        assert!((wiener_gain(2.0, 1.0, floor) - 0.5).abs() < 1e-12);
        assert!(wiener_gain(1e-3, 1.0, None) < -900.0);
    }

    #[test]
    fn test_rejects_empty_noise() {
        assert!(matches!(
            denoise(&tone(1024), &[], &DenoiseParams::default()),
            Err(SpectralError::InvalidArgument(_))
        ));
    }
}
