//! Harmonic/percussive separation of a complex spectrogram.
//!
//! A median across time of `|X|` favours cells that persist from frame to
//! frame; a median across frequency favours cells that light up a whole
//! column at once. Their squares feed two soft masks that multiply the
//! complex spectrogram, keeping the phase of `X` in both parts.
//!
//! The two soft masks are complementary, so the masked spectrograms sum to the
//! original one and the separated signals sum back to the input.

use crate::core::median::{median_filter_horizontal, median_filter_vertical};
use crate::core::stft::{magnitude, Spectrogram, Stft};
use crate::enhance::params::HpssParams;
use crate::error::{validate_signal, SpectralError};
use ndarray::{Array2, Zip};

/// Complementary Wiener-like soft masks over a `(bins, frames)` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HpssMasks {
    pub harmonic: Array2<f64>,
    pub percussive: Array2<f64>,
}

/// Builds the soft masks from squared harmonic- and percussive-enhanced
/// magnitudes:
///
/// `mask_h = (H + eps/2) / (H + P + eps)`, `mask_p = (P + eps/2) / (H + P + eps)`.
///
/// The masks sum to one in every cell, and cells where both estimates are
/// zero are split evenly.
pub fn soft_masks(
    harmonic: &Array2<f64>,
    percussive: &Array2<f64>,
    epsilon: f64,
) -> Result<HpssMasks, SpectralError> {
    if harmonic.dim() != percussive.dim() {
        return Err(SpectralError::InvalidArgument(format!(
            "harmonic {:?} and percussive {:?} estimates differ in shape",
            harmonic.dim(),
            percussive.dim()
        )));
    }

    let mut mask_h = Array2::<f64>::zeros(harmonic.dim());
    let mut mask_p = Array2::<f64>::zeros(harmonic.dim());
    let half_eps = epsilon / 2.0;

    Zip::from(&mut mask_h)
        .and(&mut mask_p)
        .and(harmonic)
        .and(percussive)
        .for_each(|mh, mp, &h, &p| {
            let denom = h + p + epsilon;
            *mh = (h + half_eps) / denom;
            *mp = (p + half_eps) / denom;
        });

    Ok(HpssMasks {
        harmonic: mask_h,
        percussive: mask_p,
    })
}

/// Splits a complex spectrogram into harmonic and percussive spectrograms.
///
/// `kernel_sizes` is `(temporal, frequency)`: the time-axis median width in
/// frames and the frequency-axis median width in bins.
pub fn hpss_spectrogram(
    spectrogram: &Spectrogram,
    kernel_sizes: (usize, usize),
    epsilon: f64,
) -> Result<(Spectrogram, Spectrogram), SpectralError> {
    let (temporal, frequency) = kernel_sizes;
    let mags = magnitude(spectrogram);

    // Horizontal median (across time) -> harmonic estimate
    let harmonic_est = median_filter_horizontal(&mags, temporal)?.mapv_into(|v| v * v);
    // Vertical median (across frequency) -> percussive estimate
    let percussive_est = median_filter_vertical(&mags, frequency)?.mapv_into(|v| v * v);

    let masks = soft_masks(&harmonic_est, &percussive_est, epsilon)?;

    // Masks multiply the complex spectrum, never the magnitudes
    let mut harmonic = spectrogram.clone();
    let mut percussive = spectrogram.clone();
    Zip::from(&mut harmonic)
        .and(&masks.harmonic)
        .for_each(|c, &m| *c *= m);
    Zip::from(&mut percussive)
        .and(&masks.percussive)
        .for_each(|c, &m| *c *= m);

    Ok((harmonic, percussive))
}

/// Separates `signal` into `(harmonic, percussive)` components.
///
/// Both outputs have the same length as the input and sum back to it.
///
/// # Arguments
///
/// * `signal` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz, used to convert the kernel extents
/// * `params` - Kernel extents, frame geometry and mask regularizer
pub fn hpss(
    signal: &[f64],
    sample_rate: u32,
    params: &HpssParams,
) -> Result<(Vec<f64>, Vec<f64>), SpectralError> {
    params.validate()?;
    validate_signal(signal, "signal")?;
    let kernel_sizes = params.kernel_sizes(sample_rate)?;

    let stft = Stft::new(params.frame_length, params.fft_resolution)?;
    let spectrogram = stft.forward(signal)?;

    log::debug!(
        "hpss: kernels {} frames x {} bins over {} x {} spectrogram",
        kernel_sizes.0,
        kernel_sizes.1,
        spectrogram.nrows(),
        spectrogram.ncols()
    );
    if signal.iter().all(|&s| s == 0.0) {
        log::warn!("hpss: input is silent, both components will be silent");
    }

    let (harmonic_spec, percussive_spec) =
        hpss_spectrogram(&spectrogram, kernel_sizes, params.mask_epsilon)?;

    let mut harmonic = stft.inverse(&harmonic_spec)?;
    let mut percussive = stft.inverse(&percussive_spec)?;
    harmonic.truncate(signal.len());
    percussive.truncate(signal.len());

    Ok((harmonic, percussive))
}
