//! Spectral whitening.
//!
//! Every STFT cell is divided by its own magnitude (plus a small epsilon),
//! leaving a unit-magnitude spectrum that keeps the original phases. The
//! resynthesized signal is rescaled to the standard deviation of the input.

use crate::core::stft::Stft;
use crate::enhance::params::WhitenParams;
use crate::error::{validate_signal, SpectralError};
use crate::normalize::normalize_std;

/// Flattens the magnitude spectrum of `signal` frame by frame.
///
/// Returns a signal of the same length and standard deviation as `signal`.
///
/// # Errors
///
/// Returns [`SpectralError::DegenerateInput`] for a silent signal, whose
/// whitened output has no energy to rescale.
pub fn whiten(signal: &[f64], params: &WhitenParams) -> Result<Vec<f64>, SpectralError> {
    params.validate()?;
    validate_signal(signal, "signal")?;

    let stft = Stft::new(params.frame_length, params.fft_resolution)?;
    let mut spectrogram = stft.forward(signal)?;
    let epsilon = params.epsilon;
    spectrogram.mapv_inplace(|c| c / (c.norm() + epsilon));

    let mut output = stft.inverse(&spectrogram)?;
    output.truncate(signal.len());

    log::debug!(
        "whiten: {} samples over {} frames",
        signal.len(),
        spectrogram.ncols()
    );

    normalize_std(&output, signal)
}
