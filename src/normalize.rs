//! Amplitude normalization policies.
//!
//! Every function returns a newly allocated signal and leaves its input
//! untouched.

use crate::core::stats::std_dev;
use crate::error::{validate_signal, SpectralError};

/// Maps `signal` linearly onto `[-1, 1]`: `2 * (x - max) / (max - min) + 1`.
///
/// # Errors
///
/// Returns [`SpectralError::DegenerateInput`] for a constant signal.
pub fn normalize_range(signal: &[f64]) -> Result<Vec<f64>, SpectralError> {
    validate_signal(signal, "signal")?;
    let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;
    if range == 0.0 {
        return Err(SpectralError::DegenerateInput(format!(
            "range normalization of a constant signal ({})",
            max
        )));
    }
    Ok(signal
        .iter()
        .map(|&x| 2.0 * (x - max) / range + 1.0)
        .collect())
}

/// Rescales `signal` so that its standard deviation equals that of `reference`.
///
/// # Errors
///
/// Returns [`SpectralError::DegenerateInput`] if `signal` has zero variance.
pub fn normalize_std(signal: &[f64], reference: &[f64]) -> Result<Vec<f64>, SpectralError> {
    validate_signal(reference, "reference")?;
    scale_to_std(signal, std_dev(reference))
}

/// Rescales `signal` to unit standard deviation.
pub fn standardize(signal: &[f64]) -> Result<Vec<f64>, SpectralError> {
    scale_to_std(signal, 1.0)
}

fn scale_to_std(signal: &[f64], target_std: f64) -> Result<Vec<f64>, SpectralError> {
    validate_signal(signal, "signal")?;
    let std_signal = std_dev(signal);
    // Rounding in the mean can leave a tiny nonzero deviation for constant input
    if std_signal == 0.0 || signal.iter().all(|&x| x == signal[0]) {
        return Err(SpectralError::DegenerateInput(
            "normalization of a zero-variance signal".to_string(),
        ));
    }
    let gain = target_std / std_signal;
    Ok(signal.iter().map(|&x| x * gain).collect())
}

/// Divides `signal` by its maximum sample value.
///
/// This is a plain `x / max(x)`: the largest sample maps to 1.0. It is not an
/// absolute-peak normalization, so a signal whose maximum is negative is
/// flipped in sign.
///
/// # Errors
///
/// Returns [`SpectralError::DegenerateInput`] if the maximum is zero.
pub fn normalize_peak(signal: &[f64]) -> Result<Vec<f64>, SpectralError> {
    validate_signal(signal, "signal")?;
    let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == 0.0 {
        return Err(SpectralError::DegenerateInput(
            "peak normalization of a signal whose maximum is zero".to_string(),
        ));
    }
    Ok(signal.iter().map(|&x| x / max).collect())
}
