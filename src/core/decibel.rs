//! Scalar decibel conversions.

use crate::error::SpectralError;

fn check_non_negative(value: f64) -> Result<(), SpectralError> {
    if value.is_nan() || value < 0.0 {
        return Err(SpectralError::InvalidArgument(format!(
            "decibel conversion needs a non-negative value, got {}",
            value
        )));
    }
    Ok(())
}

/// Amplitude to decibels: `20 * log10(value)`, negative infinity for zero.
#[inline]
pub fn db(value: f64) -> Result<f64, SpectralError> {
    check_non_negative(value)?;
    if value == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    Ok(20.0 * value.log10())
}

/// Power to decibels: `10 * log10(value)`, negative infinity for zero.
#[inline]
pub fn power_db(value: f64) -> Result<f64, SpectralError> {
    check_non_negative(value)?;
    if value == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    Ok(10.0 * value.log10())
}
