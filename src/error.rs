//! Error types for the spectral-enhance crate.

use std::fmt;

/// Errors that can occur while framing, transforming or enhancing a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpectralError {
    /// Non-positive lengths or hops, malformed kernel sizes, negative dB input.
    InvalidArgument(String),
    /// A normalization would divide by a derived scale of zero.
    DegenerateInput(String),
    /// Non-finite samples or spectra that cannot be processed.
    NumericDegeneracy(String),
    /// A configuration document could not be parsed or serialized.
    InvalidConfig(String),
    /// I/O error.
    IoError(String),
}

impl fmt::Display for SpectralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectralError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            SpectralError::DegenerateInput(msg) => write!(f, "degenerate input: {}", msg),
            SpectralError::NumericDegeneracy(msg) => write!(f, "numeric degeneracy: {}", msg),
            SpectralError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            SpectralError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for SpectralError {}

impl From<std::io::Error> for SpectralError {
    fn from(err: std::io::Error) -> Self {
        SpectralError::IoError(err.to_string())
    }
}

/// Rejects empty input and input containing NaN or infinite samples.
#[inline]
pub(crate) fn validate_signal(signal: &[f64], label: &str) -> Result<(), SpectralError> {
    if signal.is_empty() {
        return Err(SpectralError::InvalidArgument(format!(
            "{} must not be empty",
            label
        )));
    }
    if let Some(pos) = signal.iter().position(|s| !s.is_finite()) {
        return Err(SpectralError::NumericDegeneracy(format!(
            "{} contains a non-finite sample at index {}",
            label, pos
        )));
    }
    Ok(())
}
