//! Parameter structs for the enhancement algorithms and their JSON form.
//!
//! Each algorithm takes its own struct with defaults, `with_*` setters and a
//! `validate()` that every entry point calls before touching the signal.

use crate::core::median::MAX_KERNEL_TAPS;
use crate::core::stft::validate_geometry;
use crate::error::SpectralError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default analysis frame length for denoising and whitening.
pub const DEFAULT_FRAME_LENGTH: usize = 256;
/// Default FFT resolution shared by all three algorithms.
pub const DEFAULT_FFT_RESOLUTION: usize = 1024;
/// Default analysis frame length for HPSS.
pub const DEFAULT_HPSS_FRAME_LENGTH: usize = 512;

/// Parameters for [`denoise`](crate::enhance::denoise::denoise).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseParams {
    /// Analysis and synthesis window length in samples.
    pub frame_length: usize,
    /// FFT length for the STFT and for the noise periodogram.
    pub fft_resolution: usize,
    /// Floor applied to the instantaneous power before it divides the noise PSD.
    pub power_floor: f64,
    /// The Wiener gain is clamped into `[gain_floor, 1]`. Defaults to
    /// `Some(0.0)`; `None` leaves `1 - Pv / Px` unconstrained, which goes
    /// strongly negative wherever a cell holds less power than the noise.
    pub gain_floor: Option<f64>,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            frame_length: DEFAULT_FRAME_LENGTH,
            fft_resolution: DEFAULT_FFT_RESOLUTION,
            power_floor: 1e-10,
            gain_floor: Some(0.0),
        }
    }
}

impl DenoiseParams {
    pub fn with_frame_length(mut self, frame_length: usize) -> Self {
        self.frame_length = frame_length;
        self
    }

    pub fn with_fft_resolution(mut self, fft_resolution: usize) -> Self {
        self.fft_resolution = fft_resolution;
        self
    }

    pub fn with_power_floor(mut self, power_floor: f64) -> Self {
        self.power_floor = power_floor;
        self
    }

    /// Bounds the gain to `[gain_floor, 1]`.
    pub fn with_gain_floor(mut self, gain_floor: f64) -> Self {
        self.gain_floor = Some(gain_floor);
        self
    }

    /// Applies the raw `1 - Pv / Px` gain without any clamping.
    pub fn without_gain_floor(mut self) -> Self {
        self.gain_floor = None;
        self
    }

    pub fn validate(&self) -> Result<(), SpectralError> {
        validate_geometry(self.frame_length, self.fft_resolution)?;
        validate_positive(self.power_floor, "power_floor")?;
        if let Some(floor) = self.gain_floor {
            if !floor.is_finite() || floor > 1.0 {
                return Err(SpectralError::InvalidArgument(format!(
                    "gain_floor must be finite and at most 1, got {}",
                    floor
                )));
            }
        }
        Ok(())
    }
}

/// Parameters for [`whiten`](crate::enhance::whiten::whiten).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitenParams {
    pub frame_length: usize,
    pub fft_resolution: usize,
    /// Added to `|X|` before dividing, so near-silent cells stay bounded.
    pub epsilon: f64,
}

impl Default for WhitenParams {
    fn default() -> Self {
        Self {
            frame_length: DEFAULT_FRAME_LENGTH,
            fft_resolution: DEFAULT_FFT_RESOLUTION,
            epsilon: 1e-6,
        }
    }
}

impl WhitenParams {
    pub fn with_frame_length(mut self, frame_length: usize) -> Self {
        self.frame_length = frame_length;
        self
    }

    pub fn with_fft_resolution(mut self, fft_resolution: usize) -> Self {
        self.fft_resolution = fft_resolution;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<(), SpectralError> {
        validate_geometry(self.frame_length, self.fft_resolution)?;
        validate_positive(self.epsilon, "epsilon")
    }
}

/// Parameters for [`hpss`](crate::enhance::hpss::hpss).
///
/// Median-filter extents are given in physical units and converted to
/// frames and bins per call, unless explicit widths override them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HpssParams {
    /// Extent of the time-axis (harmonic) median filter in seconds.
    pub temporal_kernel_seconds: f64,
    /// Extent of the frequency-axis (percussive) median filter in Hz.
    pub frequency_kernel_hz: f64,
    pub frame_length: usize,
    pub fft_resolution: usize,
    /// Regularizer of the soft masks.
    pub mask_epsilon: f64,
    /// Explicit time-axis filter width in frames.
    pub harmonic_width: Option<usize>,
    /// Explicit frequency-axis filter width in bins.
    pub percussive_width: Option<usize>,
}

impl Default for HpssParams {
    fn default() -> Self {
        Self {
            temporal_kernel_seconds: 0.25,
            frequency_kernel_hz: 1500.0,
            frame_length: DEFAULT_HPSS_FRAME_LENGTH,
            fft_resolution: DEFAULT_FFT_RESOLUTION,
            mask_epsilon: 1e-10,
            harmonic_width: None,
            percussive_width: None,
        }
    }
}

impl HpssParams {
    pub fn with_temporal_kernel_seconds(mut self, seconds: f64) -> Self {
        self.temporal_kernel_seconds = seconds;
        self
    }

    pub fn with_frequency_kernel_hz(mut self, hz: f64) -> Self {
        self.frequency_kernel_hz = hz;
        self
    }

    pub fn with_frame_length(mut self, frame_length: usize) -> Self {
        self.frame_length = frame_length;
        self
    }

    pub fn with_fft_resolution(mut self, fft_resolution: usize) -> Self {
        self.fft_resolution = fft_resolution;
        self
    }

    pub fn with_mask_epsilon(mut self, epsilon: f64) -> Self {
        self.mask_epsilon = epsilon;
        self
    }

    /// Uses fixed filter widths (frames, bins) instead of the unit conversion.
    pub fn with_kernel_widths(mut self, harmonic_width: usize, percussive_width: usize) -> Self {
        self.harmonic_width = Some(harmonic_width);
        self.percussive_width = Some(percussive_width);
        self
    }

    /// Median-filter sizes `(temporal, frequency)` for `sample_rate`.
    ///
    /// Temporal: `ceil(seconds * sample_rate / (frame_length / 2))` frames.
    /// Frequency: `ceil(hz * fft_resolution / sample_rate)` bins.
    pub fn kernel_sizes(&self, sample_rate: u32) -> Result<(usize, usize), SpectralError> {
        if sample_rate == 0 {
            return Err(SpectralError::InvalidArgument(
                "sample_rate must be positive".to_string(),
            ));
        }
        let fs = sample_rate as f64;
        let hop = (self.frame_length / 2).max(1) as f64;

        let temporal = match self.harmonic_width {
            Some(width) => width,
            None => kernel_width(self.temporal_kernel_seconds * fs / hop, "temporal")?,
        };
        let frequency = match self.percussive_width {
            Some(width) => width,
            None => kernel_width(
                self.frequency_kernel_hz * self.fft_resolution as f64 / fs,
                "frequency",
            )?,
        };

        if temporal == 0 || frequency == 0 {
            return Err(SpectralError::InvalidArgument(format!(
                "median kernel sizes must be positive, got ({}, {})",
                temporal, frequency
            )));
        }
        if temporal > MAX_KERNEL_TAPS || frequency > MAX_KERNEL_TAPS {
            return Err(SpectralError::InvalidArgument(format!(
                "median kernel sizes ({}, {}) exceed {} taps",
                temporal, frequency, MAX_KERNEL_TAPS
            )));
        }
        Ok((temporal, frequency))
    }

    pub fn validate(&self) -> Result<(), SpectralError> {
        validate_geometry(self.frame_length, self.fft_resolution)?;
        validate_positive(self.mask_epsilon, "mask_epsilon")?;
        if self.harmonic_width.is_none() {
            validate_positive(self.temporal_kernel_seconds, "temporal_kernel_seconds")?;
        }
        if self.percussive_width.is_none() {
            validate_positive(self.frequency_kernel_hz, "frequency_kernel_hz")?;
        }
        Ok(())
    }
}

/// Rounds a kernel extent up to whole taps, rejecting values no filter can hold.
fn kernel_width(extent: f64, axis: &str) -> Result<usize, SpectralError> {
    let taps = extent.ceil();
    if !taps.is_finite() || taps > MAX_KERNEL_TAPS as f64 {
        return Err(SpectralError::InvalidArgument(format!(
            "{} median kernel of {} taps exceeds {}",
            axis, taps, MAX_KERNEL_TAPS
        )));
    }
    Ok(taps as usize)
}

fn validate_positive(value: f64, label: &str) -> Result<(), SpectralError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SpectralError::InvalidArgument(format!(
            "{} must be positive and finite, got {}",
            label, value
        )));
    }
    Ok(())
}

/// Parameters for all three algorithms, as stored in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub denoise: DenoiseParams,
    pub whiten: WhitenParams,
    pub hpss: HpssParams,
}

impl EnhanceConfig {
    pub fn validate(&self) -> Result<(), SpectralError> {
        self.denoise.validate()?;
        self.whiten.validate()?;
        self.hpss.validate()
    }
}

/// Writes a config as pretty-printed JSON.
pub fn write_config_json(path: &Path, config: &EnhanceConfig) -> Result<(), SpectralError> {
    let json = serde_json::to_string_pretty(config).map_err(|e| {
        SpectralError::InvalidConfig(format!("failed to serialize config: {}", e))
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads and validates a config from JSON. Missing fields take their defaults.
pub fn read_config_json(path: &Path) -> Result<EnhanceConfig, SpectralError> {
    let data = std::fs::read_to_string(path)?;
    let config: EnhanceConfig = serde_json::from_str(&data).map_err(|e| {
        SpectralError::InvalidConfig(format!(
            "failed to parse config from {}: {}",
            path.display(),
            e
        ))
    })?;
    config.validate()?;
    Ok(config)
}
