#![forbid(unsafe_code)]
//! Short-time-Fourier-domain audio enhancement.
//!
//! `spectral_enhance` cleans, flattens or decomposes a complete in-memory
//! signal with three STFT-domain algorithms:
//!
//! - [`denoise`]: Wiener-style suppression of stationary noise, given a
//!   sample of that noise.
//! - [`whiten`]: per-frame magnitude flattening, rescaled to the input's
//!   standard deviation.
//! - [`hpss`]: harmonic/percussive separation by anisotropic median
//!   filtering and complementary soft masks; the two parts sum back to the
//!   input.
//!
//! Alongside them sit the building blocks they share ([`Stft`], median
//! filtering, framing) and small utilities for normalization and decibels.
//! All operations are pure: inputs are borrowed, outputs are newly allocated.
//!
//! # Quick Start
//!
//! ```
//! use spectral_enhance::{hpss, HpssParams};
//!
//! // 1 second of 330 Hz sine at 22.05 kHz
//! let sample_rate = 22050u32;
//! let input: Vec<f64> = (0..sample_rate as usize)
//!     .map(|i| (2.0 * std::f64::consts::PI * 330.0 * i as f64 / sample_rate as f64).sin())
//!     .collect();
//!
//! let (harmonic, percussive) = hpss(&input, sample_rate, &HpssParams::default()).unwrap();
//! assert_eq!(harmonic.len(), input.len());
//! for i in 0..input.len() {
//!     assert!((harmonic[i] + percussive[i] - input[i]).abs() < 1e-9);
//! }
//! ```
//!
//! # Parameters
//!
//! Each algorithm takes a parameter struct with documented defaults and
//! `with_*` setters. [`EnhanceConfig`] bundles all three and can be stored
//! as JSON:
//!
//! ```
//! use spectral_enhance::{denoise, DenoiseParams};
//!
//! let params = DenoiseParams::default()
//!     .with_frame_length(512)
//!     .with_gain_floor(0.0);
//! let signal = vec![0.25; 4096];
//! let noise = vec![0.0; 1024];
//! let cleaned = denoise(&signal, &noise, &params).unwrap();
//! assert_eq!(cleaned.len(), signal.len());
//! ```

pub mod analysis;
pub mod core;
pub mod enhance;
pub mod error;
pub mod normalize;

pub use crate::analysis::spectral::{
    mean_spectral_flatness_db, periodogram, spectral_flatness, PsdParams,
};
pub use crate::core::decibel::{db, power_db};
pub use crate::core::framing::{frame, frame_view, FrameBuffer, FrameView};
pub use crate::core::median::median_filter;
pub use crate::core::stft::{istft, stft, Spectrogram, Stft};
pub use crate::core::window::WindowType;
pub use crate::enhance::denoise::denoise;
pub use crate::enhance::hpss::{hpss, hpss_spectrogram, soft_masks, HpssMasks};
pub use crate::enhance::params::{
    read_config_json, write_config_json, DenoiseParams, EnhanceConfig, HpssParams, WhitenParams,
};
pub use crate::enhance::whiten::whiten;
pub use crate::error::SpectralError;
pub use crate::normalize::{normalize_peak, normalize_range, normalize_std, standardize};
