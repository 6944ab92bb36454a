//! STFT-domain enhancement algorithms and their parameters.

pub mod denoise;
pub mod hpss;
pub mod params;
pub mod whiten;

pub use denoise::denoise;
pub use hpss::{hpss, hpss_spectrogram, soft_masks, HpssMasks};
pub use params::{
    read_config_json, write_config_json, DenoiseParams, EnhanceConfig, HpssParams, WhitenParams,
};
pub use whiten::whiten;
