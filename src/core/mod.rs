//! Numeric primitives: windows, FFT helpers, the STFT pair, median
//! filtering, framing, statistics and decibel conversion.

pub mod decibel;
pub mod fft;
pub mod framing;
pub mod median;
pub mod stats;
pub mod stft;
pub mod window;

pub use decibel::{db, power_db};
pub use framing::{frame, frame_view, FrameBuffer, FrameView};
pub use median::median_filter;
pub use stats::{mean, std_dev, variance};
pub use stft::{istft, stft, Spectrogram, Stft};
pub use window::{generate_window, WindowType};
