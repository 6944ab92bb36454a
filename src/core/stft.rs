//! Short-time Fourier transform and its overlap-add inverse.
//!
//! Frames are periodic-Hann windowed with 50 % overlap, zero-padded to the
//! FFT resolution, and kept one-sided. The signal is extended by half a frame
//! of zeros on both ends (and on the right until the frames fit exactly), so
//! every input sample is covered by two frames and the inverse reconstructs
//! the input exactly. The inverse may return a few trailing samples past the
//! original length; callers truncate.

use crate::core::fft::{mirror_negative_frequencies, one_sided_bins, COMPLEX_ZERO, WINDOW_SUM_EPSILON};
use crate::core::window::{hann_window, window_sum};
use crate::error::{validate_signal, SpectralError};
use ndarray::Array2;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Complex one-sided spectrogram, indexed by `(frequency bin, time frame)`.
pub type Spectrogram = Array2<Complex<f64>>;

/// Checks the frame length / FFT resolution pair used by every transform.
pub fn validate_geometry(frame_length: usize, fft_resolution: usize) -> Result<(), SpectralError> {
    if frame_length < 2 {
        return Err(SpectralError::InvalidArgument(format!(
            "frame_length must be at least 2, got {}",
            frame_length
        )));
    }
    if fft_resolution < frame_length {
        return Err(SpectralError::InvalidArgument(format!(
            "fft_resolution ({}) must not be smaller than frame_length ({})",
            fft_resolution, frame_length
        )));
    }
    Ok(())
}

/// A planned forward/inverse STFT pair for one frame geometry.
pub struct Stft {
    frame_length: usize,
    fft_resolution: usize,
    hop_size: usize,
    window: Vec<f64>,
    window_sum: f64,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl Stft {
    /// Plans the transforms for `frame_length`-sample frames at `fft_resolution` points.
    pub fn new(frame_length: usize, fft_resolution: usize) -> Result<Self, SpectralError> {
        validate_geometry(frame_length, fft_resolution)?;
        let window = hann_window(frame_length);
        let window_sum = window_sum(&window);
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_resolution);
        let inverse = planner.plan_fft_inverse(fft_resolution);
        Ok(Self {
            frame_length,
            fft_resolution,
            hop_size: frame_length - frame_length / 2,
            window,
            window_sum,
            forward,
            inverse,
        })
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn fft_resolution(&self) -> usize {
        self.fft_resolution
    }

    /// Distance between consecutive frames in samples.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// The periodic Hann analysis window.
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// Number of one-sided frequency bins per frame.
    pub fn num_bins(&self) -> usize {
        one_sided_bins(self.fft_resolution)
    }

    /// Zeros prepended (and appended) before framing.
    #[inline]
    fn boundary(&self) -> usize {
        self.frame_length / 2
    }

    /// Length of the zero-extended signal that the frames tile exactly.
    fn padded_len(&self, signal_len: usize) -> usize {
        let extended = (signal_len + 2 * self.boundary()).max(self.frame_length);
        let rem = (extended - self.frame_length) % self.hop_size;
        if rem == 0 {
            extended
        } else {
            extended + self.hop_size - rem
        }
    }

    /// Number of frames the forward transform produces for a signal of `signal_len` samples.
    pub fn num_frames(&self, signal_len: usize) -> usize {
        (self.padded_len(signal_len) - self.frame_length) / self.hop_size + 1
    }

    /// Computes the one-sided spectrogram of `signal`.
    pub fn forward(&self, signal: &[f64]) -> Result<Spectrogram, SpectralError> {
        validate_signal(signal, "signal")?;

        let boundary = self.boundary();
        let padded_len = self.padded_len(signal.len());
        let mut padded = vec![0.0f64; padded_len];
        padded[boundary..boundary + signal.len()].copy_from_slice(signal);

        let num_frames = self.num_frames(signal.len());
        let num_bins = self.num_bins();
        let scale = 1.0 / self.window_sum;

        let mut spectrogram = Array2::from_elem((num_bins, num_frames), COMPLEX_ZERO);
        let mut fft_buf = vec![COMPLEX_ZERO; self.fft_resolution];

        for (frame_idx, mut column) in spectrogram.columns_mut().into_iter().enumerate() {
            let pos = frame_idx * self.hop_size;
            let segment = &padded[pos..pos + self.frame_length];

            // Window and zero-pad
            for (slot, (&s, &w)) in fft_buf.iter_mut().zip(segment.iter().zip(&self.window)) {
                *slot = Complex::new(s * w, 0.0);
            }
            fft_buf[self.frame_length..].fill(COMPLEX_ZERO);
            self.forward.process(&mut fft_buf);

            for (cell, &value) in column.iter_mut().zip(&fft_buf[..num_bins]) {
                *cell = value * scale;
            }
        }

        log::debug!(
            "stft: {} samples -> {} bins x {} frames (frame {}, hop {}, nfft {})",
            signal.len(),
            num_bins,
            num_frames,
            self.frame_length,
            self.hop_size,
            self.fft_resolution
        );

        Ok(spectrogram)
    }

    /// Resynthesizes a time-domain signal from a one-sided spectrogram by
    /// weighted overlap-add.
    pub fn inverse(&self, spectrogram: &Spectrogram) -> Result<Vec<f64>, SpectralError> {
        let (num_bins, num_frames) = spectrogram.dim();
        if num_bins != self.num_bins() {
            return Err(SpectralError::InvalidArgument(format!(
                "spectrogram has {} bins, expected {} for fft_resolution {}",
                num_bins,
                self.num_bins(),
                self.fft_resolution
            )));
        }
        if num_frames == 0 {
            return Err(SpectralError::InvalidArgument(
                "spectrogram has no frames".to_string(),
            ));
        }

        let full_len = (num_frames - 1) * self.hop_size + self.frame_length;
        let mut output = vec![0.0f64; full_len];
        let mut window_sum_sq = vec![0.0f64; full_len];
        // Undo the forward spectrum scaling and the unnormalized inverse FFT.
        let norm = self.window_sum / self.fft_resolution as f64;
        let mut fft_buf = vec![COMPLEX_ZERO; self.fft_resolution];

        for (frame_idx, column) in spectrogram.columns().into_iter().enumerate() {
            fft_buf.fill(COMPLEX_ZERO);
            for (slot, &value) in fft_buf.iter_mut().zip(column.iter()) {
                *slot = value;
            }
            mirror_negative_frequencies(&mut fft_buf);
            self.inverse.process(&mut fft_buf);

            let pos = frame_idx * self.hop_size;
            for (i, &w) in self.window.iter().enumerate() {
                output[pos + i] += fft_buf[i].re * norm * w;
                window_sum_sq[pos + i] += w * w;
            }
        }

        let boundary = self.boundary();
        let end = full_len - boundary;
        let result = output[boundary..end]
            .iter()
            .zip(&window_sum_sq[boundary..end])
            .map(|(&s, &ws)| if ws > WINDOW_SUM_EPSILON { s / ws } else { s })
            .collect();

        Ok(result)
    }
}

/// One-shot forward transform.
pub fn stft(
    signal: &[f64],
    frame_length: usize,
    fft_resolution: usize,
) -> Result<Spectrogram, SpectralError> {
    Stft::new(frame_length, fft_resolution)?.forward(signal)
}

/// One-shot inverse transform.
pub fn istft(
    spectrogram: &Spectrogram,
    frame_length: usize,
    fft_resolution: usize,
) -> Result<Vec<f64>, SpectralError> {
    Stft::new(frame_length, fft_resolution)?.inverse(spectrogram)
}

/// Elementwise magnitude `|X|`.
pub fn magnitude(spectrogram: &Spectrogram) -> Array2<f64> {
    spectrogram.mapv(|c| c.norm())
}

/// Elementwise power `|X|^2`.
pub fn power(spectrogram: &Spectrogram) -> Array2<f64> {
    spectrogram.mapv(|c| c.norm_sqr())
}
