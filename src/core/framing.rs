//! Block-wise framing of a 1-D signal into overlapping windows.
//!
//! Three flavours are offered:
//!
//! - [`frame`] copies the windows into an owned `(window_length, num_frames)`
//!   matrix; column `i` holds `signal[i * hop .. i * hop + window_length]`.
//! - [`frame_view`] borrows the signal without copying when it already
//!   tiles exactly.
//! - [`FrameBuffer`] owns a zero-padded copy of the signal and hands out
//!   borrowed [`FrameView`]s over it. Writes through
//!   [`FrameBuffer::samples_mut`] show up in every window that covers the
//!   written sample.

use crate::error::SpectralError;
use ndarray::Array2;

fn validate_framing(
    signal_len: usize,
    window_length: usize,
    hop_size: usize,
) -> Result<(), SpectralError> {
    if window_length == 0 {
        return Err(SpectralError::InvalidArgument(
            "window_length must be positive".to_string(),
        ));
    }
    if hop_size == 0 {
        return Err(SpectralError::InvalidArgument(
            "hop_size must be positive".to_string(),
        ));
    }
    if signal_len == 0 {
        return Err(SpectralError::InvalidArgument(
            "cannot frame an empty signal".to_string(),
        ));
    }
    Ok(())
}

/// Number of windows needed to cover `signal_len` samples:
/// `ceil((len - window_length) / hop_size) + 1`, at least one.
#[inline]
pub fn num_frames(signal_len: usize, window_length: usize, hop_size: usize) -> usize {
    if signal_len <= window_length {
        return 1;
    }
    (signal_len - window_length).div_ceil(hop_size) + 1
}

/// Zeros appended on the right so that the last window is fully populated.
#[inline]
pub fn padding_len(signal_len: usize, window_length: usize, hop_size: usize) -> usize {
    let frames = num_frames(signal_len, window_length, hop_size);
    ((frames - 1) * hop_size + window_length).saturating_sub(signal_len)
}

/// A borrowed, zero-copy view of overlapping windows over a sample buffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    samples: &'a [f64],
    window_length: usize,
    hop_size: usize,
    num_frames: usize,
}

impl<'a> FrameView<'a> {
    /// Number of rows (samples per window).
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of columns (windows).
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Window `index` as a slice of the backing buffer.
    pub fn frame(&self, index: usize) -> Option<&'a [f64]> {
        if index >= self.num_frames {
            return None;
        }
        let start = index * self.hop_size;
        Some(&self.samples[start..start + self.window_length])
    }

    /// Element at `(row, column)`, i.e. sample `row` of window `column`.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.window_length {
            return None;
        }
        self.frame(column).map(|f| f[row])
    }

    /// Iterates the windows in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [f64]> + 'a {
        let samples = self.samples;
        let window_length = self.window_length;
        let hop_size = self.hop_size;
        (0..self.num_frames).map(move |i| &samples[i * hop_size..i * hop_size + window_length])
    }

    /// Copies the view into an owned `(window_length, num_frames)` matrix.
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.window_length, self.num_frames), |(row, col)| {
            self.samples[col * self.hop_size + row]
        })
    }
}

/// Borrows `signal` as overlapping windows without copying.
///
/// Fails with `InvalidArgument` if the windows do not tile the signal
/// exactly; use [`FrameBuffer`] or [`frame`] when padding is needed.
pub fn frame_view(
    signal: &[f64],
    window_length: usize,
    hop_size: usize,
) -> Result<FrameView<'_>, SpectralError> {
    validate_framing(signal.len(), window_length, hop_size)?;
    let padding = padding_len(signal.len(), window_length, hop_size);
    if padding != 0 {
        return Err(SpectralError::InvalidArgument(format!(
            "signal of {} samples needs {} samples of padding for window {} / hop {}",
            signal.len(),
            padding,
            window_length,
            hop_size
        )));
    }
    Ok(FrameView {
        samples: signal,
        window_length,
        hop_size,
        num_frames: num_frames(signal.len(), window_length, hop_size),
    })
}

/// Frames `signal` into an owned matrix, zero-padding the last window.
pub fn frame(
    signal: &[f64],
    window_length: usize,
    hop_size: usize,
) -> Result<Array2<f64>, SpectralError> {
    Ok(FrameBuffer::new(signal, window_length, hop_size)?
        .view()
        .to_array())
}

/// An owned, zero-padded copy of a signal that can be viewed as frames.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    samples: Vec<f64>,
    window_length: usize,
    hop_size: usize,
}

impl FrameBuffer {
    /// Copies `signal` and pads it on the right so every window is full.
    pub fn new(signal: &[f64], window_length: usize, hop_size: usize) -> Result<Self, SpectralError> {
        validate_framing(signal.len(), window_length, hop_size)?;
        let padding = padding_len(signal.len(), window_length, hop_size);
        let mut samples = Vec::with_capacity(signal.len() + padding);
        samples.extend_from_slice(signal);
        samples.resize(signal.len() + padding, 0.0);
        Ok(Self {
            samples,
            window_length,
            hop_size,
        })
    }

    /// Zero-copy view of the windows over the padded buffer.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            samples: &self.samples,
            window_length: self.window_length,
            hop_size: self.hop_size,
            num_frames: num_frames(self.samples.len(), self.window_length, self.hop_size),
        }
    }

    /// The padded samples backing every view.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Mutable access to the padded samples. Overlapping windows share
    /// samples, so one write is visible in every window covering it.
    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    /// Consumes the buffer, returning the padded samples.
    pub fn into_inner(self) -> Vec<f64> {
        self.samples
    }
}
