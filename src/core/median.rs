//! Two-dimensional median filtering with mirror-reflected borders.
//!
//! Row-only and column-only kernels are the cases HPSS uses: a `(1, k)`
//! kernel runs along time and keeps temporally stable (harmonic) energy, a
//! `(k, 1)` kernel runs along frequency and keeps broadband (percussive)
//! energy.

use crate::error::SpectralError;
use ndarray::Array2;

/// Largest footprint (`kernel_rows * kernel_cols`) a filter may gather.
pub const MAX_KERNEL_TAPS: usize = 1 << 20;

/// Maps a possibly out-of-range index onto `0..len` by mirror reflection
/// that repeats the edge sample (`d c b a | a b c d | d c b a`).
#[inline]
fn reflect_index(index: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let m = index.rem_euclid(period) as usize;
    if m >= len {
        2 * len - 1 - m
    } else {
        m
    }
}

/// Offsets covered by a centered kernel of `size` taps. Even sizes reach one
/// tap further back than forward.
#[inline]
fn kernel_offsets(size: usize) -> std::ops::Range<isize> {
    let back = (size / 2) as isize;
    -back..(size as isize - back)
}

/// Returns the element of rank `len / 2` (upper median for even lengths).
#[inline]
fn select_median(scratch: &mut [f64]) -> f64 {
    let mid = scratch.len() / 2;
    let (_, median, _) = scratch
        .select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    *median
}

/// Applies a median filter of `(kernel_rows, kernel_cols)` taps to `matrix`.
///
/// The output has the same shape as the input.
pub fn median_filter(
    matrix: &Array2<f64>,
    kernel: (usize, usize),
) -> Result<Array2<f64>, SpectralError> {
    let (kernel_rows, kernel_cols) = kernel;
    if kernel_rows == 0 || kernel_cols == 0 {
        return Err(SpectralError::InvalidArgument(format!(
            "median kernel must be positive in both axes, got ({}, {})",
            kernel_rows, kernel_cols
        )));
    }
    let taps = match kernel_rows.checked_mul(kernel_cols) {
        Some(taps) if taps <= MAX_KERNEL_TAPS => taps,
        _ => {
            return Err(SpectralError::InvalidArgument(format!(
                "median kernel ({}, {}) exceeds {} taps",
                kernel_rows, kernel_cols, MAX_KERNEL_TAPS
            )))
        }
    };

    let (rows, cols) = matrix.dim();
    if rows == 0 || cols == 0 {
        return Ok(matrix.clone());
    }

    let mut result = Array2::<f64>::zeros((rows, cols));
    let mut scratch = Vec::with_capacity(taps);

    for r in 0..rows {
        for c in 0..cols {
            scratch.clear();
            for dr in kernel_offsets(kernel_rows) {
                let rr = reflect_index(r as isize + dr, rows);
                for dc in kernel_offsets(kernel_cols) {
                    let cc = reflect_index(c as isize + dc, cols);
                    scratch.push(matrix[(rr, cc)]);
                }
            }
            result[(r, c)] = select_median(&mut scratch);
        }
    }

    Ok(result)
}

/// Median filter along the time axis (columns) of a `(bins, frames)` matrix.
pub fn median_filter_horizontal(
    matrix: &Array2<f64>,
    width: usize,
) -> Result<Array2<f64>, SpectralError> {
    median_filter(matrix, (1, width))
}

/// Median filter along the frequency axis (rows) of a `(bins, frames)` matrix.
pub fn median_filter_vertical(
    matrix: &Array2<f64>,
    width: usize,
) -> Result<Array2<f64>, SpectralError> {
    median_filter(matrix, (width, 1))
}
