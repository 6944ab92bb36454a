//! Summary statistics over sample slices.
//!
//! Variance and standard deviation are population statistics (divide by `n`).

/// Arithmetic mean, 0.0 for an empty slice.
#[inline]
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population variance, 0.0 for an empty slice.
#[inline]
pub fn variance(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    samples.iter().map(|&s| (s - m) * (s - m)).sum::<f64>() / samples.len() as f64
}

/// Population standard deviation.
#[inline]
pub fn std_dev(samples: &[f64]) -> f64 {
    variance(samples).sqrt()
}

/// Mean of the squared sample-wise difference over the common length.
pub fn mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    a[..len]
        .iter()
        .zip(&b[..len])
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<f64>()
        / len as f64
}
