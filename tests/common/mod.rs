#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn gen_sine(freq_hz: f64, amp: f64, sr: u32, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| amp * (2.0 * PI * freq_hz * i as f64 / sr as f64).sin())
        .collect()
}

/// Sum of equal-length sines given as `(freq_hz, amp)` pairs.
pub fn gen_chord(partials: &[(f64, f64)], sr: u32, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n];
    for &(freq, amp) in partials {
        for (o, s) in out.iter_mut().zip(gen_sine(freq, amp, sr, n)) {
            *o += s;
        }
    }
    out
}

pub fn gen_click_train(period: usize, n: usize, amp: f64) -> Vec<f64> {
    let mut out = vec![0.0; n];
    if period == 0 {
        return out;
    }
    for i in (0..n).step_by(period) {
        out[i] = amp;
        if i + 1 < n {
            out[i + 1] = -0.5 * amp;
        }
    }
    out
}

/// Zero-mean, unit-variance Gaussian samples (Box-Muller), reproducible per seed.
pub fn gaussian_noise(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let u1: f64 = 1.0 - rng.random::<f64>();
            let u2: f64 = rng.random::<f64>();
            (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
        })
        .collect()
}

/// A synthetic stand-in for a music mixdown: a sustained chord, a click
/// train on the beat and a little broadband noise.
pub fn gen_mixdown(sr: u32, n: usize) -> Vec<f64> {
    let chord = gen_chord(&[(220.0, 0.3), (277.2, 0.2), (329.6, 0.2), (440.0, 0.1)], sr, n);
    let clicks = gen_click_train(sr as usize / 2, n, 0.8);
    let noise = gaussian_noise(99, n);
    chord
        .iter()
        .zip(&clicks)
        .zip(&noise)
        .map(|((c, k), z)| c + k + 0.01 * z)
        .collect()
}

pub fn energy(signal: &[f64]) -> f64 {
    signal.iter().map(|x| x * x).sum()
}

pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

pub fn scale(a: &[f64], k: f64) -> Vec<f64> {
    a.iter().map(|x| x * k).collect()
}
