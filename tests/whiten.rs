mod common;

use common::{add, gaussian_noise, gen_chord, init_logging, scale};
use spectral_enhance::core::stats::std_dev;
use spectral_enhance::{mean_spectral_flatness_db, whiten, WhitenParams};

const SR: u32 = 22050;

fn flatness(signal: &[f64]) -> f64 {
    mean_spectral_flatness_db(signal, 256, 1024).unwrap()
}

#[test]
fn test_whitened_audio_is_as_flat_as_noise() {
    init_logging();
    let n = 1 << 15;
    let chord = gen_chord(&[(220.0, 0.3), (277.2, 0.2), (329.6, 0.2), (440.0, 0.1)], SR, n);
    let audio = add(&chord, &scale(&gaussian_noise(3, n), 0.05));
    let reference = gaussian_noise(11, n);

    let whitened = whiten(&audio, &WhitenParams::default()).unwrap();
    let noise_flatness = flatness(&reference);
    let whitened_flatness = flatness(&whitened);

    assert!(
        whitened_flatness > noise_flatness - 0.5,
        "whitened flatness {:.2} dB vs noise {:.2} dB",
        whitened_flatness,
        noise_flatness
    );
    assert!(whitened_flatness > flatness(&audio) + 6.0);
}

#[test]
fn test_whiten_preserves_length_and_std() {
    let n = 10_000;
    let audio = add(
        &gen_chord(&[(100.0, 1.0), (3000.0, 0.05)], SR, n),
        &scale(&gaussian_noise(5, n), 0.01),
    );
    for params in [
        WhitenParams::default(),
        WhitenParams::default().with_frame_length(512),
        WhitenParams::default().with_frame_length(255).with_fft_resolution(2048),
    ] {
        let out = whiten(&audio, &params).unwrap();
        assert_eq!(out.len(), audio.len());
        assert!((std_dev(&out) - std_dev(&audio)).abs() < 1e-10);
    }
}
