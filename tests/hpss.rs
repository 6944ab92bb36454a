mod common;

use common::{energy, gen_click_train, gen_mixdown, gen_sine, init_logging};
use spectral_enhance::core::stats::mean_squared_error;
use spectral_enhance::core::median::{median_filter_horizontal, median_filter_vertical};
use spectral_enhance::core::stft::magnitude;
use spectral_enhance::{hpss, soft_masks, HpssParams, SpectralError, Stft};

const SR: u32 = 22050;

#[test]
fn test_components_sum_to_mixdown() {
    init_logging();
    let mixdown = gen_mixdown(SR, 3 * SR as usize);
    let (harmonic, percussive) = hpss(&mixdown, SR, &HpssParams::default()).unwrap();
    assert_eq!(harmonic.len(), mixdown.len());
    assert_eq!(percussive.len(), mixdown.len());

    let sum: Vec<f64> = harmonic.iter().zip(&percussive).map(|(h, p)| h + p).collect();
    let mse = mean_squared_error(&sum, &mixdown);
    assert!(mse < 1e-10, "reconstruction mse {}", mse);
}

#[test]
fn test_masks_sum_to_one_on_real_spectrogram() {
    let params = HpssParams::default();
    let mixdown = gen_mixdown(SR, SR as usize);
    let (temporal, frequency) = params.kernel_sizes(SR).unwrap();
    assert_eq!((temporal, frequency), (22, 70));

    let spec = Stft::new(params.frame_length, params.fft_resolution)
        .unwrap()
        .forward(&mixdown)
        .unwrap();
    let mags = magnitude(&spec);
    let h = median_filter_horizontal(&mags, temporal).unwrap().mapv(|v| v * v);
    let p = median_filter_vertical(&mags, frequency).unwrap().mapv(|v| v * v);
    let masks = soft_masks(&h, &p, params.mask_epsilon).unwrap();

    for (&mh, &mp) in masks.harmonic.iter().zip(masks.percussive.iter()) {
        assert!((mh + mp - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&mh));
        assert!((0.0..=1.0).contains(&mp));
    }
}

#[test]
fn test_sustained_tone_is_harmonic() {
    let tone = gen_sine(330.0, 0.7, SR, 2 * SR as usize);
    let (h, p) = hpss(&tone, SR, &HpssParams::default()).unwrap();
    assert!(energy(&h) > 4.0 * energy(&p));
}

#[test]
fn test_click_train_is_percussive() {
    let clicks = gen_click_train(SR as usize / 2, 2 * SR as usize, 0.9);
    let (h, p) = hpss(&clicks, SR, &HpssParams::default()).unwrap();
    assert!(
        energy(&p) > 4.0 * energy(&h),
        "percussive {:.4} vs harmonic {:.4}",
        energy(&p),
        energy(&h)
    );
}

#[test]
fn test_explicit_kernel_widths_still_reconstruct() {
    let mixdown = gen_mixdown(SR, SR as usize);
    let params = HpssParams::default().with_kernel_widths(9, 15);
    let (h, p) = hpss(&mixdown, SR, &params).unwrap();
    for i in 0..mixdown.len() {
        assert!((h[i] + p[i] - mixdown[i]).abs() < 1e-9);
    }
}

#[test]
fn test_hpss_rejects_bad_input() {
    assert!(matches!(
        hpss(&[], SR, &HpssParams::default()),
        Err(SpectralError::InvalidArgument(_))
    ));
    assert!(matches!(
        hpss(&[0.1; 1024], 0, &HpssParams::default()),
        Err(SpectralError::InvalidArgument(_))
    ));
    let endless = HpssParams::default().with_temporal_kernel_seconds(1e30);
    assert!(matches!(
        hpss(&[0.1; 4096], SR, &endless),
        Err(SpectralError::InvalidArgument(_))
    ));
    let huge = HpssParams::default().with_kernel_widths(usize::MAX, usize::MAX);
    assert!(matches!(
        hpss(&[0.1; 4096], SR, &huge),
        Err(SpectralError::InvalidArgument(_))
    ));
}
