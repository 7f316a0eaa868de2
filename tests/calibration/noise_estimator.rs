use approx::assert_abs_diff_eq;
use nalgebra::{DMatrix, DVector};
use rand_pcg::Pcg64Mcg;
use sigfilt::io::samples::read_samples;
use sigfilt::prelude::*;
use std::path::PathBuf;

use crate::init_logger;

/// Draws `count` samples of `mean + L w` where `w` is unit white noise, so the covariance is `L Lᵀ`.
fn correlated_samples(
    count: usize,
    mean: &DVector<f64>,
    chol: &DMatrix<f64>,
    seed: u128,
) -> Vec<DVector<f64>> {
    let mut rng = Pcg64Mcg::new(seed);
    let mut unit = WhiteNoise::new(1.0);
    (0..count)
        .map(|_| mean + chol * unit.sample_vector(mean.len(), &mut rng))
        .collect()
}

#[test]
fn online_matches_batch() {
    init_logger();

    let mean = DVector::from_vec(vec![1.0, -2.0]);
    let chol = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.5, 0.8]);
    let samples = correlated_samples(500, &mean, &chol, 11);

    let mut estimator = MeasurementNoiseCovarianceEstimator::new(2).unwrap();
    estimator.update_all(&samples).unwrap();
    assert_eq!(estimator.sample_count(), samples.len());

    let count = samples.len() as f64;
    let batch_mean = samples
        .iter()
        .fold(DVector::<f64>::zeros(2), |acc, s| acc + s)
        / count;
    let batch_cov = samples.iter().fold(DMatrix::<f64>::zeros(2, 2), |acc, s| {
        let d = s - &batch_mean;
        acc + &d * d.transpose()
    }) / count;

    println!("{estimator}");
    assert_abs_diff_eq!(estimator.sample_average(), &batch_mean, epsilon = 1e-9);
    assert_abs_diff_eq!(estimator.measurement_noise_cov(), &batch_cov, epsilon = 1e-9);
}

#[test]
fn converges_to_true_covariance() {
    let mean = DVector::from_vec(vec![0.3, 0.0]);
    let chol = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.5, 0.8]);
    let truth = &chol * chol.transpose();

    let mut estimator = MeasurementNoiseCovarianceEstimator::new(2).unwrap();
    for sample in correlated_samples(20_000, &mean, &chol, 3) {
        estimator.update(&sample).unwrap();
    }

    assert_abs_diff_eq!(estimator.sample_average(), &mean, epsilon = 0.05);
    assert_abs_diff_eq!(estimator.measurement_noise_cov(), &truth, epsilon = 0.05);

    let cov = estimator.measurement_noise_cov();
    assert_eq!(cov[(0, 1)], cov[(1, 0)]);
}

#[test]
fn calibrated_noise_feeds_the_filter() {
    init_logger();

    let sigma = 0.3;
    let mut rng = Pcg64Mcg::new(42);
    let mut noise = WhiteNoise::new(sigma);

    // Calibrate on a sensor observing a known constant
    let mut estimator = MeasurementNoiseCovarianceEstimator::new(1).unwrap();
    for _ in 0..2_000 {
        estimator
            .update(&DVector::from_element(1, 5.0 + noise.sample(&mut rng)))
            .unwrap();
    }
    assert_abs_diff_eq!(
        estimator.measurement_noise_cov()[(0, 0)],
        sigma * sigma,
        epsilon = 0.015
    );

    let mut kf = crate::random_constant_filter(1.0);
    kf.set_measurement_noise_cov(estimator.measurement_noise_cov().clone())
        .unwrap();
    assert_eq!(kf.measurement_noise_cov(), estimator.measurement_noise_cov());

    let truth = -1.5;
    for _ in 0..200 {
        kf.step(None, &DVector::from_element(1, truth + noise.sample(&mut rng)))
            .unwrap();
    }
    let est = kf.estimate();
    assert!(!est.predicted);
    assert_abs_diff_eq!(est.state[0], truth, epsilon = 0.1);
    assert!(est.sigmas()[0] < sigma / 10.0);
}

#[test]
fn calibrate_from_csv() {
    let path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/tests/calibration/static_accel.csv");
    let samples = read_samples(path).unwrap();
    assert_eq!(samples.len(), 6);

    let mut estimator = MeasurementNoiseCovarianceEstimator::new(3).unwrap();
    estimator.update_all(&samples).unwrap();

    assert_eq!(estimator.sample_count(), 6);
    assert_abs_diff_eq!(estimator.sample_average()[2], 9.8085, epsilon = 1e-12);
    let cov = estimator.measurement_noise_cov();
    for i in 0..3 {
        assert!(cov[(i, i)] > 0.0);
    }
    assert_eq!(cov, &cov.transpose());

    // A sensor with a different number of axes is rejected
    let mut wrong = MeasurementNoiseCovarianceEstimator::new(2).unwrap();
    assert!(wrong.update(&samples[0]).is_err());
    assert_eq!(wrong.sample_count(), 0);

    estimator.reset();
    assert_eq!(estimator.sample_count(), 0);
    assert_eq!(estimator.measurement_noise_cov(), &DMatrix::zeros(3, 3));
}
