use nalgebra::{DMatrix, DVector};
use rstest::*;
use sigfilt::filter::kalman::DEFAULT_MEASUREMENT_NOISE_VARIANCE;
use sigfilt::prelude::*;

#[rstest]
#[case(1, 1, 0)]
#[case(3, 1, 0)]
#[case(2, 4, 1)]
#[case(6, 3, 6)]
fn shapes_after_construction(#[case] n: usize, #[case] m: usize, #[case] c: usize) {
    let kf = KalmanFilter::new(n, m, c).unwrap();

    assert_eq!(kf.dynamic_params(), n);
    assert_eq!(kf.measure_params(), m);
    assert_eq!(kf.control_params(), c);
    assert_eq!(kf.state_pre().len(), n);
    assert_eq!(kf.state_post().len(), n);
    assert_eq!(kf.transition_matrix().shape(), (n, n));
    assert_eq!(kf.process_noise_cov().shape(), (n, n));
    assert_eq!(kf.measurement_matrix().shape(), (m, n));
    assert_eq!(kf.measurement_noise_cov().shape(), (m, m));
    assert_eq!(kf.error_cov_pre().shape(), (n, n));
    assert_eq!(kf.error_cov_post().shape(), (n, n));
    assert_eq!(kf.gain().shape(), (n, m));
    match kf.control_matrix() {
        Some(b) => assert_eq!(b.shape(), (n, c)),
        None => assert_eq!(c, 0),
    }
}

#[test]
fn mismatched_shapes_are_rejected() {
    let mut kf = KalmanFilter::new(3, 2, 1).unwrap();

    let transition = DMatrix::from_element(3, 3, 0.5);
    kf.set_transition_matrix(transition.clone()).unwrap();

    let err = kf
        .set_transition_matrix(DMatrix::identity(2, 2))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(kf.transition_matrix(), &transition);

    assert!(kf.set_control_matrix(DMatrix::identity(3, 2)).is_err());
    assert_eq!(kf.control_matrix(), Some(&DMatrix::identity(3, 1)));

    assert!(kf.set_measurement_matrix(DMatrix::zeros(3, 2)).is_err());
    assert_eq!(kf.measurement_matrix(), &DMatrix::zeros(2, 3));

    assert!(kf.set_gain(DMatrix::zeros(2, 3)).is_err());
    assert_eq!(kf.gain(), &DMatrix::zeros(3, 2));

    assert!(kf.set_process_noise_cov(DMatrix::identity(2, 2)).is_err());
    assert_eq!(kf.process_noise_cov(), &DMatrix::zeros(3, 3));
    assert!(kf.set_measurement_noise_cov(DMatrix::identity(3, 3)).is_err());
    assert_eq!(
        kf.measurement_noise_cov(),
        &(DMatrix::identity(2, 2) * DEFAULT_MEASUREMENT_NOISE_VARIANCE)
    );
    assert!(kf.set_error_cov_pre(DMatrix::identity(2, 2)).is_err());
    assert_eq!(kf.error_cov_pre(), &DMatrix::identity(3, 3));
    assert!(kf.set_error_cov_post(DMatrix::identity(4, 4)).is_err());
    assert_eq!(kf.error_cov_post(), &DMatrix::identity(3, 3));

    assert_eq!(
        kf.set_state_post(DVector::zeros(2)),
        Err(FilterError::LengthMismatch {
            vector: "a-posteriori state",
            expected: 3,
            got: 2
        })
    );
    assert!(kf.set_state_pre(DVector::zeros(4)).is_err());
    assert_eq!(kf.state_pre(), &DVector::zeros(3));
}

#[test]
fn asymmetric_covariances_are_rejected() {
    let mut kf = KalmanFilter::new(2, 2, 0).unwrap();

    let asym = DMatrix::from_row_slice(2, 2, &[1.0, 0.2, 0.1, 1.0]);
    let sym = DMatrix::from_row_slice(2, 2, &[1.0, 0.2, 0.2, 1.0]);

    for result in [
        kf.clone().set_process_noise_cov(asym.clone()),
        kf.clone().set_measurement_noise_cov(asym.clone()),
        kf.clone().set_error_cov_pre(asym.clone()),
        kf.clone().set_error_cov_post(asym.clone()),
    ] {
        assert!(matches!(result, Err(FilterError::AsymmetricMatrix { .. })));
    }

    kf.set_process_noise_cov(sym.clone()).unwrap();
    kf.set_measurement_noise_cov(sym.clone()).unwrap();
    kf.set_error_cov_pre(sym.clone()).unwrap();
    kf.set_error_cov_post(sym.clone()).unwrap();

    // Strict equality: a rounding error is enough to be rejected
    let mut almost = sym.clone();
    almost[(1, 0)] = 0.1 + 0.1;
    almost[(0, 1)] = 0.3 - 0.1;
    assert!(kf.set_error_cov_post(almost).is_err());
    assert_eq!(kf.error_cov_post(), &sym);
}

#[test]
fn control_absent() {
    let mut kf = KalmanFilter::with_control(2, 1, ControlParams::None).unwrap();
    assert!(kf.control_matrix().is_none());
    assert_eq!(
        kf.set_control_matrix(DMatrix::identity(2, 1)),
        Err(FilterError::ControlNotConfigured)
    );
    assert_eq!(
        kf.predict(Some(&DVector::from_element(1, 1.0))),
        Err(FilterError::ControlNotConfigured)
    );
    // Without a control vector the prediction is legal
    assert!(kf.predict(None).is_ok());
}

#[rstest]
#[case(-1, 3)]
#[case(-7, 3)]
#[case(0, 0)]
#[case(2, 2)]
fn signed_control_params(#[case] signed: i64, #[case] expected: usize) {
    let kf = KalmanFilter::with_control(3, 1, signed.into()).unwrap();
    assert_eq!(kf.control_params(), expected);
    match kf.control_matrix() {
        Some(b) => assert_eq!(b, &DMatrix::identity(3, expected)),
        None => assert_eq!(expected, 0),
    }

    let cfg = KalmanConfig::builder()
        .dynamic_params(3)
        .measure_params(1)
        .control_params(signed)
        .build();
    assert_eq!(KalmanFilter::from_config(&cfg).unwrap(), kf);
}

#[test]
fn resize_measurements() {
    let mut kf = KalmanFilter::new(3, 1, 0).unwrap();
    kf.set_measurement_matrix(DMatrix::from_row_slice(1, 3, &[1.0, 0.0, 0.0]))
        .unwrap();
    kf.predict(None).unwrap();
    kf.correct(&DVector::from_element(1, 1.0)).unwrap();
    assert!(kf.last_residual().is_some());

    assert_eq!(
        kf.set_measure_params(0),
        Err(FilterError::InvalidDimension {
            param: "measure params",
            value: 0
        })
    );
    assert_eq!(kf.measure_params(), 1);

    kf.set_measure_params(2).unwrap();
    assert_eq!(kf.measure_params(), 2);
    assert_eq!(kf.measurement_matrix(), &DMatrix::zeros(2, 3));
    assert_eq!(
        kf.measurement_noise_cov(),
        &(DMatrix::identity(2, 2) * DEFAULT_MEASUREMENT_NOISE_VARIANCE)
    );
    assert_eq!(kf.gain(), &DMatrix::zeros(3, 2));
    assert!(kf.last_residual().is_none());

    assert!(kf.correct(&DVector::from_element(1, 1.0)).is_err());
    assert!(kf.correct(&DVector::from_element(2, 1.0)).is_ok());
}

#[test]
fn measurement_length_mismatch_leaves_filter_unchanged() {
    let mut kf = crate::random_constant_filter(0.5);
    kf.set_state_post(DVector::from_element(1, 2.0)).unwrap();
    kf.predict(None).unwrap();
    kf.correct(&DVector::from_element(1, 3.0)).unwrap();

    let state_post = kf.state_post().clone();
    let error_cov_post = kf.error_cov_post().clone();

    let err = kf.correct(&DVector::from_vec(vec![1.0, 2.0])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(kf.state_post(), &state_post);
    assert_eq!(kf.error_cov_post(), &error_cov_post);
}

#[test]
fn returned_states_are_copies() {
    let mut kf = KalmanFilter::new(2, 1, 0).unwrap();
    kf.set_state_post(DVector::from_vec(vec![1.0, 2.0])).unwrap();

    let mut state_pre = kf.predict(None).unwrap();
    state_pre[0] = 100.0;
    assert_eq!(kf.state_pre()[0], 1.0);

    let mut transition = kf.transition_matrix().clone();
    transition[(0, 1)] = 1.0;
    assert_eq!(kf.transition_matrix(), &DMatrix::identity(2, 2));

    // Once installed, the filter owns the matrix
    kf.set_transition_matrix(transition).unwrap();
    assert_eq!(kf.transition_matrix()[(0, 1)], 1.0);
}
