mod common;

use std::f64::consts::LN_2;

use common::{assert_close, histogram, uniform_histogram};
use tee_entropy::{renyi2, to_bits, SelfPairCorrection};

#[test]
fn empty_ensemble_is_rejected() {
    let err = renyi2(&[], SelfPairCorrection::LeaveOneOut).unwrap_err();
    assert_eq!(err.code(), "empty-ensemble");
}

#[test]
fn non_positive_mean_purity_is_not_clamped() {
    // Two shots on distinct outcomes: the corrected diagonal vanishes and
    // only the negative off-diagonal term remains.
    let ensemble = vec![histogram(&[("0", 1), ("1", 1)])];
    let err = renyi2(&ensemble, SelfPairCorrection::LeaveOneOut).unwrap_err();
    assert_eq!(err.code(), "non-positive-purity");
    assert!(err.info().context.contains_key("mean"));
}

#[test]
fn failing_histogram_aborts_the_estimate() {
    let ensemble = vec![uniform_histogram(2, 8), histogram(&[("01", 1)])];
    let err = renyi2(&ensemble, SelfPairCorrection::LeaveOneOut).unwrap_err();
    assert_eq!(err.code(), "insufficient-shots");
}

#[test]
fn maximally_mixed_ensemble_has_full_entropy() {
    let ensemble: Vec<_> = (0..5).map(|_| uniform_histogram(3, 64)).collect();
    let entropy = renyi2(&ensemble, SelfPairCorrection::Naive).unwrap();
    assert_close(entropy, 3.0 * LN_2, 1e-12);
    assert_close(to_bits(entropy), 3.0, 1e-12);
}

#[test]
fn estimate_does_not_depend_on_pool_size() {
    let ensemble: Vec<_> = (1..40u64)
        .map(|k| histogram(&[("00", k), ("01", 2 * k), ("11", 40 - k), ("10", 3)]))
        .collect();
    let single = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let many = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let a = single.install(|| renyi2(&ensemble, SelfPairCorrection::LeaveOneOut).unwrap());
    let b = many.install(|| renyi2(&ensemble, SelfPairCorrection::LeaveOneOut).unwrap());
    assert_eq!(a, b);
}

#[test]
fn bits_conversion_divides_by_ln2() {
    assert_close(to_bits(LN_2), 1.0, 1e-15);
    assert_close(to_bits(0.0), 0.0, 0.0);
}
