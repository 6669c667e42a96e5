use rayon::prelude::*;
use tee_core::{ErrorInfo, TeeError};

use crate::histogram::Histogram;
use crate::purity::{purity_with, SelfPairCorrection};

/// Rényi-2 entropy `-ln(mean purity)` of an ensemble, in nats.
///
/// Per-setting purities are evaluated on the current rayon pool and averaged
/// in setting order. A non-positive or non-finite mean is reported as an
/// error rather than clamped.
pub fn renyi2(histograms: &[Histogram], correction: SelfPairCorrection) -> Result<f64, TeeError> {
    if histograms.is_empty() {
        let info = ErrorInfo::new("empty-ensemble", "entropy needs at least one histogram");
        return Err(TeeError::Domain(info));
    }
    let purities = histograms
        .par_iter()
        .map(|histogram| purity_with(histogram, correction))
        .collect::<Result<Vec<f64>, TeeError>>()?;
    let mean = purities.iter().sum::<f64>() / purities.len() as f64;
    if !mean.is_finite() || mean <= 0.0 {
        let info = ErrorInfo::new(
            "non-positive-purity",
            "mean purity must be positive to take its logarithm",
        )
        .with_context("mean", mean.to_string())
        .with_context("settings", histograms.len().to_string())
        .with_hint("increase the number of settings or shots");
        return Err(TeeError::Domain(info));
    }
    Ok(-mean.ln())
}

/// Converts an entropy from nats to bits.
pub fn to_bits(nats: f64) -> f64 {
    nats / std::f64::consts::LN_2
}
