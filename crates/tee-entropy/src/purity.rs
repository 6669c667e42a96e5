use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, TeeError};

use crate::histogram::Histogram;

/// How the `s1 == s2` term of the purity kernel is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SelfPairCorrection {
    /// Pair each shot only with the other `N - 1` shots of its setting.
    #[default]
    LeaveOneOut,
    /// Plug-in estimate that pairs each shot with itself.
    Naive,
}

/// Randomized-measurement purity estimate with the leave-one-out correction.
pub fn purity(histogram: &Histogram) -> Result<f64, TeeError> {
    purity_with(histogram, SelfPairCorrection::LeaveOneOut)
}

/// Randomized-measurement purity estimate of one histogram.
///
/// Evaluates `2^q * sum (-2)^(-D(s1, s2)) p(s1) p'(s2)` over all pairs of
/// observed outcomes, where `D` is the Hamming distance. Under
/// [`SelfPairCorrection::LeaveOneOut`] the diagonal uses
/// `p'(s) = (N p(s) - 1) / (N - 1)`. Cost is quadratic in the number of
/// distinct outcomes.
pub fn purity_with(histogram: &Histogram, correction: SelfPairCorrection) -> Result<f64, TeeError> {
    let shots = histogram.shots();
    if shots == 0 {
        let info = ErrorInfo::new("empty-histogram", "purity is undefined without shots");
        return Err(TeeError::Domain(info));
    }
    if shots == 1 && correction == SelfPairCorrection::LeaveOneOut {
        let info = ErrorInfo::new(
            "insufficient-shots",
            "leave-one-out purity needs at least two shots",
        )
        .with_context("shots", shots.to_string())
        .with_hint("collect more shots or use the naive correction");
        return Err(TeeError::Domain(info));
    }

    let width = histogram.width();
    let weights: Vec<f64> = (0..=width).map(|distance| (-0.5f64).powi(distance as i32)).collect();
    let n = shots as f64;
    let outcomes: Vec<(&[u8], f64)> = histogram
        .counts()
        .iter()
        .map(|(outcome, &count)| (outcome.as_bytes(), count as f64))
        .collect();

    let mut total = 0.0;
    for (idx, &(first, first_count)) in outcomes.iter().enumerate() {
        let p1 = first_count / n;
        let self_pair = match correction {
            SelfPairCorrection::LeaveOneOut => (first_count - 1.0) / (n - 1.0),
            SelfPairCorrection::Naive => p1,
        };
        total += p1 * self_pair;
        // Off-diagonal terms are symmetric; count each unordered pair twice.
        for &(second, second_count) in &outcomes[idx + 1..] {
            total += 2.0 * weights[hamming(first, second)] * p1 * (second_count / n);
        }
    }
    Ok(2f64.powi(width as i32) * total)
}

fn hamming(first: &[u8], second: &[u8]) -> usize {
    first
        .iter()
        .zip(second)
        .filter(|(lhs, rhs)| lhs != rhs)
        .count()
}
