use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, TeeError};

/// Character order of backend outcome strings relative to subsystem bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BitOrder {
    /// Character `i` is the outcome of subsystem qubit `i`.
    #[default]
    AsWritten,
    /// Character `i` is the outcome of qubit `q - 1 - i` (little-endian register dumps).
    Reversed,
}

/// Outcome counts of one measurement setting, keyed by fixed-width bitstrings.
///
/// Keys are kept sorted so that iteration, projection and serialization are
/// deterministic. Zero counts are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u64>", into = "BTreeMap<String, u64>")]
pub struct Histogram {
    counts: BTreeMap<String, u64>,
    width: usize,
    shots: u64,
}

impl Histogram {
    /// Builds a histogram, merging repeated keys additively.
    ///
    /// Every key must consist of `0`/`1` characters and all keys must share
    /// one length.
    pub fn from_counts<I, K>(counts: I) -> Result<Self, TeeError>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut merged = BTreeMap::new();
        let mut width = None;
        for (key, count) in counts {
            let key = key.into();
            validate_outcome(&key)?;
            match width {
                None => width = Some(key.len()),
                Some(expected) if expected != key.len() => {
                    let info = ErrorInfo::new(
                        "inconsistent-outcome-width",
                        "histogram keys have different lengths",
                    )
                    .with_context("expected", expected.to_string())
                    .with_context("found", key.len().to_string())
                    .with_context("outcome", key);
                    return Err(TeeError::Domain(info));
                }
                Some(_) => {}
            }
            if count > 0 {
                *merged.entry(key).or_insert(0) += count;
            }
        }
        Ok(Self::from_merged(merged, width.unwrap_or(0)))
    }

    fn from_merged(counts: BTreeMap<String, u64>, width: usize) -> Self {
        let shots = counts.values().sum();
        Self {
            counts,
            width,
            shots,
        }
    }

    /// Sorted outcome counts.
    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    /// Bitstring length `q`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of shots `N`.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Number of distinct outcomes `K`.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Whether the histogram holds no shots.
    pub fn is_empty(&self) -> bool {
        self.shots == 0
    }

    /// Count recorded for `outcome`, zero when absent.
    pub fn count(&self, outcome: &str) -> u64 {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    /// Marginal histogram over the bits at `positions`, in the given order.
    ///
    /// Outcomes that collapse onto the same substring have their counts
    /// added. Positions may repeat; they must be in range and non-empty.
    pub fn project(&self, positions: &[usize]) -> Result<Histogram, TeeError> {
        if positions.is_empty() {
            let info = ErrorInfo::new("empty-projection", "projection needs at least one position");
            return Err(TeeError::Domain(info));
        }
        if let Some(&position) = positions.iter().find(|&&position| position >= self.width) {
            let info = ErrorInfo::new(
                "projection-out-of-range",
                "projection position exceeds the outcome width",
            )
            .with_context("position", position.to_string())
            .with_context("width", self.width.to_string());
            return Err(TeeError::Domain(info));
        }
        let mut merged = BTreeMap::new();
        for (outcome, &count) in &self.counts {
            let bits = outcome.as_bytes();
            let projected: String = positions.iter().map(|&position| bits[position] as char).collect();
            *merged.entry(projected).or_insert(0) += count;
        }
        Ok(Self {
            counts: merged,
            width: positions.len(),
            shots: self.shots,
        })
    }

    /// Rewrites the keys so that character `i` belongs to subsystem qubit `i`.
    pub fn with_bit_order(self, order: BitOrder) -> Histogram {
        match order {
            BitOrder::AsWritten => self,
            BitOrder::Reversed => {
                let counts = self
                    .counts
                    .into_iter()
                    .map(|(outcome, count)| (outcome.chars().rev().collect(), count))
                    .collect();
                Self {
                    counts,
                    width: self.width,
                    shots: self.shots,
                }
            }
        }
    }

    /// Expectation value of the product of `Z`-type outcomes, `(even - odd) / N`.
    ///
    /// For a histogram measured in the basis of a stabilizer this is the
    /// stabilizer expectation value.
    pub fn parity_expectation(&self) -> Result<f64, TeeError> {
        if self.shots == 0 {
            let info = ErrorInfo::new("empty-histogram", "histogram holds no shots");
            return Err(TeeError::Domain(info));
        }
        let mut signed = 0i128;
        for (outcome, &count) in &self.counts {
            let ones = outcome.bytes().filter(|&bit| bit == b'1').count();
            if ones % 2 == 0 {
                signed += i128::from(count);
            } else {
                signed -= i128::from(count);
            }
        }
        Ok(signed as f64 / self.shots as f64)
    }
}

impl TryFrom<BTreeMap<String, u64>> for Histogram {
    type Error = TeeError;

    fn try_from(counts: BTreeMap<String, u64>) -> Result<Self, Self::Error> {
        Histogram::from_counts(counts)
    }
}

impl From<Histogram> for BTreeMap<String, u64> {
    fn from(histogram: Histogram) -> Self {
        histogram.counts
    }
}

fn validate_outcome(outcome: &str) -> Result<(), TeeError> {
    if outcome.is_empty() {
        let info = ErrorInfo::new("empty-outcome", "outcome strings must be non-empty");
        return Err(TeeError::Domain(info));
    }
    if outcome.bytes().any(|bit| bit != b'0' && bit != b'1') {
        let info = ErrorInfo::new("invalid-outcome-bit", "outcome strings may only contain 0 and 1")
            .with_context("outcome", outcome)
            .with_hint("strip register separators before building the histogram");
        return Err(TeeError::Domain(info));
    }
    Ok(())
}

/// Projects every histogram of an ensemble onto the same positions.
pub fn project_ensemble(
    histograms: &[Histogram],
    positions: &[usize],
) -> Result<Vec<Histogram>, TeeError> {
    histograms
        .iter()
        .map(|histogram| histogram.project(positions))
        .collect()
}

/// Shared outcome width of a non-empty ensemble.
pub fn ensemble_width(histograms: &[Histogram]) -> Result<usize, TeeError> {
    let Some(first) = histograms.first() else {
        let info = ErrorInfo::new("empty-ensemble", "ensemble holds no histograms");
        return Err(TeeError::Domain(info));
    };
    if let Some((index, other)) = histograms
        .iter()
        .enumerate()
        .find(|(_, histogram)| histogram.width() != first.width())
    {
        let info = ErrorInfo::new(
            "inconsistent-ensemble-width",
            "ensemble histograms have different outcome widths",
        )
        .with_context("expected", first.width().to_string())
        .with_context("found", other.width().to_string())
        .with_context("index", index.to_string());
        return Err(TeeError::Domain(info));
    }
    Ok(first.width())
}
