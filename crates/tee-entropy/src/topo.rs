use log::trace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tee_core::TeeError;
use tee_lattice::{EntropyVector, RegionPartition};

use crate::histogram::{ensemble_width, project_ensemble, Histogram};
use crate::purity::SelfPairCorrection;
use crate::renyi::{renyi2, to_bits};

/// Region entropies of one subsystem and their topological combination, in nats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopoEntropyReport {
    /// `S(A), S(B), S(C)`.
    pub one: [f64; 3],
    /// `S(A∪B), S(A∪C), S(B∪C)`.
    pub two: [f64; 3],
    /// `S(A∪B∪C)`.
    pub three: f64,
    /// `Σone − Σtwo + three`.
    pub s_topo: f64,
}

impl TopoEntropyReport {
    /// Region entropies in nats.
    pub fn entropies(&self) -> EntropyVector {
        EntropyVector::new(self.one, self.two, self.three)
    }

    /// Region entropies in bits.
    pub fn bits(&self) -> EntropyVector {
        EntropyVector::new(
            self.one.map(to_bits),
            self.two.map(to_bits),
            to_bits(self.three),
        )
    }

    /// Topological entropy in bits.
    pub fn s_topo_bits(&self) -> f64 {
        to_bits(self.s_topo)
    }
}

/// Inclusion–exclusion sum `Σone − Σtwo + Σthree`.
pub fn combine(one: &[f64], two: &[f64], three: &[f64]) -> f64 {
    one.iter().sum::<f64>() - two.iter().sum::<f64>() + three.iter().sum::<f64>()
}

/// Estimates the topological entanglement entropy of an ensemble measured on
/// a whole subsystem.
///
/// The three single regions and the three pairwise unions `AB, AC, BC` are
/// projected out of every histogram; together with the unprojected ensemble
/// this yields seven Rényi-2 entropies. All seven run in parallel.
pub fn topo_entropy(
    histograms: &[Histogram],
    partition: &RegionPartition,
    correction: SelfPairCorrection,
) -> Result<TopoEntropyReport, TeeError> {
    let width = ensemble_width(histograms)?;
    partition.validate_for(width)?;

    let singles = partition.singles();
    let pairs = partition.pairs();
    let regions: Vec<&[usize]> = singles.iter().chain(pairs.iter()).map(Vec::as_slice).collect();

    let (projected, full) = rayon::join(
        || {
            regions
                .par_iter()
                .map(|positions| region_entropy(histograms, positions, correction))
                .collect::<Result<Vec<f64>, TeeError>>()
        },
        || renyi2(histograms, correction),
    );
    let projected = projected?;
    let three = full?;

    let one = [projected[0], projected[1], projected[2]];
    let two = [projected[3], projected[4], projected[5]];
    let s_topo = combine(&one, &two, &[three]);
    trace!("full entropy {three:.6} nats over {} settings, s_topo {s_topo:.6}", histograms.len());
    Ok(TopoEntropyReport {
        one,
        two,
        three,
        s_topo,
    })
}

fn region_entropy(
    histograms: &[Histogram],
    positions: &[usize],
    correction: SelfPairCorrection,
) -> Result<f64, TeeError> {
    let projected = project_ensemble(histograms, positions)?;
    let entropy = renyi2(&projected, correction)?;
    trace!("region {positions:?}: {entropy:.6} nats");
    Ok(entropy)
}
