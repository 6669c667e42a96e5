#![allow(dead_code)]

use std::collections::BTreeMap;

use tee_core::{ErrorInfo, TeeError};
use tee_entropy::{Histogram, MeasurementBackend, MeasurementSetting, PauliBasis};
use tee_lattice::{plaquettes, star_coords, Coord, LatticeSize, Subsystem};

/// Exact Pauli-basis statistics of the toric-code ground state.
///
/// Plaquettes act as `X` checks and stars (including truncated boundary
/// stars) as `Z` checks. Outcomes are uniform over the strings that satisfy
/// every stabilizer diagonal in the requested basis, with `shots` split
/// evenly, so the histograms carry no sampling noise.
pub struct StabilizerBackend {
    lattice: LatticeSize,
    shots: u64,
}

impl StabilizerBackend {
    pub fn new(lattice: LatticeSize, shots: u64) -> Self {
        Self { lattice, shots }
    }

    fn checks(&self) -> Vec<(bool, Vec<Coord>)> {
        let mut checks: Vec<(bool, Vec<Coord>)> = plaquettes(self.lattice)
            .into_iter()
            .map(|plaquette| (true, plaquette.to_vec()))
            .collect();
        for x_index in 0..=self.lattice.y() / 2 {
            for y_index in 0..self.lattice.x() {
                let star = star_coords(self.lattice, x_index, y_index);
                if star.len() >= 2 {
                    checks.push((false, star));
                }
            }
        }
        checks
    }

    /// `(x_mask, z_mask)` of every check fully inside the subsystem.
    fn generators(&self, subsystem: &Subsystem) -> Vec<(u32, u32)> {
        self.checks()
            .into_iter()
            .filter_map(|(is_x, coords)| {
                let positions = subsystem.positions_of(&coords).ok()?;
                let mask = positions.iter().fold(0u32, |acc, &p| acc | (1 << p));
                Some(if is_x { (mask, 0) } else { (0, mask) })
            })
            .collect()
    }
}

impl MeasurementBackend for StabilizerBackend {
    fn run(&self, subsystem: &Subsystem, setting: &MeasurementSetting) -> Result<Histogram, TeeError> {
        let MeasurementSetting::Pauli { bases, .. } = setting else {
            return Err(TeeError::Backend(ErrorInfo::new(
                "unsupported-setting",
                "stabilizer fixture only measures pauli settings",
            )));
        };
        let width = subsystem.len();
        let generators = self.generators(subsystem);

        let mut diagonal = Vec::new();
        for selection in 1u32..(1 << generators.len()) {
            let (mut x_mask, mut z_mask) = (0u32, 0u32);
            for (bit, (gx, gz)) in generators.iter().enumerate() {
                if selection & (1 << bit) != 0 {
                    x_mask ^= gx;
                    z_mask ^= gz;
                }
            }
            let measured = (0..width).all(|qubit| {
                let x = x_mask & (1 << qubit) != 0;
                let z = z_mask & (1 << qubit) != 0;
                match (x, z) {
                    (false, false) => true,
                    (true, false) => bases[qubit] == PauliBasis::X,
                    (false, true) => bases[qubit] == PauliBasis::Z,
                    (true, true) => bases[qubit] == PauliBasis::Y,
                }
            });
            if measured {
                diagonal.push(x_mask | z_mask);
            }
        }

        let outcomes: Vec<u32> = (0u32..(1 << width))
            .filter(|value| diagonal.iter().all(|mask| (value & mask).count_ones() % 2 == 0))
            .collect();
        let per_outcome = self.shots / outcomes.len() as u64;
        Histogram::from_counts(
            outcomes
                .into_iter()
                .map(|value| (bitstring(value, width), per_outcome)),
        )
    }
}

/// Maximally mixed statistics: every outcome equally likely for any setting.
pub struct UniformBackend {
    pub shots_per_outcome: u64,
}

impl MeasurementBackend for UniformBackend {
    fn run(&self, subsystem: &Subsystem, _setting: &MeasurementSetting) -> Result<Histogram, TeeError> {
        Ok(uniform_histogram(subsystem.len(), self.shots_per_outcome))
    }
}

/// Fails on one setting index and returns uniform counts elsewhere.
pub struct FailingBackend {
    pub fail_at: usize,
}

impl MeasurementBackend for FailingBackend {
    fn run(&self, subsystem: &Subsystem, setting: &MeasurementSetting) -> Result<Histogram, TeeError> {
        if setting.index() == self.fail_at {
            return Err(TeeError::Backend(
                ErrorInfo::new("device-offline", "simulated device failure")
                    .with_context("setting", setting.index().to_string()),
            ));
        }
        Ok(uniform_histogram(subsystem.len(), 4))
    }
}

/// Returns histograms one bit narrower than the subsystem.
pub struct TruncatingBackend;

impl MeasurementBackend for TruncatingBackend {
    fn run(&self, subsystem: &Subsystem, _setting: &MeasurementSetting) -> Result<Histogram, TeeError> {
        Ok(uniform_histogram(subsystem.len() - 1, 4))
    }
}

pub fn bitstring(value: u32, width: usize) -> String {
    (0..width)
        .map(|bit| if value & (1 << bit) != 0 { '1' } else { '0' })
        .collect()
}

pub fn uniform_histogram(width: usize, per_outcome: u64) -> Histogram {
    Histogram::from_counts((0u32..(1 << width)).map(|value| (bitstring(value, width), per_outcome)))
        .expect("uniform histogram")
}

pub fn histogram(counts: &[(&str, u64)]) -> Histogram {
    Histogram::from_counts(counts.iter().map(|&(outcome, count)| (outcome, count)))
        .expect("valid histogram")
}

pub fn counts_of(histogram: &Histogram) -> BTreeMap<String, u64> {
    histogram.counts().clone()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
