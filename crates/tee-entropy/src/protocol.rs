use std::f64::consts::TAU;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tee_core::{derive_substream_seed, RngHandle, TeeError};
use tee_lattice::Subsystem;

use crate::histogram::Histogram;

/// Family of randomized measurement settings applied to a subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MeasurementProtocol {
    /// Every product of single-qubit Pauli bases, `3^k` settings.
    #[default]
    Pauli,
    /// Independent Haar-random single-qubit rotations.
    Haar {
        /// Number of random settings.
        draws: usize,
    },
}

impl MeasurementProtocol {
    /// Number of settings generated for a `num_qubits` subsystem.
    ///
    /// Saturates at `usize::MAX` for Pauli ensembles too large to enumerate.
    pub fn num_settings(&self, num_qubits: usize) -> usize {
        match self {
            MeasurementProtocol::Pauli => u32::try_from(num_qubits)
                .ok()
                .and_then(|k| 3usize.checked_pow(k))
                .unwrap_or(usize::MAX),
            MeasurementProtocol::Haar { draws } => *draws,
        }
    }

    /// Settings in index order for a `num_qubits` subsystem.
    ///
    /// `master_seed` only affects the Haar protocol.
    pub fn settings(&self, num_qubits: usize, master_seed: u64) -> Vec<MeasurementSetting> {
        match self {
            MeasurementProtocol::Pauli => pauli_bases(num_qubits)
                .into_iter()
                .enumerate()
                .map(|(index, bases)| MeasurementSetting::Pauli { index, bases })
                .collect(),
            MeasurementProtocol::Haar { draws } => haar_settings(num_qubits, *draws, master_seed),
        }
    }
}

/// Single-qubit Pauli measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauliBasis {
    /// `X` eigenbasis.
    X,
    /// `Y` eigenbasis.
    Y,
    /// `Z` eigenbasis.
    Z,
}

impl PauliBasis {
    /// Bases in lexicographic order.
    pub const ALL: [PauliBasis; 3] = [PauliBasis::X, PauliBasis::Y, PauliBasis::Z];

    /// Lower-case letter of the basis.
    pub fn as_char(&self) -> char {
        match self {
            PauliBasis::X => 'x',
            PauliBasis::Y => 'y',
            PauliBasis::Z => 'z',
        }
    }
}

/// Every string of `{x, y, z}^k` in lexicographic order, first qubit most
/// significant.
pub fn pauli_bases(num_qubits: usize) -> Vec<Vec<PauliBasis>> {
    let total = MeasurementProtocol::Pauli.num_settings(num_qubits);
    (0..total).map(|index| pauli_basis_at(index, num_qubits)).collect()
}

fn pauli_basis_at(index: usize, num_qubits: usize) -> Vec<PauliBasis> {
    let mut bases = vec![PauliBasis::X; num_qubits];
    let mut rest = index;
    for slot in bases.iter_mut().rev() {
        *slot = PauliBasis::ALL[rest % 3];
        rest /= 3;
    }
    bases
}

/// Euler angles of a single-qubit `U3(theta, phi, lambda)` rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaarRotation {
    /// Polar angle in `[0, π]`.
    pub theta: f64,
    /// First azimuthal angle in `[0, 2π)`.
    pub phi: f64,
    /// Second azimuthal angle in `[0, 2π)`.
    pub lambda: f64,
}

impl HaarRotation {
    /// Draws a rotation distributed according to the Haar measure on SU(2).
    ///
    /// `theta` has density `sin(θ) / 2`, obtained as `arccos(1 − 2u)`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let u: f64 = rng.gen();
        Self {
            theta: (1.0 - 2.0 * u).acos(),
            phi: rng.gen::<f64>() * TAU,
            lambda: rng.gen::<f64>() * TAU,
        }
    }

    /// Matrix entries of `U3(theta, phi, lambda)` as `(re, im)` pairs, row-major.
    pub fn unitary(&self) -> [[(f64, f64); 2]; 2] {
        let (sin, cos) = (self.theta / 2.0).sin_cos();
        let phase = |angle: f64, scale: f64| (scale * angle.cos(), scale * angle.sin());
        let top_right = phase(self.lambda, sin);
        [
            [(cos, 0.0), (-top_right.0, -top_right.1)],
            [phase(self.phi, sin), phase(self.phi + self.lambda, cos)],
        ]
    }
}

/// Haar settings for `draws` draws, each seeded from its own substream.
pub fn haar_settings(num_qubits: usize, draws: usize, master_seed: u64) -> Vec<MeasurementSetting> {
    (0..draws)
        .map(|draw| {
            let seed = derive_substream_seed(master_seed, draw as u64);
            let mut rng = RngHandle::from_seed(seed);
            let rotations = (0..num_qubits)
                .map(|_| HaarRotation::sample(&mut rng))
                .collect();
            MeasurementSetting::Haar {
                draw,
                seed,
                rotations,
            }
        })
        .collect()
}

/// One measurement setting: the local basis change applied before a
/// computational-basis readout of every subsystem qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MeasurementSetting {
    /// Product of Pauli bases, one per qubit in subsystem order.
    Pauli {
        /// Lexicographic index of the basis string.
        index: usize,
        /// Basis per qubit.
        bases: Vec<PauliBasis>,
    },
    /// Product of Haar-random rotations, one per qubit in subsystem order.
    Haar {
        /// Draw index.
        draw: usize,
        /// Substream seed the rotations were sampled from.
        seed: u64,
        /// Rotation per qubit.
        rotations: Vec<HaarRotation>,
    },
}

impl MeasurementSetting {
    /// Position of the setting within its protocol.
    pub fn index(&self) -> usize {
        match self {
            MeasurementSetting::Pauli { index, .. } => *index,
            MeasurementSetting::Haar { draw, .. } => *draw,
        }
    }

    /// Number of qubits the setting addresses.
    pub fn num_qubits(&self) -> usize {
        match self {
            MeasurementSetting::Pauli { bases, .. } => bases.len(),
            MeasurementSetting::Haar { rotations, .. } => rotations.len(),
        }
    }
}

impl fmt::Display for MeasurementSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementSetting::Pauli { bases, .. } => {
                bases.iter().try_for_each(|basis| write!(f, "{}", basis.as_char()))
            }
            MeasurementSetting::Haar { draw, .. } => write!(f, "haar-{draw}"),
        }
    }
}

/// Source of measurement histograms for a subsystem.
///
/// Implementations assemble and execute the circuit for `setting` on the
/// qubits of `subsystem` (in coordinate order) and return the outcome counts.
/// Errors are propagated to the caller unchanged.
pub trait MeasurementBackend: Send + Sync {
    /// Runs one setting and returns its outcome counts.
    fn run(&self, subsystem: &Subsystem, setting: &MeasurementSetting) -> Result<Histogram, TeeError>;
}
