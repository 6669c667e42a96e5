use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, RunProvenance, SchemaVersion, TeeError};
use tee_lattice::{Coord, LatticeSize, SubsystemShape};

use crate::protocol::MeasurementProtocol;
use crate::purity::SelfPairCorrection;
use crate::renyi::to_bits;
use crate::serde::{from_json_slice, to_canonical_json_bytes};
use crate::topo::TopoEntropyReport;

/// Entropy estimate of one subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemReport {
    /// Shape of the subsystem.
    pub shape: SubsystemShape,
    /// Anchor coordinate.
    pub anchor: Coord,
    /// Measured coordinates in bit-position order.
    pub coords: Vec<Coord>,
    /// Number of measurement settings in the ensemble.
    pub settings: usize,
    /// Region entropies and their topological combination.
    pub entropy: TopoEntropyReport,
}

/// Lattice-wide entropy report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeReport {
    /// Schema of the serialized report.
    pub schema_version: SchemaVersion,
    /// Configuration hash, seed and tool versions.
    pub provenance: RunProvenance,
    /// Lattice dimensions.
    pub lattice: LatticeSize,
    /// Measurement protocol used for every subsystem.
    pub protocol: MeasurementProtocol,
    /// Self-pair handling of the purity estimator.
    pub correction: SelfPairCorrection,
    /// Per-subsystem estimates in enumeration order.
    pub subsystems: Vec<SubsystemReport>,
    /// Mean topological entropy in nats, absent when no subsystem fits.
    pub mean_s_topo: Option<f64>,
}

impl LatticeReport {
    /// Mean topological entropy in bits.
    pub fn mean_s_topo_bits(&self) -> Option<f64> {
        self.mean_s_topo.map(to_bits)
    }

    /// Canonical JSON bytes of the report.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, TeeError> {
        to_canonical_json_bytes(self)
    }

    /// Writes the canonical JSON form to `path`.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), TeeError> {
        let bytes = self.to_canonical_json()?;
        fs::write(path.as_ref(), bytes).map_err(|err| {
            TeeError::Serde(
                ErrorInfo::new("report-write", err.to_string())
                    .with_context("path", path.as_ref().display().to_string()),
            )
        })
    }

    /// Reads a report previously written with [`LatticeReport::write_json`].
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self, TeeError> {
        let bytes = fs::read(path.as_ref()).map_err(|err| {
            TeeError::Serde(
                ErrorInfo::new("report-read", err.to_string())
                    .with_context("path", path.as_ref().display().to_string()),
            )
        })?;
        from_json_slice(&bytes)
    }
}

/// Mean of the per-subsystem topological entropies, in nats.
pub fn mean_s_topo(reports: &[SubsystemReport]) -> Option<f64> {
    if reports.is_empty() {
        return None;
    }
    let total: f64 = reports.iter().map(|report| report.entropy.s_topo).sum();
    Some(total / reports.len() as f64)
}
