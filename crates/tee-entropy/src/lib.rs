#![deny(missing_docs)]
#![doc = "Randomized-measurement purity, Rényi-2 entropy and topological entanglement entropy estimation for toric-code patches."]

/// Pipeline configuration loading and validation.
pub mod config;
/// Measurement ensembles and their parallel collection.
pub mod ensemble;
/// Canonical hashing helpers.
pub mod hash;
/// Outcome histograms and marginal projection.
pub mod histogram;
/// Subsystem and lattice evaluation drivers.
pub mod pipeline;
/// Measurement protocols, settings and the backend seam.
pub mod protocol;
/// Randomized-measurement purity estimator.
pub mod purity;
/// Rényi-2 entropy over an ensemble.
pub mod renyi;
/// Serialized report types.
pub mod report;
/// Canonical JSON and YAML serde helpers.
pub mod serde;
/// Inclusion–exclusion combination of region entropies.
pub mod topo;

pub use config::{load_config, PipelineConfig};
pub use ensemble::{collect_ensemble, Ensemble};
pub use histogram::{ensemble_width, project_ensemble, BitOrder, Histogram};
pub use pipeline::{evaluate_ensemble, evaluate_lattice, evaluate_subsystem, planned_subsystems};
pub use protocol::{
    haar_settings, pauli_bases, HaarRotation, MeasurementBackend, MeasurementProtocol,
    MeasurementSetting, PauliBasis,
};
pub use purity::{purity, purity_with, SelfPairCorrection};
pub use renyi::{renyi2, to_bits};
pub use report::{LatticeReport, SubsystemReport};
pub use topo::{combine, topo_entropy, TopoEntropyReport};
