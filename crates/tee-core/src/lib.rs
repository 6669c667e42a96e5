#![deny(missing_docs)]
#![doc = "Shared error taxonomy, deterministic seeding and provenance types for the topological entanglement entropy estimator."]

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, TeeError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
