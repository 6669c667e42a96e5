#![deny(missing_docs)]
#![doc = "Toric-code lattice geometry: qubit coordinates, stabilizer supports and the subsystem shapes used for topological entropy estimates."]

/// Lattice sizes, coordinates, and inside/corner predicates.
pub mod geometry;
/// Region partitions and expected entropy vectors.
pub mod partition;
/// Subsystem shapes, patterns and the non-corner enumerator.
pub mod shape;

pub use geometry::{
    is_corner, is_inside, plaquette_coords, plaquettes, star_coords, stars, Coord, LatticeSize,
};
pub use partition::{EntropyVector, RegionPartition};
pub use shape::{enumerate_subsystems, enumerate_two_by_three, Subsystem, SubsystemShape};
