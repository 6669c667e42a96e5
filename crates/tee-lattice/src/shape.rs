use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, TeeError};

use crate::geometry::{is_corner, is_inside, Coord, LatticeSize};
use crate::partition::{EntropyVector, RegionPartition};

/// Subsystem patch shapes used for topological entropy estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubsystemShape {
    /// A single plaquette (even anchor row) or star (odd anchor row).
    #[serde(rename = "2x2")]
    TwoByTwo,
    /// A stabilizer plus the opposite-type stabilizer below and to the left.
    #[serde(rename = "2x3-left")]
    TwoByThreeLeft,
    /// A stabilizer plus the opposite-type stabilizer below and to the right.
    #[serde(rename = "2x3-right")]
    TwoByThreeRight,
    /// Two stars and two plaquettes around a central vertical edge.
    #[serde(rename = "3x3")]
    ThreeByThree,
}

impl SubsystemShape {
    /// All supported shapes in canonical order.
    pub const ALL: [SubsystemShape; 4] = [
        SubsystemShape::TwoByTwo,
        SubsystemShape::TwoByThreeLeft,
        SubsystemShape::TwoByThreeRight,
        SubsystemShape::ThreeByThree,
    ];

    /// Stable label used in configuration files and reports.
    pub fn label(&self) -> &'static str {
        match self {
            SubsystemShape::TwoByTwo => "2x2",
            SubsystemShape::TwoByThreeLeft => "2x3-left",
            SubsystemShape::TwoByThreeRight => "2x3-right",
            SubsystemShape::ThreeByThree => "3x3",
        }
    }

    /// Number of qubits in a subsystem of this shape.
    pub fn num_qubits(&self) -> usize {
        match self {
            SubsystemShape::TwoByTwo => 4,
            SubsystemShape::TwoByThreeLeft | SubsystemShape::TwoByThreeRight => 6,
            SubsystemShape::ThreeByThree => 9,
        }
    }

    /// Canonical `(A, B, C)` split of the shape's bit positions.
    pub fn partition(&self) -> RegionPartition {
        let (a, b, c): (&[usize], &[usize], &[usize]) = match self {
            SubsystemShape::TwoByTwo => (&[0, 1], &[2], &[3]),
            SubsystemShape::TwoByThreeLeft => (&[3, 5], &[0, 1], &[2, 4]),
            SubsystemShape::TwoByThreeRight => (&[4, 5], &[0, 2], &[1, 3]),
            SubsystemShape::ThreeByThree => (&[5, 7, 8], &[0, 1, 2], &[3, 4, 6]),
        };
        RegionPartition::from_static(a, b, c)
    }

    /// Ideal Rényi-2 entropies, in bits, of a toric-code ground state split
    /// with [`SubsystemShape::partition`].
    pub fn expected_entropy_bits(&self) -> EntropyVector {
        match self {
            SubsystemShape::TwoByTwo => EntropyVector::new([2.0, 1.0, 1.0], [3.0, 3.0, 2.0], 3.0),
            SubsystemShape::TwoByThreeLeft | SubsystemShape::TwoByThreeRight => {
                EntropyVector::new([2.0, 2.0, 2.0], [4.0, 4.0, 3.0], 4.0)
            }
            SubsystemShape::ThreeByThree => {
                EntropyVector::new([3.0, 3.0, 3.0], [6.0, 5.0, 4.0], 5.0)
            }
        }
    }

    /// Row-major coordinate pattern anchored at `anchor`.
    ///
    /// The neighbour offsets depend on the anchor row parity because even rows
    /// are shifted half a cell relative to odd rows. Returns `None` when the
    /// shape has no pattern for that parity.
    pub fn pattern(&self, anchor: Coord) -> Option<Vec<Coord>> {
        let even = anchor.on_even_row();
        let offsets: &[(i64, i64)] = match (self, even) {
            (SubsystemShape::TwoByTwo, true) => &[(0, 0), (1, 0), (1, 1), (2, 0)],
            (SubsystemShape::TwoByTwo, false) => &[(0, 0), (1, -1), (1, 0), (2, 0)],
            (SubsystemShape::TwoByThreeLeft, true) => {
                &[(0, 0), (1, 0), (1, 1), (2, -1), (2, 0), (3, 0)]
            }
            (SubsystemShape::TwoByThreeLeft, false) => {
                &[(0, 0), (1, -1), (1, 0), (2, -1), (2, 0), (3, -1)]
            }
            (SubsystemShape::TwoByThreeRight, true) => {
                &[(0, 0), (1, 0), (1, 1), (2, 0), (2, 1), (3, 1)]
            }
            (SubsystemShape::TwoByThreeRight, false) => {
                &[(0, 0), (1, -1), (1, 0), (2, 0), (2, 1), (3, 0)]
            }
            // The diamond needs a vertical edge on top; even anchors have none.
            (SubsystemShape::ThreeByThree, true) => return None,
            (SubsystemShape::ThreeByThree, false) => &[
                (0, 0),
                (1, -1),
                (1, 0),
                (2, -1),
                (2, 0),
                (2, 1),
                (3, -1),
                (3, 0),
                (4, 0),
            ],
        };
        Some(
            offsets
                .iter()
                .map(|&(d_row, d_col)| anchor.offset(d_row, d_col))
                .collect(),
        )
    }
}

impl fmt::Display for SubsystemShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SubsystemShape {
    type Err = TeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubsystemShape::ALL
            .into_iter()
            .find(|shape| shape.label() == s)
            .ok_or_else(|| {
                TeeError::Geometry(
                    ErrorInfo::new("unknown-shape", "unrecognised subsystem shape")
                        .with_context("shape", s)
                        .with_hint("expected one of 2x2, 2x3-left, 2x3-right, 3x3"),
                )
            })
    }
}

/// Ordered set of qubits measured jointly in one circuit.
///
/// The coordinate order fixes which character of an outcome bitstring belongs
/// to which qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subsystem {
    shape: SubsystemShape,
    anchor: Coord,
    coords: Vec<Coord>,
}

impl Subsystem {
    /// Builds the subsystem of `shape` anchored at `anchor`.
    ///
    /// Fails when the anchor or any derived coordinate lies outside the
    /// lattice, or when the shape has no pattern for the anchor row parity.
    /// Corner qubits are allowed here; see [`Subsystem::touches_corner`].
    pub fn at(size: LatticeSize, shape: SubsystemShape, anchor: Coord) -> Result<Self, TeeError> {
        if !is_inside(size, anchor) {
            let info = ErrorInfo::new("anchor-out-of-range", "subsystem anchor is off the lattice")
                .with_context("anchor", anchor.to_string())
                .with_context("shape", shape.label());
            return Err(TeeError::Geometry(info));
        }
        let coords = shape.pattern(anchor).ok_or_else(|| {
            TeeError::Geometry(
                ErrorInfo::new(
                    "unsupported-anchor-parity",
                    "shape has no pattern for this anchor row",
                )
                .with_context("anchor", anchor.to_string())
                .with_context("shape", shape.label()),
            )
        })?;
        if let Some(outside) = coords.iter().find(|&&coord| !is_inside(size, coord)) {
            let info = ErrorInfo::new(
                "subsystem-out-of-range",
                "subsystem extends beyond the lattice",
            )
            .with_context("anchor", anchor.to_string())
            .with_context("coord", outside.to_string())
            .with_context("shape", shape.label());
            return Err(TeeError::Geometry(info));
        }
        Ok(Self {
            shape,
            anchor,
            coords,
        })
    }

    /// Shape of the subsystem.
    pub fn shape(&self) -> SubsystemShape {
        self.shape
    }

    /// Anchor coordinate (first qubit of the pattern).
    pub fn anchor(&self) -> Coord {
        self.anchor
    }

    /// Qubit coordinates in bit-position order.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Number of qubits.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the subsystem has no qubits.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Whether any qubit is a boundary corner.
    pub fn touches_corner(&self, size: LatticeSize) -> bool {
        self.coords.iter().any(|&coord| is_corner(size, coord))
    }

    /// Maps coordinates to bit positions within this subsystem.
    pub fn positions_of(&self, coords: &[Coord]) -> Result<Vec<usize>, TeeError> {
        coords
            .iter()
            .map(|coord| {
                self.coords
                    .iter()
                    .position(|candidate| candidate == coord)
                    .ok_or_else(|| {
                        TeeError::Geometry(
                            ErrorInfo::new(
                                "coord-not-in-subsystem",
                                "coordinate is not measured by this subsystem",
                            )
                            .with_context("coord", coord.to_string())
                            .with_context("anchor", self.anchor.to_string()),
                        )
                    })
            })
            .collect()
    }
}

/// Enumerates every non-corner subsystem of `shape` in row-major anchor order.
pub fn enumerate_subsystems(size: LatticeSize, shape: SubsystemShape) -> Vec<Subsystem> {
    let mut result = Vec::new();
    for anchor in size.coords() {
        let Some(coords) = shape.pattern(anchor) else {
            continue;
        };
        let valid = coords
            .iter()
            .all(|&coord| is_inside(size, coord) && !is_corner(size, coord));
        if valid {
            result.push(Subsystem {
                shape,
                anchor,
                coords,
            });
        }
    }
    result
}

/// Enumerates both 2x3 orientations, left shapes first.
pub fn enumerate_two_by_three(size: LatticeSize) -> Vec<Subsystem> {
    let mut result = enumerate_subsystems(size, SubsystemShape::TwoByThreeLeft);
    result.extend(enumerate_subsystems(size, SubsystemShape::TwoByThreeRight));
    result
}
