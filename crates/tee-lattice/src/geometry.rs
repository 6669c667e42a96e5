use std::fmt;

use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, TeeError};

/// Rectangular toric-code lattice with matching boundaries.
///
/// `x` counts columns and `y` counts rows. Even rows hold the `x - 1`
/// horizontal edges of a vertex row, odd rows hold the `x` vertical edges
/// between two vertex rows.
///
/// Deserialization goes through [`LatticeSize::new`], so a decoded size is
/// always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLatticeSize")]
pub struct LatticeSize {
    x: usize,
    y: usize,
}

#[derive(Deserialize)]
struct RawLatticeSize {
    x: usize,
    y: usize,
}

impl TryFrom<RawLatticeSize> for LatticeSize {
    type Error = TeeError;

    fn try_from(raw: RawLatticeSize) -> Result<Self, Self::Error> {
        LatticeSize::new(raw.x, raw.y)
    }
}

impl LatticeSize {
    /// Creates a lattice size, rejecting shapes where a row would hold no qubit.
    pub fn new(x: usize, y: usize) -> Result<Self, TeeError> {
        if x < 2 || y == 0 {
            let info = ErrorInfo::new(
                "invalid-lattice-size",
                "lattice needs at least two columns and one row",
            )
            .with_context("x", x.to_string())
            .with_context("y", y.to_string());
            return Err(TeeError::Geometry(info));
        }
        Ok(Self { x, y })
    }

    /// Number of columns.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Number of rows.
    pub fn y(&self) -> usize {
        self.y
    }

    /// Number of qubits on the given row.
    pub fn row_len(&self, row: usize) -> usize {
        if row % 2 == 0 {
            self.x - 1
        } else {
            self.x
        }
    }

    /// Total number of physical qubits on the lattice.
    pub fn num_qubits(&self) -> usize {
        (0..self.y).map(|row| self.row_len(row)).sum()
    }

    /// Iterates over every qubit coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.y).flat_map(move |row| {
            (0..self.row_len(row)).map(move |col| Coord::new(row as i64, col as i64))
        })
    }
}

/// Position of one physical qubit as `(row, col)`.
///
/// Components are signed so that offset patterns near the boundary produce
/// negative coordinates that [`is_inside`] rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index.
    pub row: i64,
    /// Column index within the row.
    pub col: i64,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Returns the coordinate shifted by the given offsets.
    pub const fn offset(self, d_row: i64, d_col: i64) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// Whether the coordinate sits on an even (horizontal edge) row.
    pub const fn on_even_row(&self) -> bool {
        self.row.rem_euclid(2) == 0
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i64, i64)> for Coord {
    fn from((row, col): (i64, i64)) -> Self {
        Self::new(row, col)
    }
}

/// Returns whether `coord` addresses a qubit of the lattice.
pub fn is_inside(size: LatticeSize, coord: Coord) -> bool {
    if coord.row < 0 || coord.row >= size.y as i64 || coord.col < 0 {
        return false;
    }
    if coord.on_even_row() {
        coord.col < size.x as i64 - 1
    } else {
        coord.col < size.x as i64
    }
}

/// Returns whether `coord` is one of the boundary-adjacent corner qubits.
///
/// Corner qubits sit next to truncated boundary stabilizers, so subsystems
/// containing them are excluded from entropy enumeration.
pub fn is_corner(size: LatticeSize, coord: Coord) -> bool {
    let last_row = size.y as i64 - 1;
    let x = size.x as i64;
    let outer = (coord.row == 0 || coord.row == last_row) && (coord.col == 0 || coord.col == x - 2);
    let inner =
        (coord.row == 1 || coord.row == last_row - 1) && (coord.col == 0 || coord.col == x - 1);
    outer || inner
}

/// Coordinates of the plaquette whose top edge sits on row `2 * x_index`,
/// column `y_index`, ordered top, left, right, bottom.
pub fn plaquette_coords(x_index: usize, y_index: usize) -> [Coord; 4] {
    let top = Coord::new(2 * x_index as i64, y_index as i64);
    [
        top,
        top.offset(1, 0),
        top.offset(1, 1),
        top.offset(2, 0),
    ]
}

/// Coordinates of the star around the vertex on row `2 * x_index`, column
/// `y_index`, ordered bottom, top, right, left.
///
/// Edges that fall outside the lattice are dropped, so boundary stars return
/// fewer than four coordinates. Callers treat those as invalid stabilizers.
pub fn star_coords(size: LatticeSize, x_index: usize, y_index: usize) -> Vec<Coord> {
    let vertex = Coord::new(2 * x_index as i64, y_index as i64);
    [
        vertex.offset(1, 0),
        vertex.offset(-1, 0),
        vertex,
        vertex.offset(0, -1),
    ]
    .into_iter()
    .filter(|&coord| is_inside(size, coord))
    .collect()
}

/// Every plaquette fully contained in the lattice, row-major.
pub fn plaquettes(size: LatticeSize) -> Vec<[Coord; 4]> {
    let mut result = Vec::new();
    for x_index in 0..size.y().div_ceil(2) {
        for y_index in 0..size.x() - 1 {
            let coords = plaquette_coords(x_index, y_index);
            if coords.iter().all(|&coord| is_inside(size, coord)) {
                result.push(coords);
            }
        }
    }
    result
}

/// Every four-edge star of the lattice, row-major.
pub fn stars(size: LatticeSize) -> Vec<[Coord; 4]> {
    let mut result = Vec::new();
    for x_index in 0..=size.y() / 2 {
        for y_index in 0..size.x() {
            if let Ok(coords) = <[Coord; 4]>::try_from(star_coords(size, x_index, y_index)) {
                result.push(coords);
            }
        }
    }
    result
}
