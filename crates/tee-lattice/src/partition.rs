use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tee_core::{ErrorInfo, TeeError};

/// Three disjoint groups of bit positions `(A, B, C)` within a subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionPartition {
    a: Vec<usize>,
    b: Vec<usize>,
    c: Vec<usize>,
}

impl RegionPartition {
    /// Creates a partition, rejecting empty or overlapping regions.
    pub fn new(a: Vec<usize>, b: Vec<usize>, c: Vec<usize>) -> Result<Self, TeeError> {
        let mut seen = BTreeSet::new();
        for (label, region) in [("A", &a), ("B", &b), ("C", &c)] {
            if region.is_empty() {
                let info = ErrorInfo::new("empty-region", "partition regions must be non-empty")
                    .with_context("region", label);
                return Err(TeeError::Geometry(info));
            }
            for &position in region.iter() {
                if !seen.insert(position) {
                    let info = ErrorInfo::new(
                        "overlapping-regions",
                        "bit position appears in more than one region",
                    )
                    .with_context("region", label)
                    .with_context("position", position.to_string());
                    return Err(TeeError::Geometry(info));
                }
            }
        }
        Ok(Self { a, b, c })
    }

    pub(crate) fn from_static(a: &[usize], b: &[usize], c: &[usize]) -> Self {
        Self {
            a: a.to_vec(),
            b: b.to_vec(),
            c: c.to_vec(),
        }
    }

    /// Positions of region A.
    pub fn a(&self) -> &[usize] {
        &self.a
    }

    /// Positions of region B.
    pub fn b(&self) -> &[usize] {
        &self.b
    }

    /// Positions of region C.
    pub fn c(&self) -> &[usize] {
        &self.c
    }

    /// Single regions in the order `A, B, C`.
    pub fn singles(&self) -> [Vec<usize>; 3] {
        [self.a.clone(), self.b.clone(), self.c.clone()]
    }

    /// Pairwise unions in the fixed order `A∪B, A∪C, B∪C`.
    ///
    /// Each union lists the first-named region's positions followed by the
    /// second's.
    pub fn pairs(&self) -> [Vec<usize>; 3] {
        [
            concat(&self.a, &self.b),
            concat(&self.a, &self.c),
            concat(&self.b, &self.c),
        ]
    }

    /// Total number of positions covered by the three regions.
    pub fn len(&self) -> usize {
        self.a.len() + self.b.len() + self.c.len()
    }

    /// Whether the partition covers no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest position referenced by any region.
    pub fn max_position(&self) -> Option<usize> {
        self.a
            .iter()
            .chain(&self.b)
            .chain(&self.c)
            .copied()
            .max()
    }

    /// Checks that every position addresses a bit of a `width`-qubit subsystem.
    pub fn validate_for(&self, width: usize) -> Result<(), TeeError> {
        match self.max_position() {
            Some(max) if max >= width => {
                let info = ErrorInfo::new(
                    "partition-out-of-range",
                    "partition references a bit outside the subsystem",
                )
                .with_context("position", max.to_string())
                .with_context("width", width.to_string());
                Err(TeeError::Geometry(info))
            }
            _ => Ok(()),
        }
    }
}

fn concat(first: &[usize], second: &[usize]) -> Vec<usize> {
    let mut joined = Vec::with_capacity(first.len() + second.len());
    joined.extend_from_slice(first);
    joined.extend_from_slice(second);
    joined
}

/// `(one, two, three)` Rényi-2 entropy vector of a partitioned subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyVector {
    /// Entropies of `A`, `B`, `C`.
    pub one: [f64; 3],
    /// Entropies of `A∪B`, `A∪C`, `B∪C`.
    pub two: [f64; 3],
    /// Entropy of the whole subsystem.
    pub three: f64,
}

impl EntropyVector {
    /// Creates an entropy vector.
    pub const fn new(one: [f64; 3], two: [f64; 3], three: f64) -> Self {
        Self { one, two, three }
    }

    /// Inclusion–exclusion combination of the stored entropies.
    pub fn s_topo(&self) -> f64 {
        self.one.iter().sum::<f64>() - self.two.iter().sum::<f64>() + self.three
    }
}
