use std::collections::BTreeSet;

use tee_lattice::{
    enumerate_subsystems, plaquettes, star_coords, Coord, LatticeSize, RegionPartition, Subsystem,
    SubsystemShape,
};

/// Plaquettes plus every star with at least two edges, boundary stars included.
fn stabilizer_supports(size: LatticeSize) -> Vec<BTreeSet<Coord>> {
    let mut supports: Vec<BTreeSet<Coord>> = plaquettes(size)
        .into_iter()
        .map(|coords| coords.into_iter().collect())
        .collect();
    for x_index in 0..=size.y() / 2 {
        for y_index in 0..size.x() {
            let star = star_coords(size, x_index, y_index);
            if star.len() >= 2 {
                supports.push(star.into_iter().collect());
            }
        }
    }
    supports
}

/// Stabilizer-state entropy in bits: region size minus the generators it contains.
fn region_entropy(subsystem: &Subsystem, positions: &[usize], supports: &[BTreeSet<Coord>]) -> f64 {
    let region: BTreeSet<Coord> = positions.iter().map(|&p| subsystem.coords()[p]).collect();
    let contained = supports.iter().filter(|s| s.is_subset(&region)).count();
    (region.len() - contained) as f64
}

#[test]
fn canonical_partitions_reproduce_ideal_entropies() {
    for (x, y) in [(5, 7), (7, 9)] {
        let size = LatticeSize::new(x, y).unwrap();
        let supports = stabilizer_supports(size);
        for shape in SubsystemShape::ALL {
            let partition = shape.partition();
            let expected = shape.expected_entropy_bits();
            for subsystem in enumerate_subsystems(size, shape) {
                let one: Vec<f64> = partition
                    .singles()
                    .iter()
                    .map(|r| region_entropy(&subsystem, r, &supports))
                    .collect();
                let two: Vec<f64> = partition
                    .pairs()
                    .iter()
                    .map(|r| region_entropy(&subsystem, r, &supports))
                    .collect();
                let all: Vec<usize> = (0..subsystem.len()).collect();
                let three = region_entropy(&subsystem, &all, &supports);

                assert_eq!(one, expected.one.to_vec(), "{shape} at {}", subsystem.anchor());
                assert_eq!(two, expected.two.to_vec(), "{shape} at {}", subsystem.anchor());
                assert_eq!(three, expected.three, "{shape} at {}", subsystem.anchor());
            }
        }
    }
}

#[test]
fn every_shape_carries_one_bit_of_topological_entropy() {
    for shape in SubsystemShape::ALL {
        assert_eq!(shape.expected_entropy_bits().s_topo(), -1.0);
    }
}

#[test]
fn canonical_partitions_cover_every_position_once() {
    for shape in SubsystemShape::ALL {
        let partition = shape.partition();
        assert_eq!(partition.len(), shape.num_qubits());
        partition.validate_for(shape.num_qubits()).unwrap();
        let rebuilt = RegionPartition::new(
            partition.a().to_vec(),
            partition.b().to_vec(),
            partition.c().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, partition);
    }
}

#[test]
fn pairs_concatenate_first_named_region_first() {
    let partition = SubsystemShape::TwoByTwo.partition();
    assert_eq!(partition.pairs(), [vec![0, 1, 2], vec![0, 1, 3], vec![2, 3]]);
    assert_eq!(partition.singles(), [vec![0, 1], vec![2], vec![3]]);
}

#[test]
fn invalid_partitions_are_rejected() {
    let overlap = RegionPartition::new(vec![0, 1], vec![1], vec![2]).unwrap_err();
    assert_eq!(overlap.code(), "overlapping-regions");

    let empty = RegionPartition::new(vec![0], vec![], vec![2]).unwrap_err();
    assert_eq!(empty.code(), "empty-region");

    let partition = RegionPartition::new(vec![0], vec![1], vec![5]).unwrap();
    assert_eq!(
        partition.validate_for(4).unwrap_err().code(),
        "partition-out-of-range"
    );
}
