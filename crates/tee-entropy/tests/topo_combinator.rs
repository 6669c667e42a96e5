mod common;

use std::f64::consts::LN_2;

use common::{assert_close, histogram, StabilizerBackend};
use tee_entropy::{
    collect_ensemble, combine, renyi2, topo_entropy, BitOrder, Histogram, MeasurementProtocol,
    SelfPairCorrection,
};
use tee_lattice::{enumerate_subsystems, LatticeSize, RegionPartition, SubsystemShape};

const SHOTS: u64 = 1 << 20;

fn ground_state_ensemble(shape: SubsystemShape, which: usize) -> Vec<Histogram> {
    let lattice = LatticeSize::new(5, 7).unwrap();
    let backend = StabilizerBackend::new(lattice, SHOTS);
    let subsystem = enumerate_subsystems(lattice, shape).swap_remove(which);
    collect_ensemble(
        &backend,
        &subsystem,
        &MeasurementProtocol::Pauli,
        0,
        BitOrder::AsWritten,
    )
    .unwrap()
    .histograms()
    .to_vec()
}

fn assert_bits(actual: [f64; 3], expected: [f64; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert_close(*a, e, 0.01);
    }
}

#[test]
fn two_by_two_ground_state_regression() {
    let ensemble = ground_state_ensemble(SubsystemShape::TwoByTwo, 0);
    assert_eq!(ensemble.len(), 81);
    let report = topo_entropy(
        &ensemble,
        &SubsystemShape::TwoByTwo.partition(),
        SelfPairCorrection::LeaveOneOut,
    )
    .unwrap();
    let bits = report.bits();
    assert_bits(bits.one, [2.0, 1.0, 1.0]);
    assert_bits(bits.two, [3.0, 3.0, 2.0]);
    assert_close(bits.three, 3.0, 0.01);
    assert_close(report.s_topo / LN_2, -1.0, 0.01);
    assert_close(report.s_topo_bits(), -1.0, 0.01);
}

#[test]
fn two_by_three_ground_state_vector() {
    for shape in [SubsystemShape::TwoByThreeLeft, SubsystemShape::TwoByThreeRight] {
        let ensemble = ground_state_ensemble(shape, 1);
        assert_eq!(ensemble.len(), 729);
        let report =
            topo_entropy(&ensemble, &shape.partition(), SelfPairCorrection::LeaveOneOut).unwrap();
        let bits = report.bits();
        let expected = shape.expected_entropy_bits();
        assert_bits(bits.one, expected.one);
        assert_bits(bits.two, expected.two);
        assert_close(bits.three, expected.three, 0.01);
        assert_close(report.s_topo_bits(), -1.0, 0.01);
    }
}

#[test]
fn swapping_a_and_b_leaves_s_topo_unchanged() {
    let ensemble: Vec<_> = (0..12u64)
        .map(|k| {
            histogram(&[
                ("0000", 10 + k),
                ("0101", 7),
                ("1100", 3 + k % 4),
                ("1011", 5),
                ("0110", 1 + k),
            ])
        })
        .collect();
    let forward = RegionPartition::new(vec![0, 1], vec![2], vec![3]).unwrap();
    let swapped = RegionPartition::new(vec![2], vec![0, 1], vec![3]).unwrap();
    let a = topo_entropy(&ensemble, &forward, SelfPairCorrection::LeaveOneOut).unwrap();
    let b = topo_entropy(&ensemble, &swapped, SelfPairCorrection::LeaveOneOut).unwrap();
    assert_close(a.s_topo, b.s_topo, 1e-9);
}

#[test]
fn wrong_pair_grouping_changes_the_result() {
    let ensemble = ground_state_ensemble(SubsystemShape::TwoByTwo, 0);
    let partition = SubsystemShape::TwoByTwo.partition();
    let report = topo_entropy(&ensemble, &partition, SelfPairCorrection::LeaveOneOut).unwrap();

    let entropy = |positions: &[usize]| {
        let projected: Vec<_> = ensemble.iter().map(|h| h.project(positions).unwrap()).collect();
        renyi2(&projected, SelfPairCorrection::LeaveOneOut).unwrap()
    };
    let [ab, ac, _bc] = partition.pairs();
    let misgrouped = combine(&report.one, &[entropy(&ab), entropy(&ab), entropy(&ac)], &[report.three]);
    assert!((misgrouped - report.s_topo).abs() > 0.5);
    assert_close(misgrouped / LN_2, -2.0, 0.02);
}

#[test]
fn combine_is_plain_inclusion_exclusion() {
    assert_eq!(combine(&[2.0, 1.0, 1.0], &[3.0, 3.0, 2.0], &[3.0]), -1.0);
    assert_eq!(combine(&[], &[], &[]), 0.0);
}

#[test]
fn partitions_wider_than_the_ensemble_are_rejected() {
    let ensemble = vec![histogram(&[("000", 4), ("111", 4)])];
    let err = topo_entropy(
        &ensemble,
        &SubsystemShape::TwoByTwo.partition(),
        SelfPairCorrection::LeaveOneOut,
    )
    .unwrap_err();
    assert_eq!(err.code(), "partition-out-of-range");
}

#[test]
fn mixed_width_ensembles_are_rejected() {
    let ensemble = vec![histogram(&[("0000", 4)]), histogram(&[("000", 4)])];
    let err = topo_entropy(
        &ensemble,
        &SubsystemShape::TwoByTwo.partition(),
        SelfPairCorrection::LeaveOneOut,
    )
    .unwrap_err();
    assert_eq!(err.code(), "inconsistent-ensemble-width");
    let err = topo_entropy(&[], &SubsystemShape::TwoByTwo.partition(), SelfPairCorrection::Naive)
        .unwrap_err();
    assert_eq!(err.code(), "empty-ensemble");
}
