//! Testes integrados para qam-state

use crate::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::FRAC_1_SQRT_2;

fn random_circuit(register: &QubitRegister, len: usize, seed: u64) -> Circuit {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = register.len();
    (0..len)
        .map(|_| {
            let target = rng.gen_range(0..n);
            let gate = match rng.gen_range(0..4) {
                0 => Gate::x(),
                1 => Gate::h(),
                2 => Gate::phase(rng.gen_range(-3.0..3.0)),
                _ => Gate::ry(rng.gen_range(-3.0..3.0)),
            };
            let controls: Vec<QubitId> = (0..n)
                .filter(|&k| k != target && rng.gen_bool(0.3))
                .map(|k| register[k])
                .collect();
            GateOp::new(gate, register[target]).controlled_by(controls)
        })
        .collect()
}

#[test]
fn test_norm_preserved_over_random_sequences() {
    for seed in 0..8 {
        let mut qp = QuantumProcessor::seeded(seed);
        let r = qp.allocate(5).unwrap();
        let circuit = random_circuit(&r, 200, seed);

        circuit.execute(&mut qp).unwrap();
        assert!((qp.norm() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_circuit_then_adjoint_restores_state() {
    let mut qp = QuantumProcessor::seeded(1);
    let r = qp.allocate(4).unwrap();
    qp.apply(&GateOp::new(Gate::h(), r[0])).unwrap();
    let before = qp.amplitudes().to_vec();

    let circuit = random_circuit(&r, 60, 99);
    circuit.execute(&mut qp).unwrap();
    circuit.adjoint().execute(&mut qp).unwrap();

    for (a, b) in qp.amplitudes().iter().zip(&before) {
        assert!((a - b).norm() < 1e-9);
    }
}

#[test]
fn test_bell_pair() {
    let mut qp = QuantumProcessor::seeded(3);
    let r = qp.allocate(2).unwrap();
    let mut bell = Circuit::new();
    bell.add(GateOp::new(Gate::h(), r[0]))
        .add(GateOp::new(Gate::x(), r[1]).controlled_by([r[0]]));
    bell.execute(&mut qp).unwrap();

    let dist = qp.probabilities(&[r[0], r[1]]).unwrap();
    assert!((dist[0b00] - 0.5).abs() < 1e-12);
    assert!((dist[0b11] - 0.5).abs() < 1e-12);
    assert!((qp.amplitudes()[0b11].re - FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn test_controlled_gate_fixes_unsatisfied_subspace() {
    let mut qp = QuantumProcessor::seeded(0);
    let r = qp.allocate(3).unwrap();
    qp.apply(&GateOp::new(Gate::h(), r[0])).unwrap();
    qp.apply(&GateOp::new(Gate::h(), r[1])).unwrap();
    let before = qp.amplitudes().to_vec();

    qp.apply(&GateOp::new(Gate::ry(1.3), r[2]).controlled_by([r[0], r[1]]))
        .unwrap();

    for (i, (a, b)) in qp.amplitudes().iter().zip(&before).enumerate() {
        if i & 0b011 != 0b011 {
            assert!((a - b).norm() < 1e-12, "index {i} changed");
        }
    }
}

#[test]
fn test_toffoli_truth_table() {
    for input in 0..4usize {
        let mut qp = QuantumProcessor::seeded(0);
        let r = qp.allocate(3).unwrap();
        for k in 0..2 {
            if input >> k & 1 == 1 {
                qp.apply(&GateOp::new(Gate::x(), r[k])).unwrap();
            }
        }
        qp.apply(&GateOp::new(Gate::x(), r[2]).controlled_by([r[0], r[1]]))
            .unwrap();

        let expected = if input == 0b11 { 1.0 } else { 0.0 };
        assert!((qp.probability_one(r[2]).unwrap() - expected).abs() < 1e-12);
    }
}

#[test]
fn test_apply_gate_rejects_overlap() {
    let mut qp = QuantumProcessor::new();
    let r = qp.allocate(2).unwrap();
    let err = qp.apply_gate(&Gate::x(), &[r[0], r[1]], &[r[1]]).unwrap_err();
    assert!(matches!(err, QuantumError::InvalidIndex { .. }));
}

#[test]
fn test_apply_gate_multiple_targets() {
    let mut qp = QuantumProcessor::new();
    let r = qp.allocate(3).unwrap();
    qp.apply_gate(&Gate::x(), &[r[0], r[1], r[2]], &[]).unwrap();
    assert!((qp.amplitudes()[0b111].re - 1.0).abs() < 1e-12);
}

#[test]
fn test_dirty_release_rejected() {
    let mut qp = QuantumProcessor::seeded(5);
    let r = qp.allocate(2).unwrap();
    qp.apply(&GateOp::new(Gate::x(), r[1])).unwrap();

    let err = qp.release(&r).unwrap_err();
    assert!(matches!(err, QuantumError::DirtyRelease { qubit, .. } if qubit == r[1]));
}

#[test]
fn test_reset_then_release_is_clean() {
    let mut qp = QuantumProcessor::seeded(5);
    let r = qp.allocate(2).unwrap();
    qp.apply(&GateOp::new(Gate::h(), r[0])).unwrap();
    qp.apply(&GateOp::new(Gate::x(), r[1])).unwrap();

    qp.reset_all(&r).unwrap();
    qp.release(&r).unwrap();
    assert_eq!(qp.live_qubits(), 0);
}

#[test]
fn test_released_slots_are_reused() {
    let mut qp = QuantumProcessor::seeded(5);
    let a = qp.allocate(2).unwrap();
    let _b = qp.allocate(1).unwrap();
    qp.release(&a).unwrap();

    let c = qp.allocate(2).unwrap();
    assert_eq!(c, a);
    assert_eq!(qp.num_qubits(), 3);
}

#[test]
fn test_with_register_cleans_up_on_error() {
    let mut qp = QuantumProcessor::seeded(11);

    let result: QuantumResult<()> = qp.with_register(2, |qp, r| {
        qp.apply(&GateOp::new(Gate::x(), r[0]))?;
        qp.apply(&GateOp::new(Gate::h(), r[1]))?;
        Err(QuantumError::InvalidState("boom".into()))
    });

    assert_eq!(result, Err(QuantumError::InvalidState("boom".into())));
    assert_eq!(qp.live_qubits(), 0);
    // os slots voltam limpos
    let r = qp.allocate(2).unwrap();
    assert!(qp.probability_one(r[0]).unwrap() < 1e-12);
    assert!(qp.probability_one(r[1]).unwrap() < 1e-12);
}

#[test]
fn test_with_register_returns_value() {
    let mut qp = QuantumProcessor::seeded(11);
    let outcome = qp
        .with_register(1, |qp, r| {
            qp.apply(&GateOp::new(Gate::x(), r[0]))?;
            qp.measure(r[0])
        })
        .unwrap();
    assert!(outcome);
    assert_eq!(qp.live_qubits(), 0);
}

#[test]
fn test_measurement_reproducible_with_same_seed() {
    let run = |seed: u64| {
        let mut qp = QuantumProcessor::seeded(seed);
        let r = qp.allocate(4).unwrap();
        (0..32)
            .map(|_| {
                qp.apply_gate(&Gate::h(), r.as_slice(), &[]).unwrap();
                qp.measure_all(&r).unwrap()
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(2024), run(2024));
    assert_ne!(run(2024), run(2025));
}

#[test]
fn test_measurement_statistics() {
    let mut qp = QuantumProcessor::seeded(77);
    let r = qp.allocate(1).unwrap();
    let shots = 4000;
    let ones = (0..shots)
        .filter(|_| {
            qp.apply(&GateOp::new(Gate::ry(std::f64::consts::FRAC_PI_2), r[0]))
                .unwrap();
            qp.measure(r[0]).unwrap()
        })
        .count();

    let freq = ones as f64 / shots as f64;
    assert!((freq - 0.5).abs() < 0.05, "freq = {freq}");
}

#[test]
fn test_injected_rng() {
    let rng = StdRng::seed_from_u64(9);
    let mut qp = QuantumProcessor::with_rng(QuantumConfig::default(), rng);
    let r = qp.allocate(1).unwrap();
    qp.apply(&GateOp::new(Gate::h(), r[0])).unwrap();
    qp.measure(r[0]).unwrap();
    assert!(qp.probability_one(r[0]).unwrap() < 1e-12);
}

#[test]
fn test_report_lists_superposition() {
    let mut qp = QuantumProcessor::seeded(0);
    let r = qp.allocate(2).unwrap();
    qp.apply(&GateOp::new(Gate::h(), r[1])).unwrap();

    let report = qp.report(1e-6);
    let bits: Vec<&str> = report.terms.iter().map(|t| t.bits.as_str()).collect();
    assert_eq!(bits, vec!["00", "01"]);
}
