//! Property-based tests tying the two engines together.
//!
//! On circuits built from X, Y, Z and SWAP (with arbitrary controls), a basis
//! state stays a basis state. The fast engine's final values must pick out the
//! single nonzero dense amplitude, and that amplitude must be `e^{iΣφ}` where
//! `Σφ` is the sum of the fast engine's per-qubit phases.

use num_complex::Complex64;
use proptest::prelude::*;

use qcheck_ir::{Circuit, GateName, GateRecord, QubitId};
use qcheck_sim::dense::basis_state;
use qcheck_sim::{DenseEngine, PauliSimulator, PauliState, QubitOrder};

/// A raw gate description; invalid combinations are dropped on insertion.
#[derive(Debug, Clone)]
struct GateOp {
    name: GateName,
    targets: Vec<u32>,
    controls: Vec<(u32, u8)>,
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let (controls, values): (Vec<QubitId>, Vec<u8>) = self
            .controls
            .into_iter()
            .map(|(q, v)| (QubitId(q), v))
            .unzip();
        let record = GateRecord::new(self.name, self.targets.into_iter().map(QubitId))
            .with_controls(controls, values);
        let _ = circuit.add_gate(record);
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let name = prop_oneof![
        Just(GateName::X),
        Just(GateName::Y),
        Just(GateName::Z),
        Just(GateName::Swap),
    ];
    (
        name,
        prop::collection::vec(0..num_qubits, 1..=2),
        prop::collection::vec((0..num_qubits, 0_u8..=1), 0..=2),
    )
        .prop_map(|(name, mut targets, controls)| {
            if !name.is_swap_family() {
                targets.truncate(1);
            }
            GateOp {
                name,
                targets,
                controls,
            }
        })
}

/// Circuits of 1-4 qubits with 0-12 bit/phase gates, plus a starting bitstring.
fn arb_pauli_case() -> impl Strategy<Value = (Circuit, Vec<u8>)> {
    (1_u32..=4).prop_flat_map(|num_qubits| {
        (
            prop::collection::vec(arb_gate_op(num_qubits), 0..=12),
            prop::collection::vec(0_u8..=1, num_qubits as usize),
        )
            .prop_map(move |(ops, bits)| {
                let mut circuit = Circuit::new(num_qubits).unwrap();
                for op in ops {
                    op.apply(&mut circuit);
                }
                (circuit, bits)
            })
    })
}

fn run_fast(circuit: &Circuit, bits: &[u8]) -> PauliState {
    let mut state = PauliState::new(bits.len());
    let qubits: Vec<QubitId> = circuit.qubits().collect();
    state.set_value(&qubits, bits).unwrap();
    let mut sim = PauliSimulator::with_state(circuit, state).unwrap();
    sim.run_all().unwrap();
    sim.into_state()
}

fn check_against_dense(
    order: QubitOrder,
    circuit: &Circuit,
    bits: &[u8],
) -> Result<(), TestCaseError> {
    let engine = DenseEngine::new(order);
    let dim = 1usize << bits.len();
    let initial = basis_state(dim, engine.basis_index(bits));
    let dense = engine.apply(circuit, Some(&initial)).unwrap();

    let fast = run_fast(circuit, bits);
    let index = engine.basis_index(fast.values());
    let expected = Complex64::from_polar(1.0, fast.phases().iter().sum());

    prop_assert!(
        (dense[index] - expected).norm() < 1e-9,
        "amplitude {} at {} differs from {}",
        dense[index],
        index,
        expected
    );
    let norm: f64 = dense.iter().map(|a| a.norm_sqr()).sum();
    prop_assert!((norm - 1.0).abs() < 1e-9);
    Ok(())
}

proptest! {
    /// The fast engine agrees with the dense engine under forward ordering.
    #[test]
    fn test_fast_matches_dense_forward((circuit, bits) in arb_pauli_case()) {
        check_against_dense(QubitOrder::Forward, &circuit, &bits)?;
    }

    /// The fast engine agrees with the dense engine under reversed ordering.
    #[test]
    fn test_fast_matches_dense_reversed((circuit, bits) in arb_pauli_case()) {
        check_against_dense(QubitOrder::Reversed, &circuit, &bits)?;
    }

    /// Every gate in the alphabet is self-inverse, so a circuit followed by
    /// its mirror image restores the input bits with zero total phase.
    #[test]
    fn test_mirror_circuit_restores_input((circuit, bits) in arb_pauli_case()) {
        let mut mirrored = circuit.clone();
        mirrored
            .extend(circuit.gates().iter().rev().cloned())
            .unwrap();

        let fast = run_fast(&mirrored, &bits);
        prop_assert_eq!(fast.values(), bits.as_slice());

        let total: f64 = fast.phases().iter().sum();
        let phase = Complex64::from_polar(1.0, total);
        prop_assert!((phase - Complex64::new(1.0, 0.0)).norm() < 1e-9);
    }

    /// Stepping through the gates one at a time matches a full run.
    #[test]
    fn test_stepping_matches_run_all((circuit, bits) in arb_pauli_case()) {
        let full = run_fast(&circuit, &bits);

        let mut sim = PauliSimulator::new(&circuit).unwrap();
        let qubits: Vec<QubitId> = circuit.qubits().collect();
        sim.set_value(&qubits, &bits).unwrap();
        for index in 0..circuit.len() {
            sim.step(index).unwrap();
        }
        prop_assert_eq!(sim.state(), &full);
    }
}
