//! Fast bit/phase engine.
//!
//! Tracks one classical bit and one accumulated phase per qubit. This is
//! exact as long as every qubit stays in a computational basis state, which
//! holds for circuits built only from X, Y, Z and SWAP with arbitrary
//! classical controls. Runtime is linear in gates × qubits.
//!
//! | Gate | Effect on target t (only when all controls match) |
//! |------|----------------------------------------------------|
//! | `x` | `v[t] ^= 1` |
//! | `y` | `φ[t] += π(½ − v[t])`, then `v[t] ^= 1` |
//! | `z` | `φ[t] += π·v[t]` |
//! | `swap` | exchange `(v, φ)` of the two targets |

use std::f64::consts::PI;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use qcheck_ir::{Circuit, GateName, GateRecord, GateValidator, IrError, IrResult, QubitId};

use crate::error::{SimError, SimResult};

const ENGINE: &str = "pauli";

/// Gate kinds the fast engine executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauliGate {
    /// Bit flip.
    X,
    /// Bit flip carrying a ±π/2 phase.
    Y,
    /// Phase flip on |1⟩.
    Z,
    /// Exchange of two qubits.
    Swap,
}

impl PauliGate {
    /// Resolve the record at `index`, rejecting superposition-creating gates.
    pub fn resolve(record: &GateRecord, index: usize) -> SimResult<Self> {
        match record.name {
            GateName::X => Ok(PauliGate::X),
            GateName::Y => Ok(PauliGate::Y),
            GateName::Z => Ok(PauliGate::Z),
            GateName::Swap => Ok(PauliGate::Swap),
            GateName::I
            | GateName::H
            | GateName::S
            | GateName::Sdg
            | GateName::T
            | GateName::Tdg
            | GateName::SX
            | GateName::SXdg
            | GateName::Rx
            | GateName::Ry
            | GateName::Rz
            | GateName::P
            | GateName::U
            | GateName::R
            | GateName::Scalar
            | GateName::ISwap => Err(SimError::UnsupportedGate {
                gate_name: record.name.to_string(),
                index,
                engine: ENGINE,
            }),
        }
    }

    /// Whether `name` is executable by the fast engine.
    pub fn supports(name: GateName) -> bool {
        matches!(
            name,
            GateName::X | GateName::Y | GateName::Z | GateName::Swap
        )
    }
}

/// Validator for circuits meant for the fast engine.
///
/// Rejects unsupported gates at `add_gate` time instead of at simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PauliCapability;

impl PauliCapability {
    /// Create an empty circuit restricted to the fast-engine gate set.
    pub fn circuit(num_qubits: u32) -> IrResult<Circuit> {
        Circuit::with_validator(num_qubits, Arc::new(PauliCapability))
    }
}

impl GateValidator for PauliCapability {
    fn name(&self) -> &str {
        "pauli engine"
    }

    fn check(&self, record: &GateRecord) -> IrResult<()> {
        if PauliGate::supports(record.name) {
            Ok(())
        } else {
            Err(IrError::UnsupportedGate {
                gate_name: record.name.to_string(),
                capability: self.name().to_string(),
            })
        }
    }
}

/// Per-qubit classical state: one bit and one phase (radians) per qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliState {
    values: Vec<u8>,
    phases: Vec<f64>,
}

impl PauliState {
    /// All qubits at value 0 with zero phase.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            values: vec![0; num_qubits],
            phases: vec![0.0; num_qubits],
        }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.values.len()
    }

    /// Bit values, indexed by qubit.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Accumulated phases in radians, indexed by qubit. Unbounded.
    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Bit value of one qubit.
    pub fn value(&self, qubit: QubitId) -> Option<u8> {
        self.values.get(qubit.index()).copied()
    }

    /// Phase of one qubit.
    pub fn phase(&self, qubit: QubitId) -> Option<f64> {
        self.phases.get(qubit.index()).copied()
    }

    /// Return every qubit to value 0 and phase 0.
    pub fn reset(&mut self) {
        self.values.fill(0);
        self.phases.fill(0.0);
    }

    /// Assign bit values to qubits, pairwise.
    pub fn set_value(&mut self, qubits: &[QubitId], values: &[u8]) -> SimResult<()> {
        self.check_lengths(qubits, values.len())?;
        for (&qubit, &value) in qubits.iter().zip(values) {
            if value > 1 {
                return Err(SimError::InvalidBit { qubit, value });
            }
        }
        for (&qubit, &value) in qubits.iter().zip(values) {
            self.values[qubit.index()] = value;
        }
        Ok(())
    }

    /// Assign phases to qubits, pairwise.
    pub fn set_phase(&mut self, qubits: &[QubitId], phases: &[f64]) -> SimResult<()> {
        self.check_lengths(qubits, phases.len())?;
        for (&qubit, &phase) in qubits.iter().zip(phases) {
            self.phases[qubit.index()] = phase;
        }
        Ok(())
    }

    fn check_lengths(&self, qubits: &[QubitId], values: usize) -> SimResult<()> {
        if qubits.len() != values {
            return Err(SimError::LengthMismatch {
                qubits: qubits.len(),
                values,
            });
        }
        if let Some(&qubit) = qubits.iter().find(|q| q.index() >= self.num_qubits()) {
            return Err(SimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits(),
            });
        }
        Ok(())
    }

    /// Whether every control of `record` currently holds its required value.
    pub fn controls_match(&self, record: &GateRecord) -> bool {
        record
            .controls
            .iter()
            .zip(&record.control_values)
            .all(|(q, &v)| self.values.get(q.index()) == Some(&v))
    }

    /// Execute one gate; returns whether it fired.
    fn apply(&mut self, gate: PauliGate, record: &GateRecord) -> bool {
        if !self.controls_match(record) {
            return false;
        }
        match gate {
            PauliGate::X => {
                for t in &record.targets {
                    self.values[t.index()] ^= 1;
                }
            }
            PauliGate::Y => {
                for t in &record.targets {
                    let i = t.index();
                    self.phases[i] += PI * (0.5 - f64::from(self.values[i]));
                    self.values[i] ^= 1;
                }
            }
            PauliGate::Z => {
                for t in &record.targets {
                    let i = t.index();
                    self.phases[i] += PI * f64::from(self.values[i]);
                }
            }
            PauliGate::Swap => {
                let (a, b) = (record.targets[0].index(), record.targets[1].index());
                self.values.swap(a, b);
                self.phases.swap(a, b);
            }
        }
        true
    }
}

/// Result of executing a single gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Index of the executed gate.
    pub index: usize,
    /// Whether the gate's controls matched.
    pub fired: bool,
}

/// Fast engine bound to one circuit and one state.
///
/// The circuit is borrowed immutably; only the state arrays change.
#[derive(Debug, Clone)]
pub struct PauliSimulator<'c> {
    circuit: &'c Circuit,
    gates: Vec<PauliGate>,
    state: PauliState,
}

impl<'c> PauliSimulator<'c> {
    /// Resolve every gate of `circuit` and start from the all-zero state.
    pub fn new(circuit: &'c Circuit) -> SimResult<Self> {
        Self::with_state(circuit, PauliState::new(circuit.num_qubits() as usize))
    }

    /// Resolve every gate of `circuit` and start from `state`.
    pub fn with_state(circuit: &'c Circuit, state: PauliState) -> SimResult<Self> {
        let expected = circuit.num_qubits() as usize;
        if state.num_qubits() != expected {
            return Err(SimError::StateWidth {
                expected,
                got: state.num_qubits(),
            });
        }
        let gates = circuit
            .gates()
            .iter()
            .enumerate()
            .map(|(index, record)| PauliGate::resolve(record, index))
            .collect::<SimResult<Vec<_>>>()?;
        Ok(Self {
            circuit,
            gates,
            state,
        })
    }

    /// The simulated circuit.
    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    /// Current state.
    pub fn state(&self) -> &PauliState {
        &self.state
    }

    /// Consume the simulator and return its state.
    pub fn into_state(self) -> PauliState {
        self.state
    }

    /// Bit values, indexed by qubit.
    pub fn values(&self) -> &[u8] {
        self.state.values()
    }

    /// Phases in radians, indexed by qubit.
    pub fn phases(&self) -> &[f64] {
        self.state.phases()
    }

    /// Assign bit values to qubits.
    pub fn set_value(&mut self, qubits: &[QubitId], values: &[u8]) -> SimResult<()> {
        self.state.set_value(qubits, values)
    }

    /// Assign phases to qubits.
    pub fn set_phase(&mut self, qubits: &[QubitId], phases: &[f64]) -> SimResult<()> {
        self.state.set_phase(qubits, phases)
    }

    /// Reset every qubit to value 0 and phase 0.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Replace the whole state, keeping the resolved gates.
    pub fn set_state(&mut self, state: PauliState) -> SimResult<()> {
        if state.num_qubits() != self.state.num_qubits() {
            return Err(SimError::StateWidth {
                expected: self.state.num_qubits(),
                got: state.num_qubits(),
            });
        }
        self.state = state;
        Ok(())
    }

    /// Execute exactly the gate at `index`.
    pub fn step(&mut self, index: usize) -> SimResult<StepOutcome> {
        let gate = *self
            .gates
            .get(index)
            .ok_or(SimError::GateIndexOutOfRange {
                index,
                len: self.gates.len(),
            })?;
        let record = &self.circuit.gates()[index];
        let fired = self.state.apply(gate, record);
        trace!(index, gate = %record, fired, "pauli step");
        Ok(StepOutcome { index, fired })
    }

    /// Execute every gate in program order.
    pub fn run_all(&mut self) -> SimResult<()> {
        for index in 0..self.gates.len() {
            self.step(index)?;
        }
        Ok(())
    }
}
