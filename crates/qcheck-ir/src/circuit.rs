//! Validated, append-only circuit.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{IrError, IrResult};
use crate::gate::{GateName, GateRecord};
use crate::qubit::QubitId;
use crate::validator::{AnyGate, GateValidator};

/// A quantum circuit: a fixed number of qubits and an ordered gate list.
///
/// Gates are validated as they are added and never rewritten afterwards.
/// Cloning produces an independent deep copy; engines only borrow circuits.
#[derive(Debug, Clone, Serialize)]
pub struct Circuit {
    /// Name of the circuit, used in logs.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Gates in program order.
    gates: Vec<GateRecord>,
    /// Engine capability consulted on insertion.
    #[serde(skip)]
    validator: Arc<dyn GateValidator>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> IrResult<Self> {
        Self::with_validator(num_qubits, Arc::new(AnyGate))
    }

    /// Create an empty circuit whose gates must also pass `validator`.
    pub fn with_validator(num_qubits: u32, validator: Arc<dyn GateValidator>) -> IrResult<Self> {
        if num_qubits < 1 {
            return Err(IrError::InvalidQubitCount(num_qubits));
        }
        Ok(Self {
            name: "circuit".to_string(),
            num_qubits,
            gates: vec![],
            validator,
        })
    }

    /// Build a circuit from a list of records, validating each in order.
    pub fn from_records(
        num_qubits: u32,
        records: impl IntoIterator<Item = GateRecord>,
    ) -> IrResult<Self> {
        let mut circuit = Self::new(num_qubits)?;
        circuit.extend(records)?;
        Ok(circuit)
    }

    /// Set the circuit name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// All qubit ids, in index order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> {
        (0..self.num_qubits).map(QubitId)
    }

    /// Gates in program order.
    pub fn gates(&self) -> &[GateRecord] {
        &self.gates
    }

    /// Gate at `index`, if any.
    pub fn gate(&self, index: usize) -> Option<&GateRecord> {
        self.gates.get(index)
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Name of the validator capability this circuit was built with.
    pub fn capability(&self) -> &str {
        self.validator.name()
    }

    /// Validate `record` and append it.
    ///
    /// On error the circuit is left unchanged.
    pub fn add_gate(&mut self, record: GateRecord) -> IrResult<()> {
        self.validate(&record)?;
        self.gates.push(record);
        Ok(())
    }

    /// Validate and append several records, stopping at the first error.
    pub fn extend(&mut self, records: impl IntoIterator<Item = GateRecord>) -> IrResult<()> {
        for record in records {
            self.add_gate(record)?;
        }
        Ok(())
    }

    fn validate(&self, record: &GateRecord) -> IrResult<()> {
        let gate_name = || record.name.as_str().to_string();

        if record.targets.is_empty() {
            return Err(IrError::EmptyTargets {
                gate_name: gate_name(),
            });
        }

        for qubit in record.qubits() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: gate_name(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &record.targets {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateTarget {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }

        let mut seen_controls = FxHashSet::default();
        for &qubit in &record.controls {
            if !seen_controls.insert(qubit) {
                return Err(IrError::DuplicateControl {
                    qubit,
                    gate_name: gate_name(),
                });
            }
            if seen.contains(&qubit) {
                return Err(IrError::TargetControlOverlap {
                    qubit,
                    gate_name: gate_name(),
                });
            }
        }

        if record.controls.len() != record.control_values.len() {
            return Err(IrError::ControlValueCountMismatch {
                gate_name: gate_name(),
                controls: record.controls.len(),
                values: record.control_values.len(),
            });
        }

        for (&qubit, &value) in record.controls.iter().zip(&record.control_values) {
            if value > 1 {
                return Err(IrError::InvalidControlValue {
                    qubit,
                    value,
                    gate_name: gate_name(),
                });
            }
        }

        if let Some(params) = &record.params {
            let expected = record.name.num_params();
            if params.len() != expected {
                return Err(IrError::ParameterCountMismatch {
                    gate_name: gate_name(),
                    expected,
                    got: params.len(),
                });
            }
        }

        if record.name.is_swap_family() && record.targets.len() != 2 {
            return Err(IrError::SwapTargetCount {
                gate_name: gate_name(),
                got: record.targets.len(),
            });
        }

        self.validator.check(record)
    }

    // =========================================================================
    // Builder shorthands
    // =========================================================================

    fn push(&mut self, record: GateRecord) -> IrResult<&mut Self> {
        self.add_gate(record)?;
        Ok(self)
    }

    fn single(&mut self, name: GateName, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateRecord::new(name, [qubit]))
    }

    fn rotation(&mut self, name: GateName, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateRecord::new(name, [qubit]).with_params([angle]))
    }

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::I, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::Z, qubit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::H, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::SX, qubit)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(GateName::SXdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(GateName::Rx, theta, qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(GateName::Ry, theta, qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(GateName::Rz, theta, qubit)
    }

    /// Apply phase gate P(λ).
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(GateName::P, lambda, qubit)
    }

    /// Apply general single-qubit gate U(θ, φ, λ) with global phase γ.
    pub fn u(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        gamma: f64,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::U, [qubit]).with_params([theta, phi, lambda, gamma]))
    }

    /// Apply R(θ, φ) gate.
    pub fn r(&mut self, theta: f64, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::R, [qubit]).with_params([theta, phi]))
    }

    /// Inject a global phase of `e^{iθ}` per listed target.
    pub fn scalar(
        &mut self,
        theta: f64,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::Scalar, targets).with_params([theta]))
    }

    /// Apply CNOT (fires when `control` is 1).
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::X, [target]).controlled_by(control, 1))
    }

    /// Apply controlled-Z (fires when `control` is 1).
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::Z, [target]).controlled_by(control, 1))
    }

    /// Apply X on `target` when every control equals its paired value.
    pub fn mcx(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        values: impl IntoIterator<Item = u8>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::X, [target]).with_controls(controls, values))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::Swap, [q1, q2]))
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(GateRecord::new(GateName::ISwap, [q1, q2]))
    }
}
