//! Error types for the simulation engines.

use qcheck_ir::QubitId;
use thiserror::Error;

/// Errors produced while simulating a circuit or scanning a register.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The selected engine cannot execute this gate.
    #[error("Gate '{gate_name}' at index {index} is not supported by the {engine} engine")]
    UnsupportedGate {
        /// Name of the rejected gate.
        gate_name: String,
        /// Position of the gate in the circuit.
        index: usize,
        /// Engine that rejected it.
        engine: &'static str,
    },

    /// A parameterized gate reached an engine without parameters.
    #[error("Gate '{gate_name}' at index {index} has no parameters")]
    MissingParameters {
        /// Name of the gate.
        gate_name: String,
        /// Position of the gate in the circuit.
        index: usize,
    },

    /// Parameter count does not match the gate.
    #[error("Gate '{gate_name}' at index {index} requires {expected} parameters, got {got}")]
    ParameterCount {
        /// Name of the gate.
        gate_name: String,
        /// Position of the gate in the circuit.
        index: usize,
        /// Parameters the gate takes.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// Explicit initial state does not have `2^N` amplitudes.
    #[error("Initial state has {got} amplitudes, expected {expected} for {num_qubits} qubits")]
    StateDimension {
        /// Required length.
        expected: usize,
        /// Supplied length.
        got: usize,
        /// Circuit width.
        num_qubits: u32,
    },

    /// Dense simulation requested above the configured qubit limit.
    #[error("Dense engine limited to {limit} qubits, circuit has {num_qubits}")]
    TooManyQubits {
        /// Circuit width.
        num_qubits: u32,
        /// Configured limit.
        limit: u32,
    },

    /// `step` called past the end of the circuit.
    #[error("Gate index {index} out of range for circuit with {len} gates")]
    GateIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of gates.
        len: usize,
    },

    /// State access outside the simulated qubits.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit state")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Width of the state.
        num_qubits: usize,
    },

    /// Qubit list and value list differ in length.
    #[error("Got {qubits} qubits but {values} values")]
    LengthMismatch {
        /// Number of qubits.
        qubits: usize,
        /// Number of values.
        values: usize,
    },

    /// A value other than 0 or 1 assigned to a qubit.
    #[error("Value {value} assigned to qubit {qubit} is not a bit")]
    InvalidBit {
        /// The target qubit.
        qubit: QubitId,
        /// The bad value.
        value: u8,
    },

    /// Initial state width differs from the circuit width.
    #[error("State has {got} qubits but circuit has {expected}")]
    StateWidth {
        /// Circuit width.
        expected: usize,
        /// State width.
        got: usize,
    },

    /// Register scan needs at least one selection qubit.
    #[error("Selection register '{0}' is empty")]
    EmptySelection(String),

    /// Selection register too wide to enumerate.
    #[error("Selection register '{name}' has {width} qubits, at most {max} can be enumerated")]
    SelectionTooWide {
        /// Register name.
        name: String,
        /// Register width.
        width: usize,
        /// Largest supported width.
        max: usize,
    },

    /// Two scan registers share a qubit.
    #[error("Registers '{first}' and '{second}' both contain qubit {qubit}")]
    RegisterOverlap {
        /// Name of the first register.
        first: String,
        /// Name of the second register.
        second: String,
        /// Shared qubit.
        qubit: QubitId,
    },

    /// Ancilla register did not return to all-zero.
    #[error("Ancilla qubits {qubits:?} not reset to 0 for selection {assignment}")]
    AncillaNotReset {
        /// Selection bitstring being simulated.
        assignment: String,
        /// Ancilla qubits left at 1.
        qubits: Vec<QubitId>,
    },

    /// Circuit model error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qcheck_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
