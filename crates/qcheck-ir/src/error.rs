//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors raised while building or validating a circuit.
///
/// Every variant maps to exactly one violated rule so callers can match on
/// the variant instead of parsing the message.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A circuit needs at least one qubit.
    #[error("Circuit must have at least one qubit, got {0}")]
    InvalidQubitCount(u32),

    /// Gate name is not part of the vocabulary.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Qubit index outside `[0, N)`.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Circuit width.
        num_qubits: u32,
        /// Gate being inserted.
        gate_name: String,
    },

    /// Gate has no target qubits.
    #[error("Gate '{gate_name}' has no target qubits")]
    EmptyTargets {
        /// Gate being inserted.
        gate_name: String,
    },

    /// Same qubit listed twice as a target.
    #[error("Duplicate target qubit {qubit} (gate: {gate_name})")]
    DuplicateTarget {
        /// The repeated qubit.
        qubit: QubitId,
        /// Gate being inserted.
        gate_name: String,
    },

    /// Same qubit listed twice as a control.
    #[error("Duplicate control qubit {qubit} (gate: {gate_name})")]
    DuplicateControl {
        /// The repeated qubit.
        qubit: QubitId,
        /// Gate being inserted.
        gate_name: String,
    },

    /// Qubit used as both target and control.
    #[error("Qubit {qubit} is both target and control (gate: {gate_name})")]
    TargetControlOverlap {
        /// The shared qubit.
        qubit: QubitId,
        /// Gate being inserted.
        gate_name: String,
    },

    /// Controls and control values differ in length.
    #[error("Gate '{gate_name}' has {controls} control qubits but {values} control values")]
    ControlValueCountMismatch {
        /// Gate being inserted.
        gate_name: String,
        /// Number of control qubits.
        controls: usize,
        /// Number of control values.
        values: usize,
    },

    /// A control value other than 0 or 1.
    #[error("Control value {value} on qubit {qubit} is not a bit (gate: {gate_name})")]
    InvalidControlValue {
        /// The qubit carrying the bad value.
        qubit: QubitId,
        /// The bad value.
        value: u8,
        /// Gate being inserted.
        gate_name: String,
    },

    /// Wrong number of parameters for the gate.
    #[error("Gate '{gate_name}' requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Gate being inserted.
        gate_name: String,
        /// Parameters the gate takes.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// Swap-family gate without exactly two targets.
    #[error("Gate '{gate_name}' requires exactly 2 target qubits, got {got}")]
    SwapTargetCount {
        /// Gate being inserted.
        gate_name: String,
        /// Targets supplied.
        got: usize,
    },

    /// The circuit's validator does not accept this gate.
    #[error("Gate '{gate_name}' is not supported by {capability}")]
    UnsupportedGate {
        /// Gate being inserted.
        gate_name: String,
        /// Name of the rejecting capability.
        capability: String,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
