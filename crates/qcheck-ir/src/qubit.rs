//! Qubit identifiers and named registers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as a `usize`, for addressing state arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// A named, ordered group of qubits.
///
/// Registers carry no state of their own; they only tell the scan utilities
/// and trace output which qubits belong together and in what order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QubitRegister {
    /// Register name used in trace output.
    pub name: String,
    /// Member qubits, most significant first.
    pub qubits: Vec<QubitId>,
}

impl QubitRegister {
    /// Create a register from arbitrary qubits.
    pub fn new(name: impl Into<String>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a register over the contiguous indices `start..start + len`.
    pub fn range(name: impl Into<String>, start: u32, len: u32) -> Self {
        Self::new(name, (start..start + len).map(QubitId))
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the register is empty.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Whether `qubit` belongs to this register.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }
}

impl fmt::Display for QubitRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{q}")?;
        }
        write!(f, "]")
    }
}
