//! Engine capabilities consulted when gates are inserted.

use std::fmt::Debug;

use crate::error::IrResult;
use crate::gate::GateRecord;

/// Extra per-engine checks applied by [`crate::Circuit::add_gate`].
///
/// The structural invariants (ranges, duplicates, arity) are always checked
/// by the circuit itself. A validator only decides whether an otherwise
/// well-formed record is something its engine can execute.
pub trait GateValidator: Debug + Send + Sync {
    /// Short name used in error messages, e.g. `"pauli engine"`.
    fn name(&self) -> &str;

    /// Accept or reject a structurally valid record.
    fn check(&self, record: &GateRecord) -> IrResult<()>;
}

/// Accepts every gate in the vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyGate;

impl GateValidator for AnyGate {
    fn name(&self) -> &str {
        "any gate"
    }

    fn check(&self, _record: &GateRecord) -> IrResult<()> {
        Ok(())
    }
}
