//! `qcheck-sim` — reference simulation engines for circuit tests.
//!
//! Two engines compute ground truth for a [`qcheck_ir::Circuit`]:
//!
//! - **Dense engine** ([`DenseEngine`]): the full `2^N × 2^N` unitary, or that
//!   unitary applied to a state vector. Supports every gate in the vocabulary
//!   with arbitrary controls, under either qubit-ordering convention.
//! - **Pauli engine** ([`PauliSimulator`]): one bit and one phase per qubit,
//!   for circuits built from X, Y, Z and SWAP only. Linear time, so it scales
//!   to circuits far beyond dense simulation.
//!
//! [`RegisterScan`] drives the Pauli engine over every assignment of a
//! selection register and returns per-assignment traces.
//!
//! # Quick start
//!
//! ```rust
//! use qcheck_ir::{Circuit, QubitId};
//! use qcheck_sim::{DenseEngine, QubitOrder};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let state = DenseEngine::new(QubitOrder::Forward)
//!     .apply(&circuit, None)
//!     .unwrap();
//! let amp = 1.0 / 2.0_f64.sqrt();
//! assert!((state[0].re - amp).abs() < 1e-12);
//! assert!((state[3].re - amp).abs() < 1e-12);
//! ```
//!
//! ```rust
//! use qcheck_ir::{Circuit, QubitId};
//! use qcheck_sim::PauliSimulator;
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.x(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let mut sim = PauliSimulator::new(&circuit).unwrap();
//! sim.run_all().unwrap();
//! assert_eq!(sim.values(), &[1, 1]);
//! ```

pub mod config;
pub mod dense;
pub mod error;
pub mod pauli;
pub mod scan;
pub mod unitary;

pub use config::{ConfigError, ScanConfig, SimConfig};
pub use dense::{DenseEngine, DenseGate, QubitOrder};
pub use error::{SimError, SimResult};
pub use pauli::{PauliCapability, PauliGate, PauliSimulator, PauliState, StepOutcome};
pub use scan::{Observation, RegisterScan, ScanReport, Trace, TraceEvent};
pub use unitary::Unitary2x2;
