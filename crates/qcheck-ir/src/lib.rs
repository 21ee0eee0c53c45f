//! qcheck circuit model
//!
//! This crate provides the validated gate-list representation that the qcheck
//! simulation engines consume. It holds no simulation logic.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing qubits, [`QubitRegister`] for named groups
//! - **Gates**: [`GateName`], the closed gate vocabulary, and [`GateRecord`], one
//!   operation with its targets, controls, control values and parameters
//! - **Circuit**: [`Circuit`], an append-only list of validated records
//! - **Validators**: [`GateValidator`] lets an engine restrict which gates a circuit
//!   accepts at insertion time
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcheck_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 2);
//! ```
//!
//! # Example: Controlled Records
//!
//! ```rust
//! use qcheck_ir::{Circuit, GateName, GateRecord, IrError, QubitId};
//!
//! let mut circuit = Circuit::new(3).unwrap();
//!
//! // X on q2, firing only when q0 = 0 and q1 = 1
//! let rec = GateRecord::new(GateName::X, [QubitId(2)])
//!     .with_controls([QubitId(0), QubitId(1)], [0, 1]);
//! circuit.add_gate(rec).unwrap();
//!
//! // Targets and controls must be disjoint
//! let bad = GateRecord::new(GateName::X, [QubitId(0)]).controlled_by(QubitId(0), 1);
//! assert!(matches!(
//!     circuit.add_gate(bad),
//!     Err(IrError::TargetControlOverlap { .. })
//! ));
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Params | Description |
//! |------|--------|-------------|
//! | `id` | 0 | Identity |
//! | `x`, `y`, `z` | 0 | Pauli gates |
//! | `h` | 0 | Hadamard |
//! | `s`, `sdg`, `t`, `tdg` | 0 | Phase gates |
//! | `sx`, `sxdg` | 0 | sqrt(X) and its inverse |
//! | `rx`, `ry`, `rz` | 1 | Rotations |
//! | `p` | 1 | Phase gate P(λ) |
//! | `u` | 4 | U(θ, φ, λ) with global phase γ |
//! | `r` | 2 | R(θ, φ) |
//! | `scalar` | 1 | Global phase e^{iθ} per target |
//! | `swap`, `iswap` | 0 | Two-target exchange gates |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod qubit;
pub mod validator;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{GateName, GateRecord};
pub use qubit::{QubitId, QubitRegister};
pub use validator::{AnyGate, GateValidator};
