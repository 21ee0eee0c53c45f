//! Gate vocabulary and gate records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;
use crate::qubit::QubitId;

/// The closed set of gate names a circuit may contain.
///
/// Engines accept different subsets of this vocabulary; see the engine crates
/// for which names each one resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateName {
    // Fixed single-qubit gates
    /// Identity gate.
    #[serde(rename = "id")]
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Parameterized single-qubit gates
    /// Rotation around X: `rx(θ)`.
    Rx,
    /// Rotation around Y: `ry(θ)`.
    Ry,
    /// Rotation around Z: `rz(θ)`.
    Rz,
    /// Phase gate `p(λ)`.
    P,
    /// General single-qubit unitary `u(θ, φ, λ, γ)` with global phase γ.
    U,
    /// Rotation about an axis in the XY plane: `r(θ, φ)`.
    R,
    /// Global phase injector `scalar(θ)`.
    ///
    /// Applied once per listed target, so two targets contribute `e^{2iθ}`.
    Scalar,

    // Two-qubit gates
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
}

impl GateName {
    /// All gate names, in declaration order.
    pub const ALL: [GateName; 20] = [
        GateName::I,
        GateName::X,
        GateName::Y,
        GateName::Z,
        GateName::H,
        GateName::S,
        GateName::Sdg,
        GateName::T,
        GateName::Tdg,
        GateName::SX,
        GateName::SXdg,
        GateName::Rx,
        GateName::Ry,
        GateName::Rz,
        GateName::P,
        GateName::U,
        GateName::R,
        GateName::Scalar,
        GateName::Swap,
        GateName::ISwap,
    ];

    /// The lowercase wire name of this gate.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            GateName::I => "id",
            GateName::X => "x",
            GateName::Y => "y",
            GateName::Z => "z",
            GateName::H => "h",
            GateName::S => "s",
            GateName::Sdg => "sdg",
            GateName::T => "t",
            GateName::Tdg => "tdg",
            GateName::SX => "sx",
            GateName::SXdg => "sxdg",
            GateName::Rx => "rx",
            GateName::Ry => "ry",
            GateName::Rz => "rz",
            GateName::P => "p",
            GateName::U => "u",
            GateName::R => "r",
            GateName::Scalar => "scalar",
            GateName::Swap => "swap",
            GateName::ISwap => "iswap",
        }
    }

    /// Number of real parameters the gate takes.
    #[inline]
    pub fn num_params(self) -> usize {
        match self {
            GateName::I
            | GateName::X
            | GateName::Y
            | GateName::Z
            | GateName::H
            | GateName::S
            | GateName::Sdg
            | GateName::T
            | GateName::Tdg
            | GateName::SX
            | GateName::SXdg
            | GateName::Swap
            | GateName::ISwap => 0,

            GateName::Rx | GateName::Ry | GateName::Rz | GateName::P | GateName::Scalar => 1,

            GateName::R => 2,

            GateName::U => 4,
        }
    }

    /// Whether the gate acts on exactly two targets as a pair.
    #[inline]
    pub fn is_swap_family(self) -> bool {
        matches!(self, GateName::Swap | GateName::ISwap)
    }
}

impl fmt::Display for GateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateName {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateName::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| IrError::UnknownGate(s.to_string()))
    }
}

/// A single operation entry: gate name, operands, controls and parameters.
///
/// A record is plain data. It is checked against the circuit's invariants
/// only when it is handed to [`crate::Circuit::add_gate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Gate name.
    pub name: GateName,
    /// Qubits the gate acts on.
    pub targets: Vec<QubitId>,
    /// Qubits that gate whether the operation fires.
    #[serde(default)]
    pub controls: Vec<QubitId>,
    /// Required value of each control, paired by position.
    #[serde(default)]
    pub control_values: Vec<u8>,
    /// Real parameters, absent for fixed gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<f64>>,
}

impl GateRecord {
    /// Create an uncontrolled record with no parameters.
    pub fn new(name: GateName, targets: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            name,
            targets: targets.into_iter().collect(),
            controls: vec![],
            control_values: vec![],
            params: None,
        }
    }

    /// Create a record from a wire name such as `"rx"`.
    pub fn named(
        name: &str,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> Result<Self, IrError> {
        Ok(Self::new(name.parse()?, targets))
    }

    /// Set the control qubits and their required values.
    #[must_use]
    pub fn with_controls(
        mut self,
        controls: impl IntoIterator<Item = QubitId>,
        values: impl IntoIterator<Item = u8>,
    ) -> Self {
        self.controls = controls.into_iter().collect();
        self.control_values = values.into_iter().collect();
        self
    }

    /// Add one control qubit with its required value.
    #[must_use]
    pub fn controlled_by(mut self, control: QubitId, value: u8) -> Self {
        self.controls.push(control);
        self.control_values.push(value);
        self
    }

    /// Set the gate parameters.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = f64>) -> Self {
        self.params = Some(params.into_iter().collect());
        self
    }

    /// Parameters as a slice; empty when absent.
    pub fn params(&self) -> &[f64] {
        self.params.as_deref().unwrap_or(&[])
    }

    /// Iterate over every qubit this record touches, targets first.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.targets.iter().chain(self.controls.iter()).copied()
    }
}

impl fmt::Display for GateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(params) = &self.params {
            let joined: Vec<String> = params.iter().map(|p| format!("{p}")).collect();
            write!(f, "({})", joined.join(", "))?;
        }
        let targets: Vec<String> = self.targets.iter().map(ToString::to_string).collect();
        write!(f, " {}", targets.join(", "))?;
        if !self.controls.is_empty() {
            let controls: Vec<String> = self
                .controls
                .iter()
                .zip(&self.control_values)
                .map(|(q, v)| format!("{q}={v}"))
                .collect();
            write!(f, " if {}", controls.join(", "))?;
        }
        Ok(())
    }
}
