//! Dense unitary and state-vector engine.
//!
//! Builds the full `2^N × 2^N` operator of a circuit by lifting every gate to
//! the full register width and left-multiplying in program order:
//!
//!   U ← G_lift · U
//!
//! A gate with base matrix G, controls C (required values V) and targets T is
//! lifted as a sum over all `2^|C|` control assignments b:
//!
//!   G_lift = Σ_b ⊗_i factor_i(b)
//!
//! where `factor_i` is the projector `|b_i⟩⟨b_i|` on controls, G on targets
//! when `b == V`, and identity everywhere else. Memory and time are
//! exponential in N; this engine exists to produce reference results for
//! small circuits.

use ndarray::linalg::kron;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qcheck_ir::{Circuit, GateName, GateRecord};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::unitary::Unitary2x2;

/// Default qubit limit for dense simulation.
pub const DEFAULT_MAX_QUBITS: u32 = 12;

/// Hard qubit limit: the largest width whose operator size fits in memory
/// addressing.
pub const MAX_DENSE_QUBITS: u32 = (usize::BITS - 8) / 2;

/// Default absolute tolerance for amplitude comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Mapping between qubit index and tensor-product factor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QubitOrder {
    /// Qubit 0 is the most significant tensor factor.
    #[default]
    Forward,
    /// Qubit 0 is the least significant tensor factor (right-to-left).
    Reversed,
}

/// Dense-engine gate kinds.
///
/// Resolved from a [`GateRecord`] with an exhaustive match, so a new entry in
/// the gate vocabulary must be given dense semantics here explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DenseGate {
    /// A single-qubit base matrix applied on every listed target.
    Single(Unitary2x2),
    /// SWAP, decomposed into three CNOTs.
    Swap,
    /// iSWAP, decomposed into S, H and CNOT steps.
    ISwap,
}

impl DenseGate {
    /// Resolve the record at `index` into a dense gate kind.
    pub fn resolve(record: &GateRecord, index: usize) -> SimResult<Self> {
        let gate = match record.name {
            GateName::I => Self::fixed(record, index, Unitary2x2::identity())?,
            GateName::X => Self::fixed(record, index, Unitary2x2::x())?,
            GateName::Y => Self::fixed(record, index, Unitary2x2::y())?,
            GateName::Z => Self::fixed(record, index, Unitary2x2::z())?,
            GateName::H => Self::fixed(record, index, Unitary2x2::h())?,
            GateName::S => Self::fixed(record, index, Unitary2x2::s())?,
            GateName::Sdg => Self::fixed(record, index, Unitary2x2::sdg())?,
            GateName::T => Self::fixed(record, index, Unitary2x2::t())?,
            GateName::Tdg => Self::fixed(record, index, Unitary2x2::tdg())?,
            GateName::SX => Self::fixed(record, index, Unitary2x2::sx())?,
            GateName::SXdg => Self::fixed(record, index, Unitary2x2::sxdg())?,
            GateName::Rx => {
                let [theta] = params(record, index)?;
                DenseGate::Single(Unitary2x2::rx(theta))
            }
            GateName::Ry => {
                let [theta] = params(record, index)?;
                DenseGate::Single(Unitary2x2::ry(theta))
            }
            GateName::Rz => {
                let [theta] = params(record, index)?;
                DenseGate::Single(Unitary2x2::rz(theta))
            }
            GateName::P => {
                let [lambda] = params(record, index)?;
                DenseGate::Single(Unitary2x2::p(lambda))
            }
            GateName::U => {
                let [theta, phi, lambda, gamma] = params(record, index)?;
                DenseGate::Single(Unitary2x2::u(theta, phi, lambda, gamma))
            }
            GateName::R => {
                let [theta, phi] = params(record, index)?;
                DenseGate::Single(Unitary2x2::r(theta, phi))
            }
            // e^{iθ}·I placed on every target: the phase compounds per target.
            GateName::Scalar => {
                let [theta] = params(record, index)?;
                DenseGate::Single(Unitary2x2::scalar(theta))
            }
            GateName::Swap => {
                params::<0>(record, index)?;
                DenseGate::Swap
            }
            GateName::ISwap => {
                params::<0>(record, index)?;
                DenseGate::ISwap
            }
        };
        Ok(gate)
    }

    fn fixed(record: &GateRecord, index: usize, base: Unitary2x2) -> SimResult<Self> {
        params::<0>(record, index)?;
        Ok(DenseGate::Single(base))
    }

    /// Expand into elementary single-qubit steps, each inheriting the
    /// record's own controls.
    fn steps(self, record: &GateRecord) -> Vec<Step> {
        let controls: Vec<usize> = record.controls.iter().map(|q| q.index()).collect();
        let values = record.control_values.clone();
        let step = |base: Unitary2x2, target: usize, extra: Option<usize>| {
            let mut step = Step {
                base,
                targets: vec![target],
                controls: controls.clone(),
                values: values.clone(),
            };
            if let Some(control) = extra {
                step.controls.push(control);
                step.values.push(1);
            }
            step
        };

        match self {
            DenseGate::Single(base) => vec![Step {
                base,
                targets: record.targets.iter().map(|q| q.index()).collect(),
                controls: controls.clone(),
                values: values.clone(),
            }],
            DenseGate::Swap => {
                let (a, b) = (record.targets[0].index(), record.targets[1].index());
                vec![
                    step(Unitary2x2::x(), b, Some(a)),
                    step(Unitary2x2::x(), a, Some(b)),
                    step(Unitary2x2::x(), b, Some(a)),
                ]
            }
            DenseGate::ISwap => {
                let (a, b) = (record.targets[0].index(), record.targets[1].index());
                vec![
                    step(Unitary2x2::s(), a, None),
                    step(Unitary2x2::s(), b, None),
                    step(Unitary2x2::h(), a, None),
                    step(Unitary2x2::x(), b, Some(a)),
                    step(Unitary2x2::x(), a, Some(b)),
                    step(Unitary2x2::h(), b, None),
                ]
            }
        }
    }
}

/// Read exactly `N` parameters from a record.
fn params<const N: usize>(record: &GateRecord, index: usize) -> SimResult<[f64; N]> {
    match &record.params {
        None if N > 0 => Err(SimError::MissingParameters {
            gate_name: record.name.to_string(),
            index,
        }),
        None => Ok([0.0; N]),
        Some(p) => <[f64; N]>::try_from(p.as_slice()).map_err(|_| SimError::ParameterCount {
            gate_name: record.name.to_string(),
            index,
            expected: N,
            got: p.len(),
        }),
    }
}

/// One controlled single-qubit operation at full register width.
#[derive(Debug, Clone)]
struct Step {
    base: Unitary2x2,
    targets: Vec<usize>,
    controls: Vec<usize>,
    values: Vec<u8>,
}

/// Dense unitary / state-vector builder.
#[derive(Debug, Clone, Copy)]
pub struct DenseEngine {
    order: QubitOrder,
    max_qubits: u32,
    tolerance: f64,
}

impl Default for DenseEngine {
    fn default() -> Self {
        Self::new(QubitOrder::Forward)
    }
}

impl DenseEngine {
    /// Create an engine using `order` for every gate.
    pub fn new(order: QubitOrder) -> Self {
        Self {
            order,
            max_qubits: DEFAULT_MAX_QUBITS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Create an engine from configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            order: config.qubit_order,
            max_qubits: config.max_dense_qubits.min(MAX_DENSE_QUBITS),
            tolerance: config.tolerance,
        }
    }

    /// Override the qubit limit, clamped to [`MAX_DENSE_QUBITS`].
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits.min(MAX_DENSE_QUBITS);
        self
    }

    /// Override the comparison tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The ordering convention in use.
    pub fn order(&self) -> QubitOrder {
        self.order
    }

    /// The comparison tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether the circuit's operator matches `expected` within tolerance.
    pub fn operator_matches(
        &self,
        circuit: &Circuit,
        expected: &Array2<Complex64>,
    ) -> SimResult<bool> {
        Ok(allclose(&self.build_operator(circuit)?, expected, self.tolerance))
    }

    /// Whether applying the circuit to `initial` yields `expected` within
    /// tolerance.
    pub fn state_matches(
        &self,
        circuit: &Circuit,
        initial: Option<&Array1<Complex64>>,
        expected: &Array1<Complex64>,
    ) -> SimResult<bool> {
        Ok(allclose_vec(&self.apply(circuit, initial)?, expected, self.tolerance))
    }

    /// Compute the operator of the whole circuit, starting from identity.
    pub fn build_operator(&self, circuit: &Circuit) -> SimResult<Array2<Complex64>> {
        let n = self.check_width(circuit)?;
        let steps = compile(circuit)?;
        debug!(
            circuit = circuit.name(),
            num_qubits = n,
            num_gates = circuit.len(),
            num_steps = steps.len(),
            order = ?self.order,
            "building dense operator"
        );

        let mut unitary = Array2::<Complex64>::eye(1 << n);
        for step in &steps {
            unitary = self.lift(step, n).dot(&unitary);
        }
        Ok(unitary)
    }

    /// Apply the circuit to `initial`, or to |0…0⟩ when `None`.
    pub fn apply(
        &self,
        circuit: &Circuit,
        initial: Option<&Array1<Complex64>>,
    ) -> SimResult<Array1<Complex64>> {
        let n = self.check_width(circuit)?;
        let dim = 1usize << n;

        let mut state = match initial {
            Some(state) if state.len() != dim => {
                return Err(SimError::StateDimension {
                    expected: dim,
                    got: state.len(),
                    num_qubits: circuit.num_qubits(),
                });
            }
            Some(state) => state.clone(),
            None => basis_state(dim, 0),
        };

        let steps = compile(circuit)?;
        debug!(
            circuit = circuit.name(),
            num_qubits = n,
            num_steps = steps.len(),
            order = ?self.order,
            "applying circuit to state vector"
        );

        for step in &steps {
            state = self.lift(step, n).dot(&state);
        }
        Ok(state)
    }

    /// Index of the computational basis state with the given per-qubit bits.
    ///
    /// `bits[i]` is the value of qubit i; the result depends on the order.
    pub fn basis_index(&self, bits: &[u8]) -> usize {
        let n = bits.len();
        bits.iter().enumerate().fold(0, |acc, (qubit, &bit)| {
            let shift = match self.order {
                QubitOrder::Forward => n - 1 - qubit,
                QubitOrder::Reversed => qubit,
            };
            acc | (usize::from(bit & 1) << shift)
        })
    }

    fn check_width(&self, circuit: &Circuit) -> SimResult<usize> {
        let n = circuit.num_qubits();
        if n > self.max_qubits {
            return Err(SimError::TooManyQubits {
                num_qubits: n,
                limit: self.max_qubits,
            });
        }
        Ok(n as usize)
    }

    /// Lift one step to a full-width operator.
    fn lift(&self, step: &Step, n: usize) -> Array2<Complex64> {
        let dim = 1usize << n;
        let k = step.controls.len();
        let mut lifted = Array2::<Complex64>::zeros((dim, dim));

        for assignment in 0..(1usize << k) {
            let bits: Vec<u8> = (0..k)
                .map(|j| ((assignment >> (k - 1 - j)) & 1) as u8)
                .collect();
            let fires = bits == step.values;

            let factors: Vec<Unitary2x2> = (0..n)
                .map(|qubit| {
                    if let Some(pos) = step.controls.iter().position(|&c| c == qubit) {
                        Unitary2x2::projector(bits[pos])
                    } else if fires && step.targets.contains(&qubit) {
                        step.base
                    } else {
                        Unitary2x2::identity()
                    }
                })
                .collect();

            lifted += &self.tensor(&factors);
        }
        lifted
    }

    /// Kronecker product of per-qubit factors in the engine's order.
    fn tensor(&self, factors: &[Unitary2x2]) -> Array2<Complex64> {
        let one = Array2::from_elem((1, 1), Complex64::new(1.0, 0.0));
        let step = |acc: Array2<Complex64>, factor: &Unitary2x2| kron(&acc, &factor.to_array());
        match self.order {
            QubitOrder::Forward => factors.iter().fold(one, step),
            QubitOrder::Reversed => factors.iter().rev().fold(one, step),
        }
    }
}

fn compile(circuit: &Circuit) -> SimResult<Vec<Step>> {
    let mut steps = Vec::with_capacity(circuit.len());
    for (index, record) in circuit.gates().iter().enumerate() {
        steps.extend(DenseGate::resolve(record, index)?.steps(record));
    }
    Ok(steps)
}

/// The basis vector `|index⟩` of dimension `dim`.
pub fn basis_state(dim: usize, index: usize) -> Array1<Complex64> {
    let mut state = Array1::<Complex64>::zeros(dim);
    if index < dim {
        state[index] = Complex64::new(1.0, 0.0);
    }
    state
}

/// Element-wise comparison of two operators.
pub fn allclose(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) -> bool {
    a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tol)
}

/// Element-wise comparison of two state vectors.
pub fn allclose_vec(a: &Array1<Complex64>, b: &Array1<Complex64>, tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tol)
}

/// Compare two operators ignoring a global phase.
pub fn equal_up_to_global_phase(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) -> bool {
    if a.shape() != b.shape() {
        return false;
    }
    let Some((x, y)) = a.iter().zip(b.iter()).find(|(x, _)| x.norm() > tol) else {
        return b.iter().all(|y| y.norm() <= tol);
    };
    if y.norm() <= tol {
        return false;
    }
    let phase = y / x;
    allclose(&a.mapv(|e| e * phase), b, tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcheck_ir::QubitId;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_empty_circuit_is_identity() {
        for n in 1..=3 {
            let circuit = Circuit::new(n).unwrap();
            let u = DenseEngine::default().build_operator(&circuit).unwrap();
            assert!(allclose(&u, &Array2::eye(1 << n), 1e-12));
        }
    }

    #[test]
    fn test_single_qubit_x() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(QubitId(0)).unwrap();
        let u = DenseEngine::default().build_operator(&circuit).unwrap();
        assert!(allclose(&u, &Unitary2x2::x().to_array(), 1e-12));
    }

    #[test]
    fn test_forward_order_places_qubit0_high() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.x(QubitId(0)).unwrap();

        let fwd = DenseEngine::new(QubitOrder::Forward).apply(&circuit, None).unwrap();
        assert_eq!(fwd[2], c(1.0, 0.0));

        let rev = DenseEngine::new(QubitOrder::Reversed).apply(&circuit, None).unwrap();
        assert_eq!(rev[1], c(1.0, 0.0));
    }

    #[test]
    fn test_basis_index() {
        let fwd = DenseEngine::new(QubitOrder::Forward);
        let rev = DenseEngine::new(QubitOrder::Reversed);
        assert_eq!(fwd.basis_index(&[1, 0, 0]), 4);
        assert_eq!(rev.basis_index(&[1, 0, 0]), 1);
        assert_eq!(fwd.basis_index(&[0, 1, 1]), 3);
        assert_eq!(rev.basis_index(&[0, 1, 1]), 6);
    }

    #[test]
    fn test_uncontrolled_lift_has_no_projector_sum() {
        // H on both targets of one record is H ⊗ H.
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .add_gate(GateRecord::new(GateName::H, [QubitId(0), QubitId(1)]))
            .unwrap();
        let u = DenseEngine::default().build_operator(&circuit).unwrap();
        let h = Unitary2x2::h().to_array();
        assert!(allclose(&u, &kron(&h, &h), 1e-12));
    }

    #[test]
    fn test_missing_parameters() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .add_gate(GateRecord::new(GateName::Rz, [QubitId(0)]))
            .unwrap();
        let err = DenseEngine::default().build_operator(&circuit).unwrap_err();
        assert!(matches!(err, SimError::MissingParameters { index: 0, .. }));
    }

    #[test]
    fn test_state_dimension_mismatch() {
        let circuit = Circuit::new(2).unwrap();
        let bad = basis_state(2, 0);
        let err = DenseEngine::default().apply(&circuit, Some(&bad)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Initial state has 2 amplitudes, expected 4 for 2 qubits"
        );
    }

    #[test]
    fn test_qubit_limit() {
        let circuit = Circuit::new(5).unwrap();
        let err = DenseEngine::default()
            .with_max_qubits(4)
            .build_operator(&circuit)
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::TooManyQubits {
                num_qubits: 5,
                limit: 4
            }
        ));
    }

    #[test]
    fn test_matches_use_engine_tolerance() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.rz(1e-6, QubitId(0)).unwrap();
        let identity = Array2::eye(2);

        let strict = DenseEngine::default();
        assert_eq!(strict.tolerance(), DEFAULT_TOLERANCE);
        assert!(!strict.operator_matches(&circuit, &identity).unwrap());

        let loose = strict.with_tolerance(1e-3);
        assert!(loose.operator_matches(&circuit, &identity).unwrap());
        assert!(loose
            .state_matches(&circuit, None, &basis_state(2, 0))
            .unwrap());
    }

    #[test]
    fn test_raised_limit_is_clamped() {
        let engine = DenseEngine::default().with_max_qubits(64);
        let err = engine.build_operator(&Circuit::new(40).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            SimError::TooManyQubits {
                num_qubits: 40,
                limit: MAX_DENSE_QUBITS
            }
        ));
        assert!(matches!(
            engine.apply(&Circuit::new(40).unwrap(), None),
            Err(SimError::TooManyQubits { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = SimConfig {
            qubit_order: QubitOrder::Reversed,
            max_dense_qubits: 3,
            tolerance: 1e-6,
            ..SimConfig::default()
        };
        let engine = DenseEngine::from_config(&config);
        assert_eq!(engine.order(), QubitOrder::Reversed);
        assert_eq!(engine.tolerance(), 1e-6);
        assert!(matches!(
            engine.build_operator(&Circuit::new(4).unwrap()),
            Err(SimError::TooManyQubits { .. })
        ));
    }

    #[test]
    fn test_global_phase_comparison() {
        let x = Unitary2x2::x().to_array();
        let ix = x.mapv(|e| e * c(0.0, 1.0));
        assert!(!allclose(&x, &ix, 1e-9));
        assert!(equal_up_to_global_phase(&x, &ix, 1e-9));
        assert!(!equal_up_to_global_phase(&x, &Unitary2x2::z().to_array(), 1e-9));
    }
}
