//! 2x2 base matrices for single-qubit gates.
//!
//! Every dense-engine gate is lifted from one of these, either directly or
//! through a fixed decomposition into single-qubit steps.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Tolerance for floating point comparisons.
const EPSILON: f64 = 1e-10;

/// A 2x2 matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    fn real(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::new(
            Complex64::new(a, 0.0),
            Complex64::new(b, 0.0),
            Complex64::new(c, 0.0),
            Complex64::new(d, 0.0),
        )
    }

    fn diag(a: Complex64, d: Complex64) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        Self::new(a, zero, zero, d)
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::real(1.0, 0.0, 0.0, 1.0)
    }

    /// Projector onto |0⟩.
    pub fn proj0() -> Self {
        Self::real(1.0, 0.0, 0.0, 0.0)
    }

    /// Projector onto |1⟩.
    pub fn proj1() -> Self {
        Self::real(0.0, 0.0, 0.0, 1.0)
    }

    /// Projector onto the basis state selected by `bit`.
    pub fn projector(bit: u8) -> Self {
        if bit == 0 { Self::proj0() } else { Self::proj1() }
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = 1.0 / 2.0_f64.sqrt();
        Self::real(s, s, s, -s)
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::real(0.0, 1.0, 1.0, 0.0)
    }

    /// Create a Pauli-Y matrix.
    pub fn y() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Z matrix.
    pub fn z() -> Self {
        Self::real(1.0, 0.0, 0.0, -1.0)
    }

    /// Create an S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self::p(PI / 2.0)
    }

    /// Create an S-dagger gate.
    pub fn sdg() -> Self {
        Self::p(-PI / 2.0)
    }

    /// Create a T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::p(PI / 4.0)
    }

    /// Create a T-dagger gate.
    pub fn tdg() -> Self {
        Self::p(-PI / 4.0)
    }

    /// Create an SX gate (sqrt(X)).
    pub fn sx() -> Self {
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        Self::new(half + half_i, half - half_i, half - half_i, half + half_i)
    }

    /// Create an SX-dagger gate.
    pub fn sxdg() -> Self {
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        Self::new(half - half_i, half + half_i, half + half_i, half - half_i)
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::real(c, -s, s, c)
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::diag(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Create a phase gate P(lambda).
    pub fn p(lambda: f64) -> Self {
        Self::diag(Complex64::new(1.0, 0.0), Complex64::from_polar(1.0, lambda))
    }

    /// Create a U gate `e^{iγ}·U(θ, φ, λ)`.
    pub fn u(theta: f64, phi: f64, lambda: f64, gamma: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
        .scale(Complex64::from_polar(1.0, gamma))
    }

    /// Create an R(θ, φ) gate: rotation by θ about `cos(φ)X + sin(φ)Y`.
    pub fn r(theta: f64, phi: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let minus_i = Complex64::new(0.0, -1.0);
        Self::new(
            Complex64::new(c, 0.0),
            minus_i * Complex64::from_polar(s, -phi),
            minus_i * Complex64::from_polar(s, phi),
            Complex64::new(c, 0.0),
        )
    }

    /// Create `e^{iθ}·I`.
    pub fn scalar(theta: f64) -> Self {
        Self::identity().scale(Complex64::from_polar(1.0, theta))
    }

    /// Multiply every element by `factor`.
    #[must_use]
    pub fn scale(&self, factor: Complex64) -> Self {
        Self {
            data: self.data.map(|e| e * factor),
        }
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Check if this is exactly the identity, within tolerance.
    pub fn is_identity(&self) -> bool {
        let id = Self::identity();
        self.data
            .iter()
            .zip(id.data.iter())
            .all(|(a, b)| (a - b).norm() < EPSILON)
    }

    /// Convert to a dense 2x2 array.
    pub fn to_array(&self) -> Array2<Complex64> {
        Array2::from_shape_fn((2, 2), |(row, col)| self.data[2 * row + col])
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}
