//! # Quantum Gates — Portas Quânticas
//!
//! Catálogo fechado de portas single-qubit e a álgebra de descritores que
//! deriva adjuntas, potências e conjugações a partir da definição base.
//!
//! ## Gates Implementadas
//!
//! - **Base**: X (Pauli), H (Hadamard), P(φ) (fase), Ry(θ)
//! - **Compostas**: `U(n) = X·P(π/2n)·X`, `U⁻²` (via [`Gate::cu_squared`])
//!
//! A forma controlada não é uma porta nova: é um [`GateOp`](crate::GateOp)
//! com lista de controles, aplicado pelo processador apenas no subespaço em
//! que todos os controles estão em |1⟩.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Matriz 2x2 complexa para gates single-qubit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix2x2 {
    /// Elementos: [[a, b], [c, d]]
    pub elements: [[Complex64; 2]; 2],
}

impl Matrix2x2 {
    /// Cria matriz identidade
    pub fn identity() -> Self {
        Self {
            elements: [[ONE, ZERO], [ZERO, ONE]],
        }
    }

    /// Aplica gate a um par de amplitudes [alpha, beta]
    pub fn apply(&self, state: [Complex64; 2]) -> [Complex64; 2] {
        let [alpha, beta] = state;
        let [[a, b], [c, d]] = self.elements;

        [a * alpha + b * beta, c * alpha + d * beta]
    }

    /// Multiplicação de matrizes
    pub fn mul(&self, other: &Matrix2x2) -> Matrix2x2 {
        let [[a, b], [c, d]] = self.elements;
        let [[e, f], [g, h]] = other.elements;

        Matrix2x2 {
            elements: [
                [a * e + b * g, a * f + b * h],
                [c * e + d * g, c * f + d * h],
            ],
        }
    }

    /// Potência inteira (M^0 = I)
    pub fn pow(&self, k: u32) -> Matrix2x2 {
        (0..k).fold(Matrix2x2::identity(), |acc, _| acc.mul(self))
    }

    /// Transposta conjugada (dagger)
    pub fn dagger(&self) -> Matrix2x2 {
        let [[a, b], [c, d]] = self.elements;
        Matrix2x2 {
            elements: [[a.conj(), c.conj()], [b.conj(), d.conj()]],
        }
    }

    /// Compara elemento a elemento com tolerância
    pub fn approx_eq(&self, other: &Matrix2x2, epsilon: f64) -> bool {
        self.elements
            .iter()
            .flatten()
            .zip(other.elements.iter().flatten())
            .all(|(x, y)| (x - y).norm() < epsilon)
    }
}

/// Trait para portas quânticas
pub trait QuantumGate: Send + Sync {
    /// Nome da porta
    fn name(&self) -> &'static str;

    /// Matriz da porta (2x2 para single-qubit)
    fn matrix(&self) -> Matrix2x2;

    /// Verifica se é unitária
    fn is_unitary(&self) -> bool {
        let m = self.matrix();
        m.mul(&m.dagger()).approx_eq(&Matrix2x2::identity(), 1e-10)
    }

    /// Aplica a um estado
    fn apply(&self, state: [Complex64; 2]) -> [Complex64; 2] {
        self.matrix().apply(state)
    }
}

// =============================================================================
// Portas Padrão
// =============================================================================

/// Porta Hadamard: cria superposição
#[derive(Clone, Copy, Debug, Default)]
pub struct Hadamard;

impl QuantumGate for Hadamard {
    fn name(&self) -> &'static str {
        "H"
    }

    fn matrix(&self) -> Matrix2x2 {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Matrix2x2 {
            elements: [[h, h], [h, -h]],
        }
    }
}

/// Porta Pauli-X (NOT quântico)
#[derive(Clone, Copy, Debug, Default)]
pub struct PauliX;

impl QuantumGate for PauliX {
    fn name(&self) -> &'static str {
        "X"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2 {
            elements: [[ZERO, ONE], [ONE, ZERO]],
        }
    }
}

/// Porta de rotação em Y
#[derive(Clone, Copy, Debug)]
pub struct RotationY {
    pub theta: f64,
}

impl RotationY {
    pub fn new(theta: f64) -> Self {
        Self { theta }
    }
}

impl QuantumGate for RotationY {
    fn name(&self) -> &'static str {
        "Ry"
    }

    fn matrix(&self) -> Matrix2x2 {
        let c = (self.theta / 2.0).cos();
        let s = (self.theta / 2.0).sin();
        Matrix2x2 {
            elements: [
                [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
            ],
        }
    }
}

/// Porta de fase genérica: diag(1, e^{iφ})
#[derive(Clone, Copy, Debug)]
pub struct Phase {
    pub phi: f64,
}

impl Phase {
    pub fn new(phi: f64) -> Self {
        Self { phi }
    }
}

impl QuantumGate for Phase {
    fn name(&self) -> &'static str {
        "P"
    }

    fn matrix(&self) -> Matrix2x2 {
        Matrix2x2 {
            elements: [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, self.phi)]],
        }
    }
}

// =============================================================================
// Álgebra de descritores
// =============================================================================

/// Unitária base do catálogo
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    PauliX,
    Hadamard,
    Phase(f64),
    RotationY(f64),
    /// `outer · inner · outer†`
    Conjugated {
        inner: Box<GateKind>,
        outer: Box<GateKind>,
    },
}

impl GateKind {
    pub fn matrix(&self) -> Matrix2x2 {
        match self {
            Self::PauliX => PauliX.matrix(),
            Self::Hadamard => Hadamard.matrix(),
            Self::Phase(phi) => Phase::new(*phi).matrix(),
            Self::RotationY(theta) => RotationY::new(*theta).matrix(),
            Self::Conjugated { inner, outer } => {
                let o = outer.matrix();
                o.mul(&inner.matrix()).mul(&o.dagger())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PauliX => PauliX.name(),
            Self::Hadamard => Hadamard.name(),
            Self::Phase(_) => "P",
            Self::RotationY(_) => "Ry",
            Self::Conjugated { .. } => "Conj",
        }
    }

    /// Portas que são a própria inversa
    fn is_involution(&self) -> bool {
        match self {
            Self::PauliX | Self::Hadamard => true,
            Self::Conjugated { inner, .. } => inner.is_involution(),
            _ => false,
        }
    }
}

/// Descritor de porta: unitária base, potência e flag de adjunta
///
/// A matriz efetiva é `(base^power)†` quando `adjoint` está ativo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    power: u32,
    adjoint: bool,
}

impl Gate {
    /// Cria descritor a partir da unitária base
    pub fn new(kind: GateKind) -> Self {
        Self {
            kind,
            power: 1,
            adjoint: false,
        }
    }

    pub fn x() -> Self {
        Self::new(GateKind::PauliX)
    }

    pub fn h() -> Self {
        Self::new(GateKind::Hadamard)
    }

    pub fn phase(phi: f64) -> Self {
        Self::new(GateKind::Phase(phi))
    }

    pub fn ry(theta: f64) -> Self {
        Self::new(GateKind::RotationY(theta))
    }

    /// `U(n) = X · P(π/2n) · X`: fase aplicada ao eixo invertido
    pub fn u(n: usize) -> Self {
        Self::new(GateKind::Conjugated {
            inner: Box::new(GateKind::Phase(PI / (2.0 * n as f64))),
            outer: Box::new(GateKind::PauliX),
        })
    }

    /// `U(n)⁻²`, a porta que a recuperação aplica controlada pelo qubit de controle
    pub fn cu_squared(n: usize) -> Self {
        Self::u(n).pow(2).adjoint()
    }

    /// Inverte a flag de adjunta
    pub fn adjoint(mut self) -> Self {
        if !self.kind.is_involution() {
            self.adjoint = !self.adjoint;
        }
        self
    }

    /// Eleva à potência `k`
    pub fn pow(mut self, k: u32) -> Self {
        self.power *= k;
        self
    }

    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn is_adjoint(&self) -> bool {
        self.adjoint
    }

    /// Matriz efetiva
    pub fn matrix(&self) -> Matrix2x2 {
        let m = self.kind.matrix().pow(self.power);
        if self.adjoint { m.dagger() } else { m }
    }
}

impl QuantumGate for Gate {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn matrix(&self) -> Matrix2x2 {
        Gate::matrix(self)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            GateKind::Phase(phi) => write!(f, "P({phi:.4})")?,
            GateKind::RotationY(theta) => write!(f, "Ry({theta:.4})")?,
            GateKind::Conjugated { inner, outer } => {
                write!(f, "({}·{}·{}†)", outer.name(), inner.name(), outer.name())?
            }
            kind => write!(f, "{}", kind.name())?,
        }
        if self.power != 1 {
            write!(f, "^{}", self.power)?;
        }
        if self.adjoint {
            write!(f, "†")?;
        }
        Ok(())
    }
}

// =============================================================================
// Testes
// =============================================================================
