//! Tipos de erro para qam-state

use thiserror::Error;

use crate::register::QubitId;

/// Resultado customizado para operações quânticas
pub type QuantumResult<T> = Result<T, QuantumError>;

/// Erros que podem ocorrer em operações quânticas
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    #[error("Invalid qubit index {qubit}: {reason}")]
    InvalidIndex { qubit: QubitId, reason: &'static str },

    #[error("Qubit {qubit} released while not in |0⟩ (P(1) = {probability:.3e})")]
    DirtyRelease { qubit: QubitId, probability: f64 },

    #[error("State norm drifted to {norm} (tolerance {tolerance:e})")]
    NormDrift { norm: f64, tolerance: f64 },

    #[error("Cannot hold {requested} qubits: limit is {max}")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}
