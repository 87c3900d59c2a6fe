//! Tipos de erro para qam-memory

use qam_state::QuantumError;
use thiserror::Error;

/// Resultado customizado para operações da memória associativa
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Erros que podem ocorrer em armazenamento e recuperação
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MemoryError {
    #[error("Quantum error: {0}")]
    Quantum(#[from] QuantumError),

    #[error("Angle domain error: j = {0} (expected finite j >= 1)")]
    DomainError(f64),

    #[error("Pattern {pattern} does not fit in {width} qubits")]
    PatternOverflow { pattern: u64, width: usize },

    #[error("Register mismatch: {name} has {actual} qubits, expected {expected}")]
    RegisterMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Ancilla u[1] must be prepared in |1⟩ (P(1) = {probability})")]
    AncillaNotPrepared { probability: f64 },

    #[error("Empty register: {0}")]
    EmptyRegister(&'static str),
}
