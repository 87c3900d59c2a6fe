//! Ângulo de armazenamento
//!
//! `find_angle(j) = -2·acos(√((j-1)/j))`, com `j = N + 1 - i` para o padrão na
//! posição `i` (1-based) de uma lista de tamanho `N`. O resultado fica em
//! `[-π, 0]`: `sin(θ/2) ≤ 0` e `cos(θ/2) ≥ 0`, e o armazenamento depende desse
//! sinal, não só da magnitude.

use crate::error::{MemoryError, MemoryResult};

/// Ângulo da rotação controlada para o índice `j >= 1`
pub fn find_angle(j: f64) -> MemoryResult<f64> {
    if !j.is_finite() || j < 1.0 {
        return Err(MemoryError::DomainError(j));
    }
    Ok(-2.0 * ((j - 1.0) / j).sqrt().acos())
}

/// Ângulo para o padrão na posição `position` (1-based) de uma lista com `total` padrões
pub fn position_angle(position: usize, total: usize) -> MemoryResult<f64> {
    find_angle(total as f64 + 1.0 - position as f64)
}
