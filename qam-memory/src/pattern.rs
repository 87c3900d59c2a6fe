//! Codificação de padrões inteiros em registradores
//!
//! O bit `k` do padrão (little endian) controla um X no qubit `k` do registrador.

use qam_state::{Circuit, Gate, GateOp, QuantumProcessor, QubitRegister};
use rand::Rng;

use crate::error::{MemoryError, MemoryResult};

/// Verifica se `pattern` cabe em `width` qubits
pub fn check_pattern(pattern: u64, width: usize) -> MemoryResult<()> {
    if width < u64::BITS as usize && pattern >> width != 0 {
        return Err(MemoryError::PatternOverflow { pattern, width });
    }
    Ok(())
}

/// Número de qubits para representar `value`
pub fn bits_needed(value: u64) -> usize {
    (u64::BITS - value.leading_zeros()) as usize
}

/// X em cada qubit cujo bit correspondente de `pattern` é 1
pub fn pattern_circuit(pattern: u64, register: &QubitRegister) -> MemoryResult<Circuit> {
    check_pattern(pattern, register.len())?;
    Ok(register
        .iter()
        .enumerate()
        .filter(|(k, _)| (pattern >> k) & 1 == 1)
        .map(|(_, q)| GateOp::new(Gate::x(), q))
        .collect())
}

/// Aplica o padrão ao registrador (involução: aplicar duas vezes desfaz)
pub fn apply_pauli_from_int<R: Rng>(
    qp: &mut QuantumProcessor<R>,
    pattern: u64,
    register: &QubitRegister,
) -> MemoryResult<()> {
    pattern_circuit(pattern, register)?.execute(qp)?;
    Ok(())
}

/// Lê um vetor de resultados de medição como inteiro little endian
pub fn bools_to_int(bits: &[bool]) -> u64 {
    bits.iter()
        .enumerate()
        .fold(0, |acc, (k, &b)| acc | (u64::from(b) << k))
}
