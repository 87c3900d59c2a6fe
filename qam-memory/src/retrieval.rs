//! Algoritmo de recuperação
//!
//! Interferômetro com phase kickback: o controle `c` entra em |+⟩, a memória
//! é comparada com a consulta (`m[k] ← ¬(i[k] ⊕ m[k])`), cada qubit de memória
//! recebe `U` incondicional e `U⁻²` controlada por `c`, a comparação é
//! desfeita e um Hadamard final converte a fase de `c` em população.
//!
//! Para um ramo de memória a distância de Hamming `d` da consulta, a fase
//! relativa entre os ramos de `c` é `π·d/n`, logo `P(c = 1) = sin²(π·d/2n)`.

use qam_state::{Circuit, Gate, GateOp, QuantumError, QuantumProcessor, QubitId, QubitRegister};
use rand::Rng;

use crate::error::{MemoryError, MemoryResult};

/// `m[k] ← ¬(i[k] ⊕ m[k])` para cada `k`
fn twiddle_circuit(i: &QubitRegister, m: &QubitRegister) -> Circuit {
    let mut circuit = Circuit::new();
    for (ik, mk) in i.iter().zip(m.iter()) {
        circuit
            .add(GateOp::new(Gate::x(), mk).controlled_by([ik]))
            .add(GateOp::new(Gate::x(), mk));
    }
    circuit
}

/// Circuito de recuperação para consulta `i`, memória `m` e controle `c`
pub fn retrieval_circuit(i: &QubitRegister, m: &QubitRegister, c: QubitId) -> MemoryResult<Circuit> {
    check_registers(i, m, c)?;
    let n = m.len();
    let twiddle = twiddle_circuit(i, m);

    let mut circuit = Circuit::new();
    circuit.add(GateOp::new(Gate::h(), c)).append(twiddle.clone());
    circuit.add_each(&Gate::u(n), m);
    for q in m {
        circuit.add(GateOp::new(Gate::cu_squared(n), q).controlled_by([c]));
    }
    circuit
        .append(twiddle.adjoint())
        .add(GateOp::new(Gate::h(), c));

    Ok(circuit)
}

/// Executa a recuperação; a informação de casamento fica na população de `c`
pub fn retrieval_algorithm<R: Rng>(
    qp: &mut QuantumProcessor<R>,
    i: &QubitRegister,
    m: &QubitRegister,
    c: QubitId,
) -> MemoryResult<()> {
    let circuit = retrieval_circuit(i, m, c)?;
    circuit.execute(qp)?;
    tracing::debug!(width = m.len(), %c, gates = circuit.len(), "retrieval applied");
    Ok(())
}

/// `P(c = 1)` esperada para uma memória uniforme sobre `patterns`
///
/// Forma fechada da simulação, útil para validar resultados e para o driver.
pub fn expected_control_probability(patterns: &[u64], query: u64, width: usize) -> f64 {
    if patterns.is_empty() || width == 0 {
        return 0.0;
    }
    let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
    let total: f64 = patterns
        .iter()
        .map(|&p| {
            let d = ((p ^ query) & mask).count_ones() as f64;
            (std::f64::consts::PI * d / (2.0 * width as f64)).sin().powi(2)
        })
        .sum();
    total / patterns.len() as f64
}

pub(crate) fn check_registers(i: &QubitRegister, m: &QubitRegister, c: QubitId) -> MemoryResult<()> {
    if m.is_empty() {
        return Err(MemoryError::EmptyRegister("memory"));
    }
    if i.len() != m.len() {
        return Err(MemoryError::RegisterMismatch {
            name: "query",
            expected: m.len(),
            actual: i.len(),
        });
    }
    if i.as_slice().contains(&c) || m.as_slice().contains(&c) {
        return Err(QuantumError::InvalidIndex {
            qubit: c,
            reason: "control aliases a data qubit",
        }
        .into());
    }
    if let Some(qubit) = QubitRegister::first_shared(&[i, m]) {
        return Err(QuantumError::InvalidIndex {
            qubit,
            reason: "qubit shared between registers",
        }
        .into());
    }
    Ok(())
}
