//! Algoritmo de armazenamento
//!
//! Cada padrão da lista passa por nove passos sobre os registradores
//! `p` (padrão), `u` (ancila, 2 qubits) e `m` (memória compartilhada):
//!
//! ```text
//! 1. X(p) conforme os bits do padrão
//! 2. Toffoli(p[k], u[1] → m[k])            ┐
//! 3. CNOT(p[k] → m[k]); X(m[k])            │ compute
//! 4. X multi-controlado (m → u[0])         ┘
//! 5. Ry(find_angle(N + 1 - i)) em u[1], controlada por u[0]
//! 6-8. adjunta exata de 2-4                  uncompute
//! 9. X(p) conforme os bits do padrão
//! ```
//!
//! Ao fim de cada iteração `p` volta a |0…0⟩ e `u[0]` volta a |0⟩; o efeito
//! acumulado fica em `u[1]` e em `m`.

use qam_state::{Circuit, Gate, GateOp, QuantumError, QuantumProcessor, QubitRegister};
use rand::Rng;

use crate::angle::position_angle;
use crate::error::{MemoryError, MemoryResult};
use crate::pattern::{check_pattern, pattern_circuit};

/// Passos 2-4: cópia do padrão para a memória e marcação em `u[0]`
fn compute_circuit(p: &QubitRegister, u: &QubitRegister, m: &QubitRegister) -> Circuit {
    let mut circuit = Circuit::new();

    for (pk, mk) in p.iter().zip(m.iter()) {
        circuit.add(GateOp::new(Gate::x(), mk).controlled_by([pk, u[1]]));
    }
    for (pk, mk) in p.iter().zip(m.iter()) {
        circuit
            .add(GateOp::new(Gate::x(), mk).controlled_by([pk]))
            .add(GateOp::new(Gate::x(), mk));
    }
    circuit.add(GateOp::new(Gate::x(), u[0]).controlled_by(m.iter()));

    circuit
}

/// Circuito completo de uma iteração (passos 1-9)
///
/// `position` é 1-based e `total` é o tamanho da lista de padrões.
pub fn storage_iteration(
    pattern: u64,
    position: usize,
    total: usize,
    p: &QubitRegister,
    u: &QubitRegister,
    m: &QubitRegister,
) -> MemoryResult<Circuit> {
    check_registers(p, u, m)?;
    let load = pattern_circuit(pattern, p)?;
    let compute = compute_circuit(p, u, m);
    let angle = position_angle(position, total)?;

    let mut circuit = Circuit::new();
    circuit
        .append(load.clone())
        .append(compute.clone())
        .add(GateOp::new(Gate::ry(angle), u[1]).controlled_by([u[0]]))
        .append(compute.adjoint())
        .append(load);

    Ok(circuit)
}

/// Grava `patterns`, em ordem, na memória `m`
///
/// Pré-condição: `u[1]` em |1⟩ e `p`, `u[0]` em |0⟩. Todos os padrões são
/// validados antes de qualquer porta ser aplicada.
pub fn storage_algorithm<R: Rng>(
    qp: &mut QuantumProcessor<R>,
    patterns: &[u64],
    p: &QubitRegister,
    u: &QubitRegister,
    m: &QubitRegister,
) -> MemoryResult<()> {
    check_registers(p, u, m)?;
    for &pattern in patterns {
        check_pattern(pattern, p.len())?;
    }
    if patterns.is_empty() {
        return Ok(());
    }

    let probability = qp.probability_one(u[1])?;
    if probability < 1.0 - qp.config().norm_tolerance {
        return Err(MemoryError::AncillaNotPrepared { probability });
    }

    let total = patterns.len();
    for (idx, &pattern) in patterns.iter().enumerate() {
        let circuit = storage_iteration(pattern, idx + 1, total, p, u, m)?;
        tracing::debug!(pattern, position = idx + 1, gates = circuit.len(), "storing pattern");
        circuit.execute(qp)?;
    }

    tracing::info!(patterns = total, width = p.len(), "storage complete");
    Ok(())
}

fn check_registers(p: &QubitRegister, u: &QubitRegister, m: &QubitRegister) -> MemoryResult<()> {
    if p.is_empty() {
        return Err(MemoryError::EmptyRegister("pattern"));
    }
    if u.len() != 2 {
        return Err(MemoryError::RegisterMismatch {
            name: "ancilla",
            expected: 2,
            actual: u.len(),
        });
    }
    if m.len() != p.len() {
        return Err(MemoryError::RegisterMismatch {
            name: "memory",
            expected: p.len(),
            actual: m.len(),
        });
    }
    if let Some(qubit) = QubitRegister::first_shared(&[p, u, m]) {
        return Err(QuantumError::InvalidIndex {
            qubit,
            reason: "qubit shared between registers",
        }
        .into());
    }
    Ok(())
}
