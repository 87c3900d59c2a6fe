//! Extração estilo Bernstein–Vazirani
//!
//! `H^⊗n` no registrador de consulta, recuperação, `H^⊗n` de novo e medição
//! de cada qubit de consulta (com reset). Se a relação codificada for linear
//! nos bits da consulta, o resultado são os coeficientes ocultos; caso
//! contrário é uma amostra da distribuição induzida.

use qam_state::{Circuit, Gate, QuantumProcessor, QubitId, QubitRegister};
use rand::Rng;

use crate::error::MemoryResult;
use crate::retrieval::retrieval_circuit;

/// Parte unitária da extração (sem a medição final)
pub fn extraction_circuit(i: &QubitRegister, m: &QubitRegister, c: QubitId) -> MemoryResult<Circuit> {
    let retrieval = retrieval_circuit(i, m, c)?;

    let mut circuit = Circuit::new();
    circuit
        .add_each(&Gate::h(), i)
        .append(retrieval)
        .add_each(&Gate::h(), i);
    Ok(circuit)
}

/// Executa a extração e mede o registrador de consulta
///
/// O bit `k` do resultado corresponde a `i[k]`; todos os qubits de `i`
/// terminam em |0⟩.
pub fn extract<R: Rng>(
    qp: &mut QuantumProcessor<R>,
    i: &QubitRegister,
    m: &QubitRegister,
    c: QubitId,
) -> MemoryResult<Vec<bool>> {
    extraction_circuit(i, m, c)?.execute(qp)?;
    let bits = qp.measure_all(i)?;
    tracing::debug!(?bits, "extraction measured");
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(ids: &[usize]) -> QubitRegister {
        QubitRegister::new(ids.iter().map(|&i| QubitId(i)).collect())
    }

    #[test]
    fn test_circuit_wraps_retrieval_in_hadamards() {
        let (i, m) = (reg(&[0, 1]), reg(&[2, 3]));
        let c = extraction_circuit(&i, &m, QubitId(4)).unwrap();
        let inner = retrieval_circuit(&i, &m, QubitId(4)).unwrap();
        assert_eq!(c.len(), inner.len() + 4);
        assert_eq!(c.ops()[0].gate, Gate::h());
        assert_eq!(c.ops()[c.len() - 1].target, QubitId(1));
    }

    #[test]
    fn test_extract_resets_query_register() {
        let mut qp = QuantumProcessor::seeded(21);
        let i = qp.allocate(2).unwrap();
        let m = qp.allocate(2).unwrap();
        let c = qp.allocate(1).unwrap();

        let bits = extract(&mut qp, &i, &m, c[0]).unwrap();
        assert_eq!(bits.len(), 2);
        let dist = qp.probabilities(i.as_slice()).unwrap();
        assert!((dist[0] - 1.0).abs() < 1e-9);
    }
}
