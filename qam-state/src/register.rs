//! Registradores de qubits
//!
//! Um [`QubitRegister`] é uma sequência ordenada de slots físicos do
//! [`QuantumProcessor`](crate::QuantumProcessor). O índice 0 é o bit menos
//! significativo quando o registrador é lido como inteiro (little endian).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Index, RangeBounds, Bound};

/// Índice físico de um qubit no vetor de amplitudes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub usize);

impl QubitId {
    /// Máscara do bit correspondente no índice da base computacional
    pub fn mask(self) -> usize {
        1usize << self.0
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Sequência ordenada de qubits com um papel lógico
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitRegister {
    qubits: Vec<QubitId>,
}

impl QubitRegister {
    /// Cria registrador a partir de qubits já alocados
    pub fn new(qubits: Vec<QubitId>) -> Self {
        Self { qubits }
    }

    /// Número de qubits
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Verifica se está vazio
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Qubit na posição `k`, se existir
    pub fn get(&self, k: usize) -> Option<QubitId> {
        self.qubits.get(k).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = QubitId> + ExactSizeIterator + '_ {
        self.qubits.iter().copied()
    }

    pub fn as_slice(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Sub-registrador (visão) sobre os mesmos qubits físicos
    ///
    /// Faixas fora dos limites são truncadas ao tamanho do registrador.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> QubitRegister {
        let len = self.qubits.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .clamp(start, len);

        QubitRegister::new(self.qubits[start..end].to_vec())
    }

    /// Máscara com todos os bits do registrador
    pub fn mask(&self) -> usize {
        self.qubits.iter().fold(0, |acc, q| acc | q.mask())
    }

    /// Primeiro qubit que aparece mais de uma vez entre `registers`
    ///
    /// Cobre tanto repetição dentro de um registrador quanto sobreposição
    /// entre registradores distintos.
    pub fn first_shared(registers: &[&QubitRegister]) -> Option<QubitId> {
        let mut seen = BTreeSet::new();
        registers
            .iter()
            .flat_map(|r| r.iter())
            .find(|q| !seen.insert(*q))
    }
}

impl Index<usize> for QubitRegister {
    type Output = QubitId;

    fn index(&self, k: usize) -> &QubitId {
        &self.qubits[k]
    }
}

impl<'a> IntoIterator for &'a QubitRegister {
    type Item = QubitId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, QubitId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.qubits.iter().copied()
    }
}

impl From<Vec<QubitId>> for QubitRegister {
    fn from(qubits: Vec<QubitId>) -> Self {
        Self::new(qubits)
    }
}
