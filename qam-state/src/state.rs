//! Vetor de estado interno
//!
//! Amplitudes complexas indexadas pela base computacional conjunta, em ordem
//! little endian: o bit `k` do índice é o valor do qubit `k`.

use num_complex::Complex64;

use crate::gates::Matrix2x2;

/// Dados do vetor de estado
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// Amplitudes (tamanho 2^num_qubits)
    amplitudes: Vec<Complex64>,
    /// Número de qubits representados
    num_qubits: usize,
}

impl Default for StateVector {
    fn default() -> Self {
        Self::new(0)
    }
}

impl StateVector {
    /// Cria estado |0…0⟩ com `num_qubits` qubits
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1usize << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Acrescenta `extra` qubits em |0⟩ nos bits mais significativos
    ///
    /// Como os novos bits valem 0, as amplitudes existentes mantêm o índice.
    pub fn grow(&mut self, extra: usize) {
        self.num_qubits += extra;
        self.amplitudes
            .resize(1usize << self.num_qubits, Complex64::new(0.0, 0.0));
    }

    /// Soma dos módulos ao quadrado
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Aplica `m` ao qubit `target` no subespaço em que `(i & control_mask) == control_mask`
    ///
    /// Amplitudes fora desse subespaço não são tocadas.
    pub fn apply_controlled(&mut self, m: &Matrix2x2, target: usize, control_mask: usize) {
        let target_mask = 1usize << target;
        let [[a, b], [c, d]] = m.elements;

        for i in 0..self.amplitudes.len() {
            if i & target_mask != 0 || i & control_mask != control_mask {
                continue;
            }
            let j = i | target_mask;
            let a0 = self.amplitudes[i];
            let a1 = self.amplitudes[j];
            self.amplitudes[i] = a * a0 + b * a1;
            self.amplitudes[j] = c * a0 + d * a1;
        }
    }

    /// Probabilidade de o qubit `qubit` estar em |1⟩
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1usize << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Distribuição conjunta sobre `qubits` (o primeiro é o bit menos significativo)
    pub fn marginal(&self, qubits: &[usize]) -> Vec<f64> {
        let mut dist = vec![0.0; 1usize << qubits.len()];
        for (i, a) in self.amplitudes.iter().enumerate() {
            let key = qubits
                .iter()
                .enumerate()
                .fold(0usize, |acc, (k, &q)| acc | (((i >> q) & 1) << k));
            dist[key] += a.norm_sqr();
        }
        dist
    }

    /// Projeta no resultado `outcome` do qubit e renormaliza
    ///
    /// `probability` é a probabilidade do resultado escolhido e deve ser > 0.
    pub fn collapse(&mut self, qubit: usize, outcome: bool, probability: f64) {
        let mask = 1usize << qubit;
        let scale = 1.0 / probability.sqrt();
        for (i, a) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *a *= scale;
            } else {
                *a = Complex64::new(0.0, 0.0);
            }
        }
    }
}
