//! Relatório de estado para diagnóstico
//!
//! Lista os termos da base com probabilidade relevante. As strings de bits
//! são little endian: o primeiro caractere é o qubit 0.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Um termo da base computacional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisTerm {
    pub index: usize,
    pub bits: String,
    pub re: f64,
    pub im: f64,
    pub probability: f64,
    pub phase: f64,
}

/// Termos com probabilidade acima do limiar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub num_qubits: usize,
    pub terms: Vec<BasisTerm>,
}

impl StateReport {
    pub fn from_amplitudes(amplitudes: &[Complex64], num_qubits: usize, threshold: f64) -> Self {
        let terms = amplitudes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm_sqr() > threshold)
            .map(|(index, a)| BasisTerm {
                index,
                bits: (0..num_qubits)
                    .map(|k| if (index >> k) & 1 == 1 { '1' } else { '0' })
                    .collect(),
                re: a.re,
                im: a.im,
                probability: a.norm_sqr(),
                phase: a.arg(),
            })
            .collect();

        Self { num_qubits, terms }
    }

    /// Soma das probabilidades listadas
    pub fn total_probability(&self) -> f64 {
        self.terms.iter().map(|t| t.probability).sum()
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basis | Amplitude           | Probability | Phase")?;
        writeln!(f, "------------------------------------------------------")?;
        for t in &self.terms {
            writeln!(
                f,
                "|{}⟩ | {:+.4}{:+.4}i | {:9.4}% | {:+.4}",
                t.bits,
                t.re,
                t.im,
                t.probability * 100.0,
                t.phase
            )?;
        }
        Ok(())
    }
}
