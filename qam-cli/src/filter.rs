//! Pós-processamento clássico das medições da extração

use qam_memory::bools_to_int;
use serde::Serialize;
use std::collections::BTreeMap;

/// Número de bits em 1
pub fn hamming_weight(bits: &[bool]) -> u32 {
    bits.iter().filter(|&&b| b).count() as u32
}

/// Mantém cada string cujo peso é no máximo `max_degree`
pub fn filter_high_degree_terms(shots: Vec<Vec<bool>>, max_degree: u32) -> Vec<Vec<bool>> {
    shots
        .into_iter()
        .filter(|bits| hamming_weight(bits) <= max_degree)
        .collect()
}

/// String little endian: o primeiro caractere é o bit 0
pub fn bit_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Contagem de um resultado da extração
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCount {
    pub value: u64,
    pub bits: String,
    pub count: usize,
    pub weight: u32,
}

/// Agrupa as medições por valor, em ordem crescente
pub fn tally(shots: &[Vec<bool>]) -> Vec<OutcomeCount> {
    let mut counts: BTreeMap<u64, OutcomeCount> = BTreeMap::new();
    for bits in shots {
        counts
            .entry(bools_to_int(bits))
            .or_insert_with(|| OutcomeCount {
                value: bools_to_int(bits),
                bits: bit_string(bits),
                count: 0,
                weight: hamming_weight(bits),
            })
            .count += 1;
    }
    counts.into_values().collect()
}
