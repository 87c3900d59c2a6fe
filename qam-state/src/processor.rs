//! Processador de estados quânticos
//!
//! Dono exclusivo do vetor de amplitudes. Todo o resto do sistema muda o
//! estado apenas por [`QuantumProcessor::apply`], [`QuantumProcessor::measure`]
//! e pelo ciclo de vida de registradores.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::circuit::GateOp;
use crate::error::{QuantumError, QuantumResult};
use crate::gates::{Gate, PauliX, QuantumGate};
use crate::register::{QubitId, QubitRegister};
use crate::report::StateReport;
use crate::state::StateVector;

/// Configuração do processador quântico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantumConfig {
    /// Desvio máximo da norma em relação a 1
    pub norm_tolerance: f64,
    /// Verificar a norma após cada porta e medição
    pub check_norm: bool,
    /// Limite de qubits do vetor de estado (memória cresce com 2^n)
    pub max_qubits: usize,
    /// Semente da fonte aleatória; `None` usa entropia do sistema
    pub seed: Option<u64>,
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            norm_tolerance: 1e-9,
            check_norm: true,
            max_qubits: 24,
            seed: None,
        }
    }
}

/// Cópia do vetor de estado e dos slots livres
///
/// Restaurada por [`QuantumProcessor::restore`] para desfazer uma sequência
/// de portas interrompida por erro.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    state: StateVector,
    free: BTreeSet<usize>,
}

/// Processador de estados quânticos
///
/// A fonte aleatória `R` só é consultada em [`measure`](Self::measure).
#[derive(Debug, Clone)]
pub struct QuantumProcessor<R = StdRng> {
    /// Vetor de amplitudes
    state: StateVector,
    /// Slots livres, todos em |0⟩
    free: BTreeSet<usize>,
    /// Configuração
    config: QuantumConfig,
    rng: R,
    /// Número de medições realizadas
    measurement_count: u64,
}

impl QuantumProcessor<StdRng> {
    /// Cria novo processador sem qubits
    pub fn new() -> Self {
        Self::with_config(QuantumConfig::default())
    }

    /// Cria processador com configuração customizada
    pub fn with_config(config: QuantumConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Cria processador reprodutível a partir de uma semente
    pub fn seeded(seed: u64) -> Self {
        Self::with_config(QuantumConfig {
            seed: Some(seed),
            ..QuantumConfig::default()
        })
    }

    /// Cria contexto com `n` qubits lógicos livres em |0⟩
    pub fn with_qubits(n: usize) -> QuantumResult<Self> {
        let mut qp = Self::new();
        qp.reserve(n)?;
        Ok(qp)
    }
}

impl Default for QuantumProcessor<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuantumProcessor<R> {
    /// Cria processador com fonte aleatória injetada
    pub fn with_rng(config: QuantumConfig, rng: R) -> Self {
        Self {
            state: StateVector::new(0),
            free: BTreeSet::new(),
            config,
            rng,
            measurement_count: 0,
        }
    }

    /// Retorna configuração
    pub fn config(&self) -> &QuantumConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut QuantumConfig {
        &mut self.config
    }

    /// Número de qubits físicos no vetor de estado
    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    /// Número de qubits atualmente alocados
    pub fn live_qubits(&self) -> usize {
        self.state.num_qubits() - self.free.len()
    }

    pub fn measurement_count(&self) -> u64 {
        self.measurement_count
    }

    /// Snapshot somente-leitura das amplitudes (diagnóstico)
    pub fn amplitudes(&self) -> &[Complex64] {
        self.state.amplitudes()
    }

    pub fn norm(&self) -> f64 {
        self.state.norm_sqr().sqrt()
    }

    // -------------------------------------------------------------------------
    // Ciclo de vida de registradores
    // -------------------------------------------------------------------------

    /// Acrescenta `n` slots livres ao vetor de estado
    pub fn reserve(&mut self, n: usize) -> QuantumResult<()> {
        let requested = self.state.num_qubits() + n;
        if requested > self.config.max_qubits {
            return Err(QuantumError::CapacityExceeded {
                requested,
                max: self.config.max_qubits,
            });
        }
        let start = self.state.num_qubits();
        self.state.grow(n);
        self.free.extend(start..requested);
        Ok(())
    }

    /// Aloca registrador de `n` qubits em |0⟩
    ///
    /// Reutiliza slots liberados (menor índice primeiro) e só então cresce o vetor.
    pub fn allocate(&mut self, n: usize) -> QuantumResult<QubitRegister> {
        if n > self.free.len() {
            self.reserve(n - self.free.len())?;
        }
        let qubits: Vec<QubitId> = (0..n)
            .filter_map(|_| self.free.pop_first())
            .map(QubitId)
            .collect();

        tracing::debug!(
            qubits = ?qubits.iter().map(|q| q.0).collect::<Vec<_>>(),
            total = self.state.num_qubits(),
            "allocated register"
        );
        Ok(QubitRegister::new(qubits))
    }

    /// Libera registrador; todos os qubits precisam estar em |0⟩
    pub fn release(&mut self, register: &QubitRegister) -> QuantumResult<()> {
        for q in register {
            self.ensure_live(q)?;
        }
        let mut residual = Vec::new();
        for q in register {
            let probability = self.state.probability_one(q.0);
            if probability > self.config.norm_tolerance {
                return Err(QuantumError::DirtyRelease { qubit: q, probability });
            }
            if probability > 0.0 {
                residual.push((q, probability));
            }
        }
        // resíduo abaixo da tolerância é projetado em |0⟩ exato
        for (q, probability) in residual {
            let p_zero = self.state.norm_sqr() - self.state.probability_one(q.0);
            self.state.collapse(q.0, false, p_zero);
            tracing::trace!(%q, probability, "projected residual on release");
        }
        self.free.extend(register.iter().map(|q| q.0));
        tracing::debug!(len = register.len(), "released register");
        Ok(())
    }

    /// Aloca, executa `f` e libera com reset forçado em qualquer caminho de saída
    ///
    /// O erro de `f` tem precedência sobre um eventual erro de limpeza.
    pub fn with_register<T, E, F>(&mut self, n: usize, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self, &QubitRegister) -> Result<T, E>,
        E: From<QuantumError>,
    {
        let register = self.allocate(n)?;
        let result = f(self, &register);
        let cleanup = self
            .reset_all(&register)
            .and_then(|()| self.release(&register));

        match (result, cleanup) {
            (Ok(value), Ok(())) => Ok(value),
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => Err(e.into()),
        }
    }

    /// Salva o estado atual para um eventual [`restore`](Self::restore)
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state.clone(),
            free: self.free.clone(),
        }
    }

    /// Volta ao estado salvo em `checkpoint`
    ///
    /// Contagem de medições e fonte aleatória não retrocedem.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.state = checkpoint.state;
        self.free = checkpoint.free;
        tracing::debug!(qubits = self.state.num_qubits(), "restored checkpoint");
    }

    // -------------------------------------------------------------------------
    // Portas
    // -------------------------------------------------------------------------

    /// Aplica uma operação, validando índices e a norma resultante
    pub fn apply(&mut self, op: &GateOp) -> QuantumResult<()> {
        self.ensure_live(op.target)?;
        let mut control_mask = 0usize;
        for &c in &op.controls {
            self.ensure_live(c)?;
            if c == op.target {
                return Err(QuantumError::InvalidIndex {
                    qubit: c,
                    reason: "qubit is both target and control",
                });
            }
            if control_mask & c.mask() != 0 {
                return Err(QuantumError::InvalidIndex {
                    qubit: c,
                    reason: "control listed twice",
                });
            }
            control_mask |= c.mask();
        }

        tracing::trace!(op = %op, "apply");
        self.state
            .apply_controlled(&op.gate.matrix(), op.target.0, control_mask);
        self.check_norm()
    }

    /// Aplica `gate` a cada alvo, com os mesmos controles
    pub fn apply_gate(
        &mut self,
        gate: &Gate,
        targets: &[QubitId],
        controls: &[QubitId],
    ) -> QuantumResult<()> {
        if let Some(&q) = targets.iter().find(|t| controls.contains(t)) {
            return Err(QuantumError::InvalidIndex {
                qubit: q,
                reason: "qubit is both target and control",
            });
        }
        for &target in targets {
            self.apply(&GateOp::new(gate.clone(), target).controlled_by(controls.iter().copied()))?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Medição
    // -------------------------------------------------------------------------

    /// Mede na base computacional, colapsa e devolve o qubit a |0⟩
    pub fn measure(&mut self, qubit: QubitId) -> QuantumResult<bool> {
        self.ensure_live(qubit)?;

        let p_one = self.state.probability_one(qubit.0);
        let sample: f64 = self.rng.gen_range(0.0..1.0);
        let outcome = sample < p_one;
        let probability = if outcome { p_one } else { 1.0 - p_one };
        if probability.is_nan() || probability <= 0.0 {
            return Err(QuantumError::InvalidState(format!(
                "sampled outcome {outcome} on {qubit} has probability {probability}"
            )));
        }

        self.state.collapse(qubit.0, outcome, probability);
        if outcome {
            self.state.apply_controlled(&PauliX.matrix(), qubit.0, 0);
        }
        self.measurement_count += 1;

        tracing::debug!(%qubit, outcome, p_one, "measured");
        self.check_norm()?;
        Ok(outcome)
    }

    /// Mede todos os qubits do registrador, em ordem
    pub fn measure_all(&mut self, register: &QubitRegister) -> QuantumResult<Vec<bool>> {
        register.iter().map(|q| self.measure(q)).collect()
    }

    /// Força o qubit para |0⟩ descartando o resultado
    pub fn reset(&mut self, qubit: QubitId) -> QuantumResult<()> {
        self.measure(qubit).map(|_| ())
    }

    pub fn reset_all(&mut self, register: &QubitRegister) -> QuantumResult<()> {
        register.iter().try_for_each(|q| self.reset(q))
    }

    // -------------------------------------------------------------------------
    // Diagnóstico
    // -------------------------------------------------------------------------

    /// Probabilidade de medir |1⟩ no qubit, sem colapsar
    pub fn probability_one(&self, qubit: QubitId) -> QuantumResult<f64> {
        self.ensure_live(qubit)?;
        Ok(self.state.probability_one(qubit.0))
    }

    /// Distribuição conjunta sobre `qubits`; o primeiro é o bit menos significativo
    pub fn probabilities(&self, qubits: &[QubitId]) -> QuantumResult<Vec<f64>> {
        for &q in qubits {
            self.ensure_live(q)?;
        }
        let indices: Vec<usize> = qubits.iter().map(|q| q.0).collect();
        Ok(self.state.marginal(&indices))
    }

    /// Termos da base com probabilidade acima de `threshold`
    pub fn report(&self, threshold: f64) -> StateReport {
        StateReport::from_amplitudes(self.state.amplitudes(), self.state.num_qubits(), threshold)
    }

    fn ensure_live(&self, qubit: QubitId) -> QuantumResult<()> {
        if qubit.0 >= self.state.num_qubits() {
            return Err(QuantumError::InvalidIndex {
                qubit,
                reason: "out of range",
            });
        }
        if self.free.contains(&qubit.0) {
            return Err(QuantumError::InvalidIndex {
                qubit,
                reason: "not allocated",
            });
        }
        Ok(())
    }

    fn check_norm(&self) -> QuantumResult<()> {
        if !self.config.check_norm {
            return Ok(());
        }
        let norm = self.norm();
        if (norm - 1.0).abs() > self.config.norm_tolerance {
            return Err(QuantumError::NormDrift {
                norm,
                tolerance: self.config.norm_tolerance,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::Matrix2x2;

    #[test]
    fn test_create_processor() {
        let qp = QuantumProcessor::new();
        assert_eq!(qp.num_qubits(), 0);
        assert_eq!(qp.live_qubits(), 0);
        assert!((qp.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_with_qubits_are_free() {
        let mut qp = QuantumProcessor::with_qubits(4).unwrap();
        assert_eq!(qp.num_qubits(), 4);
        assert_eq!(qp.live_qubits(), 0);

        let r = qp.allocate(3).unwrap();
        assert_eq!(r.as_slice(), &[QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(qp.num_qubits(), 4);
    }

    #[test]
    fn test_allocate_grows_past_free_slots() {
        let mut qp = QuantumProcessor::with_qubits(1).unwrap();
        let r = qp.allocate(3).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(qp.num_qubits(), 3);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut qp = QuantumProcessor::with_config(QuantumConfig {
            max_qubits: 4,
            ..QuantumConfig::default()
        });
        let err = qp.allocate(5).unwrap_err();
        assert_eq!(err, QuantumError::CapacityExceeded { requested: 5, max: 4 });
    }

    #[test]
    fn test_target_as_control_rejected() {
        let mut qp = QuantumProcessor::new();
        let r = qp.allocate(2).unwrap();
        let op = GateOp::new(Gate::x(), r[0]).controlled_by([r[0]]);
        assert!(matches!(qp.apply(&op), Err(QuantumError::InvalidIndex { .. })));
    }

    #[test]
    fn test_unallocated_index_rejected() {
        let mut qp = QuantumProcessor::with_qubits(2).unwrap();
        let err = qp.apply(&GateOp::new(Gate::x(), QubitId(1))).unwrap_err();
        assert!(matches!(err, QuantumError::InvalidIndex { reason: "not allocated", .. }));

        let err = qp.apply(&GateOp::new(Gate::x(), QubitId(9))).unwrap_err();
        assert!(matches!(err, QuantumError::InvalidIndex { reason: "out of range", .. }));
    }

    #[test]
    fn test_measure_basis_state_is_deterministic() {
        let mut qp = QuantumProcessor::seeded(7);
        let r = qp.allocate(1).unwrap();
        qp.apply(&GateOp::new(Gate::x(), r[0])).unwrap();

        assert!(qp.measure(r[0]).unwrap());
        // reset implícito
        assert!(!qp.measure(r[0]).unwrap());
        assert_eq!(qp.measurement_count(), 2);
    }

    #[test]
    fn test_norm_drift_detected() {
        let mut qp = QuantumProcessor::seeded(0);
        let r = qp.allocate(1).unwrap();
        let mut doubled = Matrix2x2::identity();
        doubled.elements[0][0] *= 2.0;

        qp.state.apply_controlled(&doubled, r[0].0, 0);
        assert!(matches!(qp.check_norm(), Err(QuantumError::NormDrift { .. })));

        qp.config.check_norm = false;
        assert!(qp.check_norm().is_ok());
    }

    #[test]
    fn test_release_projects_residual_to_zero() {
        let mut qp = QuantumProcessor::seeded(0);
        let r = qp.allocate(2).unwrap();
        // P(1) = sin²(1e-6) ≈ 1e-12, abaixo da tolerância
        qp.apply(&GateOp::new(Gate::ry(2e-6), r[1])).unwrap();
        assert!(qp.probability_one(r[1]).unwrap() > 0.0);

        qp.release(&r).unwrap();
        let again = qp.allocate(2).unwrap();
        assert_eq!(again, r);
        assert_eq!(qp.probability_one(again[1]).unwrap(), 0.0);
        assert!((qp.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_restore_undoes_failed_sequence() {
        let mut qp = QuantumProcessor::seeded(0);
        let r = qp.allocate(2).unwrap();
        qp.apply(&GateOp::new(Gate::h(), r[0])).unwrap();
        let before = qp.amplitudes().to_vec();

        let checkpoint = qp.checkpoint();
        qp.config_mut().norm_tolerance = -1.0;
        // a porta é aplicada e só então a norma é rejeitada
        assert!(matches!(
            qp.apply(&GateOp::new(Gate::x(), r[1])),
            Err(QuantumError::NormDrift { .. })
        ));
        assert_ne!(qp.amplitudes(), before.as_slice());

        qp.restore(checkpoint);
        assert_eq!(qp.amplitudes(), before.as_slice());
        assert_eq!(qp.live_qubits(), 2);
    }
}
