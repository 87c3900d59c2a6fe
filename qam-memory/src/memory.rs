//! Memória associativa
//!
//! Fachada que possui o processador e os registradores de uma execução:
//! padrão `p`, ancila `u` (com `u[1]` preparado em |1⟩), memória `m` e,
//! opcionalmente, um qubit de controle dedicado para a recuperação.

use qam_state::{QuantumConfig, QuantumProcessor, QubitId, QubitRegister, StateReport};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};
use crate::extraction::{extract, extraction_circuit};
use crate::pattern::apply_pauli_from_int;
use crate::retrieval::{retrieval_algorithm, retrieval_circuit};
use crate::storage::storage_algorithm;

// =============================================================================
// Configuração
// =============================================================================

/// Qubit que recebe o phase kickback da recuperação
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlQubit {
    /// Reaproveita `u[0]`, limpo ao fim do armazenamento
    #[default]
    Ancilla,
    /// Qubit próprio alocado junto com a memória
    Dedicated,
}

/// Alinhamento entre os registradores do armazenamento e da recuperação
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalWiring {
    pub control: ControlQubit,
    /// Quantos qubits iniciais de `p` e `m` ficam de fora da recuperação
    pub register_offset: usize,
}

/// Configuração da memória associativa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Largura dos registradores `p` e `m`
    pub pattern_width: usize,
    pub wiring: RetrievalWiring,
    pub quantum: QuantumConfig,
    /// Probabilidade mínima de um termo em [`AssociativeMemory::report`]
    pub report_threshold: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            pattern_width: 3,
            wiring: RetrievalWiring::default(),
            quantum: QuantumConfig::default(),
            report_threshold: 1e-6,
        }
    }
}

// =============================================================================
// Fachada
// =============================================================================

/// Memória associativa sobre um processador de vetor de estado
#[derive(Debug)]
pub struct AssociativeMemory<R = StdRng> {
    qp: QuantumProcessor<R>,
    pattern: QubitRegister,
    ancilla: QubitRegister,
    memory: QubitRegister,
    dedicated: Option<QubitId>,
    config: MemoryConfig,
    stored: Vec<u64>,
}

impl AssociativeMemory<StdRng> {
    /// Cria nova memória; a semente vem de `config.quantum.seed`
    pub fn new(config: MemoryConfig) -> MemoryResult<Self> {
        let qp = QuantumProcessor::with_config(config.quantum.clone());
        Self::build(qp, config)
    }
}

impl<R: Rng> AssociativeMemory<R> {
    /// Cria memória com fonte aleatória injetada
    pub fn with_rng(config: MemoryConfig, rng: R) -> MemoryResult<Self> {
        let qp = QuantumProcessor::with_rng(config.quantum.clone(), rng);
        Self::build(qp, config)
    }

    fn build(mut qp: QuantumProcessor<R>, config: MemoryConfig) -> MemoryResult<Self> {
        if config.pattern_width == 0 {
            return Err(MemoryError::EmptyRegister("pattern"));
        }

        let pattern = qp.allocate(config.pattern_width)?;
        let ancilla = qp.allocate(2)?;
        let memory = qp.allocate(config.pattern_width)?;
        let dedicated = match config.wiring.control {
            ControlQubit::Ancilla => None,
            ControlQubit::Dedicated => Some(qp.allocate(1)?[0]),
        };
        apply_pauli_from_int(&mut qp, 0b10, &ancilla)?;

        tracing::debug!(
            width = config.pattern_width,
            qubits = qp.num_qubits(),
            control = ?config.wiring.control,
            "associative memory ready"
        );

        Ok(Self {
            qp,
            pattern,
            ancilla,
            memory,
            dedicated,
            config,
            stored: Vec::new(),
        })
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Padrões gravados até agora, em ordem
    pub fn stored(&self) -> &[u64] {
        &self.stored
    }

    pub fn processor(&self) -> &QuantumProcessor<R> {
        &self.qp
    }

    pub fn pattern_register(&self) -> &QubitRegister {
        &self.pattern
    }

    pub fn ancilla_register(&self) -> &QubitRegister {
        &self.ancilla
    }

    pub fn memory_register(&self) -> &QubitRegister {
        &self.memory
    }

    /// Qubit de controle da recuperação conforme a fiação
    pub fn control_qubit(&self) -> QubitId {
        self.dedicated.unwrap_or(self.ancilla[0])
    }

    /// Registrador de consulta: `p` a partir do offset
    pub fn query_register(&self) -> QubitRegister {
        self.pattern.slice(self.config.wiring.register_offset..)
    }

    /// Parte de `m` comparada com a consulta
    pub fn memory_view(&self) -> QubitRegister {
        self.memory.slice(self.config.wiring.register_offset..)
    }

    // -------------------------------------------------------------------------
    // Operações
    // -------------------------------------------------------------------------

    /// Grava `patterns` em ordem
    ///
    /// Só pode ser chamada uma vez com lista não vazia: o armazenamento consome
    /// a preparação de `u[1]`.
    pub fn store(&mut self, patterns: &[u64]) -> MemoryResult<()> {
        storage_algorithm(&mut self.qp, patterns, &self.pattern, &self.ancilla, &self.memory)?;
        self.stored.extend_from_slice(patterns);
        Ok(())
    }

    /// Prepara o registrador de consulta em |query⟩ (involução)
    pub fn load_query(&mut self, query: u64) -> MemoryResult<()> {
        let i = self.query_register();
        apply_pauli_from_int(&mut self.qp, query, &i)
    }

    pub fn retrieve(&mut self) -> MemoryResult<()> {
        let (i, m, c) = (self.query_register(), self.memory_view(), self.control_qubit());
        retrieval_algorithm(&mut self.qp, &i, &m, c)
    }

    /// `P(c = 1)` no estado atual
    pub fn control_probability(&self) -> MemoryResult<f64> {
        Ok(self.qp.probability_one(self.control_qubit())?)
    }

    /// Distribuição conjunta de (controle, rótulo da memória)
    ///
    /// O índice é `c | (rótulo << 1)`, com o rótulo lido de [`memory_view`](Self::memory_view).
    pub fn joint_probabilities(&self) -> MemoryResult<Vec<f64>> {
        let mut qubits = vec![self.control_qubit()];
        qubits.extend(self.memory_view().iter());
        Ok(self.qp.probabilities(&qubits)?)
    }

    /// `P(c = 1)` para `query` sem alterar o estado
    ///
    /// Carrega a consulta, recupera, lê a probabilidade e desfaz tudo. Se uma
    /// porta falhar no meio do caminho o estado anterior é restaurado.
    pub fn match_probability(&mut self, query: u64) -> MemoryResult<f64> {
        let checkpoint = self.qp.checkpoint();
        let result = self.evaluate_and_undo(query);
        if result.is_err() {
            self.qp.restore(checkpoint);
        }
        result
    }

    fn evaluate_and_undo(&mut self, query: u64) -> MemoryResult<f64> {
        let (i, m, c) = (self.query_register(), self.memory_view(), self.control_qubit());
        let circuit = retrieval_circuit(&i, &m, c)?;

        apply_pauli_from_int(&mut self.qp, query, &i)?;
        circuit.execute(&mut self.qp)?;
        let probability = self.qp.probability_one(c)?;
        circuit.adjoint().execute(&mut self.qp)?;
        apply_pauli_from_int(&mut self.qp, query, &i)?;

        tracing::debug!(query, probability, "match probability");
        Ok(probability)
    }

    /// Recupera `query` e mede o controle
    ///
    /// Destrutiva: a medição colapsa a memória. O controle e a consulta
    /// terminam em |0⟩.
    pub fn recall(&mut self, query: u64) -> MemoryResult<bool> {
        self.load_query(query)?;
        self.retrieve()?;
        let outcome = self.qp.measure(self.control_qubit())?;
        self.load_query(query)?;

        tracing::info!(query, outcome, "recall");
        Ok(outcome)
    }

    /// Extração com medição do registrador de consulta
    ///
    /// Destrutiva. O controle é resetado em seguida.
    pub fn extract(&mut self) -> MemoryResult<Vec<bool>> {
        let (i, m, c) = (self.query_register(), self.memory_view(), self.control_qubit());
        let bits = extract(&mut self.qp, &i, &m, c)?;
        self.qp.reset(c)?;

        tracing::info!(?bits, "extraction complete");
        Ok(bits)
    }

    /// Distribuição exata do resultado da extração, sem alterar o estado
    ///
    /// Em caso de erro o estado anterior é restaurado.
    pub fn extraction_distribution(&mut self) -> MemoryResult<Vec<f64>> {
        let (i, m, c) = (self.query_register(), self.memory_view(), self.control_qubit());
        let circuit = extraction_circuit(&i, &m, c)?;

        let checkpoint = self.qp.checkpoint();
        let result = circuit
            .execute(&mut self.qp)
            .and_then(|()| self.qp.probabilities(i.as_slice()))
            .and_then(|distribution| {
                circuit.adjoint().execute(&mut self.qp)?;
                Ok(distribution)
            });
        if result.is_err() {
            self.qp.restore(checkpoint);
        }
        Ok(result?)
    }

    /// Reseta e libera `p`, `u`, `m` e o controle dedicado
    ///
    /// A fachada mantém seus registradores durante toda a vida útil; este é o
    /// único caminho que os devolve ao processador.
    pub fn into_processor(mut self) -> MemoryResult<QuantumProcessor<R>> {
        let mut registers = vec![self.pattern.clone(), self.ancilla.clone(), self.memory.clone()];
        registers.extend(self.dedicated.map(|c| QubitRegister::new(vec![c])));
        for register in &registers {
            self.qp.reset_all(register)?;
            self.qp.release(register)?;
        }
        tracing::debug!(free = self.qp.num_qubits() - self.qp.live_qubits(), "memory registers released");
        Ok(self.qp)
    }

    /// Termos do vetor de estado acima de `report_threshold`
    pub fn report(&self) -> StateReport {
        self.qp.report(self.config.report_threshold)
    }
}
