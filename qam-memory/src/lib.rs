//! # 🧠 qam-memory — Memória Associativa Quântica
//!
//! Armazena uma lista de padrões clássicos na estrutura de amplitudes de um
//! registrador compartilhado e recupera informação sobre uma consulta por
//! interferência de fase no qubit de controle.
//!
//! ## Computational Complexity
//!
//! **Storage — O(N · n · 2^q):**
//! - N = number of patterns, n = pattern width, q = qubits in the state vector
//! - Each iteration is a 6n + 3 + 2·popcount(pattern) gate sequence
//!
//! **Retrieval — O(n · 2^q):**
//! - 6n + 2 gates, independent of the number of stored patterns
//!
//! **Extraction — O(n · 2^q):**
//! - Retrieval plus 2n Hadamards and n measurements
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          AssociativeMemory                      │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  storage_algorithm   (p, u, m)            │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  retrieval_algorithm (i, m, c)            │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  extract             (i, m, c)            │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              qam_state::QuantumProcessor
//! ```
//!
//! ## Exemplo
//!
//! ```ignore
//! use qam_memory::{AssociativeMemory, MemoryConfig};
//!
//! let mut mem = AssociativeMemory::new(MemoryConfig::default())?;
//! mem.store(&[1, 4])?;
//!
//! let p = mem.match_probability(4)?; // 0.375
//! let hit = mem.recall(4)?;          // amostra
//! ```

pub mod angle;
pub mod error;
pub mod extraction;
pub mod memory;
pub mod pattern;
pub mod retrieval;
pub mod storage;

pub use angle::{find_angle, position_angle};
pub use error::{MemoryError, MemoryResult};
pub use extraction::{extract, extraction_circuit};
pub use memory::{AssociativeMemory, ControlQubit, MemoryConfig, RetrievalWiring};
pub use pattern::{apply_pauli_from_int, bits_needed, bools_to_int, check_pattern, pattern_circuit};
pub use retrieval::{expected_control_probability, retrieval_algorithm, retrieval_circuit};
pub use storage::{storage_algorithm, storage_iteration};
