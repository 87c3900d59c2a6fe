//! # ⚛️ qam-state — Motor de Vetor de Estado
//!
//! Simulação exata, em processo, de um vetor de estado com portas
//! multi-controladas, medição com colapso e ciclo de vida de registradores.
//!
//! ## Computational Complexity
//!
//! **Gate application — O(2^n):**
//! - n = number of physical qubits in the state vector
//! - One pass over the amplitude vector per (possibly multi-controlled) gate
//! - Controlled gates only touch the subspace where every control is |1⟩
//!
//! **Measurement — O(2^n):**
//! - One pass for P(1), one pass to collapse and renormalize
//!
//! **Norm check — O(2^n):**
//! - Runs after every gate when `check_norm` is enabled
//!
//! **Scalability:**
//! - Small circuits (n < 16): ✓ Excellent
//! - Medium (16 < n < 24): △ Good
//! - `max_qubits` caps growth (default 24)
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          QuantumProcessor                       │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  StateVector (2^n amplitudes)             │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Register lifecycle (free slots)          │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Measurement + reset (seeded RNG)         │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```ignore
//! use qam_state::{Circuit, Gate, GateOp, QuantumProcessor};
//!
//! let mut qp = QuantumProcessor::seeded(42);
//! let r = qp.allocate(2)?;
//!
//! let mut bell = Circuit::new();
//! bell.add(GateOp::new(Gate::h(), r[0]))
//!     .add(GateOp::new(Gate::x(), r[1]).controlled_by([r[0]]));
//! bell.execute(&mut qp)?;
//!
//! let a = qp.measure(r[0])?;
//! ```

pub mod circuit;
pub mod error;
pub mod gates;
pub mod processor;
pub mod register;
pub mod report;
pub mod state;

pub use circuit::{Circuit, GateOp};
pub use error::{QuantumError, QuantumResult};
pub use gates::{Gate, GateKind, Hadamard, Matrix2x2, PauliX, Phase, QuantumGate, RotationY};
pub use processor::{Checkpoint, QuantumConfig, QuantumProcessor};
pub use register::{QubitId, QubitRegister};
pub use report::{BasisTerm, StateReport};
pub use state::StateVector;

pub use num_complex::Complex64;

#[cfg(test)]
mod tests;
