//! Operações e circuitos
//!
//! Um [`GateOp`] junta um [`Gate`] a um alvo e a um conjunto de controles.
//! Um [`Circuit`] é a lista ordenada dessas operações; sua adjunta inverte a
//! ordem e a adjunta de cada operação, o que dá o "uncompute" de graça.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QuantumResult;
use crate::gates::Gate;
use crate::processor::QuantumProcessor;
use crate::register::{QubitId, QubitRegister};

/// Porta aplicada a um alvo, opcionalmente multi-controlada
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateOp {
    pub gate: Gate,
    pub target: QubitId,
    pub controls: Vec<QubitId>,
}

impl GateOp {
    /// Operação sem controles
    pub fn new(gate: Gate, target: QubitId) -> Self {
        Self {
            gate,
            target,
            controls: Vec::new(),
        }
    }

    /// Acrescenta controles
    pub fn controlled_by<I: IntoIterator<Item = QubitId>>(mut self, controls: I) -> Self {
        self.controls.extend(controls);
        self
    }

    pub fn adjoint(self) -> Self {
        Self {
            gate: self.gate.adjoint(),
            ..self
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.gate, self.target)?;
        if !self.controls.is_empty() {
            let ctrl: Vec<String> = self.controls.iter().map(|q| q.to_string()).collect();
            write!(f, " ctrl[{}]", ctrl.join(","))?;
        }
        Ok(())
    }
}

/// Circuito quântico composto de operações em sequência
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    ops: Vec<GateOp>,
}

impl Circuit {
    /// Cria circuito vazio
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona operação ao circuito
    pub fn add(&mut self, op: GateOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Aplica `gate` a cada qubit de `register`, na ordem do registrador
    pub fn add_each(&mut self, gate: &Gate, register: &QubitRegister) -> &mut Self {
        for q in register {
            self.ops.push(GateOp::new(gate.clone(), q));
        }
        self
    }

    /// Concatena outro circuito ao final
    pub fn append(&mut self, other: Circuit) -> &mut Self {
        self.ops.extend(other.ops);
        self
    }

    /// Retorna número de operações
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Verifica se circuito está vazio
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Circuito inverso: ordem reversa, cada operação adjunta
    pub fn adjoint(&self) -> Circuit {
        Circuit {
            ops: self.ops.iter().rev().cloned().map(GateOp::adjoint).collect(),
        }
    }

    /// Executa no processador, parando na primeira falha
    pub fn execute<R: Rng>(&self, qp: &mut QuantumProcessor<R>) -> QuantumResult<()> {
        for op in &self.ops {
            qp.apply(op)?;
        }
        Ok(())
    }
}

impl Extend<GateOp> for Circuit {
    fn extend<I: IntoIterator<Item = GateOp>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

impl FromIterator<GateOp> for Circuit {
    fn from_iter<I: IntoIterator<Item = GateOp>>(iter: I) -> Self {
        Circuit {
            ops: iter.into_iter().collect(),
        }
    }
}
