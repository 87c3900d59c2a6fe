//! Arquivo de configuração `qam.toml`
//!
//! ```toml
//! [memory]
//! pattern_width = 3
//! wiring = { control = "ancilla", register_offset = 0 }
//!
//! [memory.quantum]
//! seed = 42
//!
//! [driver]
//! patterns = [1, 4]
//! queries = [4, 2]
//! shots = 100
//! max_degree = 2
//! ```

use anyhow::{Context, Result};
use qam_memory::MemoryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parâmetros do driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Padrões gravados, em ordem
    pub patterns: Vec<u64>,
    /// Consultas usadas por `qam run`
    pub queries: Vec<u64>,
    /// Amostras por consulta (`run`) ou execuções da extração (`extract`)
    pub shots: usize,
    /// Peso de Hamming máximo mantido pela extração; `None` mantém tudo
    pub max_degree: Option<u32>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            patterns: vec![1, 4],
            queries: vec![4],
            shots: 100,
            max_degree: None,
        }
    }
}

/// Conteúdo completo de `qam.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QamConfig {
    pub memory: MemoryConfig,
    pub driver: DriverConfig,
}

impl QamConfig {
    /// Interpreta o conteúdo TOML
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse qam config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Arquivo opcional; sem caminho usa os valores padrão
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qam_memory::ControlQubit;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = QamConfig::parse("").unwrap();
        assert_eq!(config, QamConfig::default());
        assert_eq!(config.driver.patterns, vec![1, 4]);
    }

    #[test]
    fn test_full_file() {
        let config = QamConfig::parse(
            r#"
            [memory]
            pattern_width = 4
            wiring = { control = "dedicated", register_offset = 1 }

            [memory.quantum]
            seed = 42
            max_qubits = 16

            [driver]
            patterns = [1, 2, 8]
            queries = [8]
            shots = 10
            max_degree = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.memory.pattern_width, 4);
        assert_eq!(config.memory.wiring.control, ControlQubit::Dedicated);
        assert_eq!(config.memory.wiring.register_offset, 1);
        assert_eq!(config.memory.quantum.seed, Some(42));
        assert_eq!(config.memory.quantum.max_qubits, 16);
        assert!((config.memory.quantum.norm_tolerance - 1e-9).abs() < 1e-15);
        assert_eq!(config.driver.patterns, vec![1, 2, 8]);
        assert_eq!(config.driver.max_degree, Some(2));
    }

    #[test]
    fn test_invalid_control_rejected() {
        assert!(QamConfig::parse("[memory]\nwiring = { control = \"both\" }").is_err());
    }
}
