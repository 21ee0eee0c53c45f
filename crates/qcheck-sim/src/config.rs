//! Engine configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QCHECK_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::dense::{DEFAULT_MAX_QUBITS, DEFAULT_TOLERANCE, MAX_DENSE_QUBITS, QubitOrder};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    IoError(String),

    /// Configuration file is not valid YAML for this schema.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Qubit-ordering convention for the dense engine.
    #[serde(default)]
    pub qubit_order: QubitOrder,

    /// Largest circuit width the dense engine accepts.
    #[serde(default = "default_max_dense_qubits")]
    pub max_dense_qubits: u32,

    /// Absolute tolerance for amplitude comparisons.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Register scan settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Register scan settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Abort the scan when an ancilla is left dirty.
    #[serde(default = "default_true")]
    pub fail_on_dirty_ancilla: bool,

    /// Emit every trace through `tracing` at info level.
    #[serde(default)]
    pub log_traces: bool,
}

fn default_max_dense_qubits() -> u32 {
    DEFAULT_MAX_QUBITS
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_true() -> bool {
    true
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            qubit_order: QubitOrder::default(),
            max_dense_qubits: default_max_dense_qubits(),
            tolerance: default_tolerance(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fail_on_dirty_ancilla: true,
            log_traces: false,
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QCHECK_*` environment overrides.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn merge_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QCHECK_QUBIT_ORDER") {
            self.qubit_order = match v.to_ascii_lowercase().as_str() {
                "forward" => QubitOrder::Forward,
                "reversed" => QubitOrder::Reversed,
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "QCHECK_QUBIT_ORDER must be 'forward' or 'reversed', got '{other}'"
                    )));
                }
            };
        }
        if let Some(v) = lookup("QCHECK_MAX_DENSE_QUBITS") {
            self.max_dense_qubits = parse_var("QCHECK_MAX_DENSE_QUBITS", &v)?;
        }
        if let Some(v) = lookup("QCHECK_TOLERANCE") {
            self.tolerance = parse_var("QCHECK_TOLERANCE", &v)?;
        }
        if let Some(v) = lookup("QCHECK_FAIL_ON_DIRTY_ANCILLA") {
            self.scan.fail_on_dirty_ancilla = parse_var("QCHECK_FAIL_ON_DIRTY_ANCILLA", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dense_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "max_dense_qubits must be at least 1".to_string(),
            ));
        }
        if self.max_dense_qubits > MAX_DENSE_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "max_dense_qubits must be at most {MAX_DENSE_QUBITS}, got {}",
                self.max_dense_qubits
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{key} has invalid value '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.qubit_order, QubitOrder::Forward);
        assert_eq!(config.max_dense_qubits, 12);
        assert!(config.scan.fail_on_dirty_ancilla);
        assert!(!config.scan.log_traces);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = SimConfig::from_yaml("qubit_order: reversed\nscan:\n  log_traces: true\n").unwrap();
        assert_eq!(config.qubit_order, QubitOrder::Reversed);
        assert_eq!(config.max_dense_qubits, 12);
        assert!(config.scan.log_traces);
        assert!(config.scan.fail_on_dirty_ancilla);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            SimConfig::from_yaml("qubit_order: sideways\n"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            SimConfig::from_yaml("tolerance: -1.0\n"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QCHECK_QUBIT_ORDER", "Reversed"),
            ("QCHECK_MAX_DENSE_QUBITS", "6"),
            ("QCHECK_FAIL_ON_DIRTY_ANCILLA", "false"),
        ]
        .into_iter()
        .collect();
        let config = SimConfig::default()
            .merge_vars(|k| vars.get(k).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.qubit_order, QubitOrder::Reversed);
        assert_eq!(config.max_dense_qubits, 6);
        assert!(!config.scan.fail_on_dirty_ancilla);
        assert!((config.tolerance - 1e-9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_qubit_limit_bounds() {
        assert!(matches!(
            SimConfig::from_yaml("max_dense_qubits: 0\n"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            SimConfig::from_yaml("max_dense_qubits: 64\n"),
            Err(ConfigError::ValidationError(_))
        ));
        let config = SimConfig::from_yaml(&format!("max_dense_qubits: {MAX_DENSE_QUBITS}\n")).unwrap();
        assert_eq!(config.max_dense_qubits, MAX_DENSE_QUBITS);
    }

    #[test]
    fn test_bad_env_value() {
        let err = SimConfig::default()
            .merge_vars(|k| (k == "QCHECK_MAX_DENSE_QUBITS").then(|| "many".to_string()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: QCHECK_MAX_DENSE_QUBITS has invalid value 'many'"
        );
    }
}
