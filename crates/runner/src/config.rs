//! Run configuration
//!
//! A flat JSON record; every field is optional and falls back to the
//! defaults below.

use efm_core::SimError;
use efm_engine::EconomyParams;
use efm_lending::LendingTerms;
use efm_optimizer::{MAXIMIZER_NAMES, is_known_maximizer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Configuration(err.to_string())
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Experiment name, used to name output files
    #[serde(default = "default_experiment")]
    pub experiment: String,

    /// Number of agents
    #[serde(default = "default_population")]
    pub population: usize,

    /// Per-tick probability that an agent reconsiders its position
    #[serde(default = "default_churn")]
    pub churn: f64,

    /// Cost of moving, as a multiple of the current wage
    #[serde(default = "default_move_cost")]
    pub move_cost: f64,

    /// Startup cost relative to the move cost
    #[serde(default = "default_startup_multiplier")]
    pub startup_multiplier: f64,

    /// Mean savings rate
    #[serde(default = "default_savings_rate_mean")]
    pub savings_rate_mean: f64,

    /// Spread of savings rates; zero gives every agent the mean
    #[serde(default = "default_savings_rate_spread")]
    pub savings_rate_spread: f64,

    #[serde(default = "default_true")]
    pub lending: bool,

    /// Per-tick compound interest on loans
    #[serde(default = "default_lending_rate")]
    pub lending_rate: f64,

    /// Screen out firms reachable only through a loan that would not be repaid in time
    #[serde(default = "default_true")]
    pub debt_awareness: bool,

    /// Ticks within which a loan must be projected to be repaid
    #[serde(default = "default_loan_lookahead")]
    pub loan_lookahead: u32,

    /// Percentage haircut on expected wages when screening loans
    #[serde(default)]
    pub loan_risk_pct: f64,

    /// Largest loan that can be originated; zero means uncapped
    #[serde(default)]
    pub loan_cap: f64,

    /// Number of ticks to simulate
    #[serde(default = "default_tmax")]
    pub tmax: u64,

    #[serde(default = "default_min_degree")]
    pub min_degree: usize,

    #[serde(default = "default_max_degree")]
    pub max_degree: usize,

    /// Degree sequences to sample before giving up on the social network
    #[serde(default = "default_degree_sequence_attempts")]
    pub degree_sequence_attempts: usize,

    /// Bounded maximizer used for effort ("golden" or "grid")
    #[serde(default = "default_optimizer")]
    pub optimizer: String,

    /// Random seed; a run is fully determined by its config
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_experiment() -> String {
    "efm".to_string()
}

fn default_population() -> usize {
    600
}

fn default_churn() -> f64 {
    0.01
}

fn default_move_cost() -> f64 {
    1.0
}

fn default_startup_multiplier() -> f64 {
    2.0
}

fn default_savings_rate_mean() -> f64 {
    0.03
}

fn default_savings_rate_spread() -> f64 {
    0.01
}

fn default_true() -> bool {
    true
}

fn default_lending_rate() -> f64 {
    0.0025
}

fn default_loan_lookahead() -> u32 {
    12
}

fn default_tmax() -> u64 {
    500
}

fn default_min_degree() -> usize {
    2
}

fn default_max_degree() -> usize {
    6
}

fn default_degree_sequence_attempts() -> usize {
    1000
}

fn default_optimizer() -> String {
    "golden".to_string()
}

fn default_seed() -> u64 {
    42
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            experiment: default_experiment(),
            population: default_population(),
            churn: default_churn(),
            move_cost: default_move_cost(),
            startup_multiplier: default_startup_multiplier(),
            savings_rate_mean: default_savings_rate_mean(),
            savings_rate_spread: default_savings_rate_spread(),
            lending: true,
            lending_rate: default_lending_rate(),
            debt_awareness: true,
            loan_lookahead: default_loan_lookahead(),
            loan_risk_pct: 0.0,
            loan_cap: 0.0,
            tmax: default_tmax(),
            min_degree: default_min_degree(),
            max_degree: default_max_degree(),
            degree_sequence_attempts: default_degree_sequence_attempts(),
            optimizer: default_optimizer(),
            seed: default_seed(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.check().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Reject parameters no run can use
    pub fn validate(&self) -> efm_core::Result<()> {
        self.check().map_err(SimError::Configuration)
    }

    fn check(&self) -> Result<(), String> {
        if self.population == 0 {
            return Err("population must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.churn) {
            return Err(format!("churn {} outside [0, 1]", self.churn));
        }
        if !(self.move_cost >= 0.0) {
            return Err(format!("move cost {} is negative", self.move_cost));
        }
        if !(self.startup_multiplier >= 0.0) {
            return Err(format!(
                "startup multiplier {} is negative",
                self.startup_multiplier
            ));
        }
        if !(0.0..=1.0).contains(&self.savings_rate_mean) {
            return Err(format!(
                "savings rate mean {} outside [0, 1]",
                self.savings_rate_mean
            ));
        }
        if !(self.savings_rate_spread >= 0.0) || !self.savings_rate_spread.is_finite() {
            return Err(format!(
                "savings rate spread {} must be finite and non-negative",
                self.savings_rate_spread
            ));
        }
        if !(self.lending_rate >= 0.0) {
            return Err(format!("lending rate {} is negative", self.lending_rate));
        }
        if !(0.0..=100.0).contains(&self.loan_risk_pct) {
            return Err(format!("loan risk {}% outside [0, 100]", self.loan_risk_pct));
        }
        if !(self.loan_cap >= 0.0) {
            return Err(format!("loan cap {} is negative", self.loan_cap));
        }
        if self.tmax == 0 {
            return Err("tmax must be positive".to_string());
        }
        if self.min_degree > self.max_degree {
            return Err(format!(
                "min degree {} exceeds max degree {}",
                self.min_degree, self.max_degree
            ));
        }
        if self.min_degree > self.population - 1 {
            return Err(format!(
                "min degree {} infeasible for {} agents",
                self.min_degree, self.population
            ));
        }
        if self.degree_sequence_attempts == 0 {
            return Err("degree sequence attempts must be positive".to_string());
        }
        if !is_known_maximizer(&self.optimizer) {
            return Err(format!(
                "unknown optimizer '{}', expected one of {:?}",
                self.optimizer, MAXIMIZER_NAMES
            ));
        }
        Ok(())
    }

    pub fn lending_terms(&self) -> LendingTerms {
        LendingTerms {
            enabled: self.lending,
            rate: self.lending_rate,
            debt_awareness: self.debt_awareness,
            lookahead: self.loan_lookahead,
            risk_pct: self.loan_risk_pct,
            loan_cap: self.loan_cap,
        }
    }

    pub fn economy_params(&self) -> EconomyParams {
        EconomyParams {
            move_cost: self.move_cost,
            startup_multiplier: self.startup_multiplier,
            lending: self.lending_terms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population, 600);
        assert_eq!(config.tmax, 500);
        assert!(config.lending);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SimulationConfig::from_json("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "experiment": "no_lending",
            "population": 50,
            "lending": false,
            "loan_cap": 5.0
        }"#;

        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.experiment, "no_lending");
        assert_eq!(config.population, 50);
        assert!(!config.lending_terms().enabled);
        assert_eq!(config.lending_terms().loan_cap, 5.0);
        assert_eq!(config.churn, 0.01);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimulationConfig::from_json(r#"{"churn": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimulationConfig::from_json(r#"{"population": "many"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = SimulationConfig::from_json(r#"{"optimizer": "newton"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(SimulationConfig::from_json(r#"{"optimizer": "grid"}"#).is_ok());

        let config = SimulationConfig {
            min_degree: 7,
            max_degree: 6,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Configuration(_))));

        let config = SimulationConfig {
            population: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::from_file("/nonexistent/efm.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(SimError::from(err).is_configuration());
    }

    #[test]
    fn test_economy_params_mapping() {
        let config = SimulationConfig {
            move_cost: 0.5,
            startup_multiplier: 4.0,
            lending_rate: 0.01,
            ..SimulationConfig::default()
        };
        let params = config.economy_params();
        assert_eq!(params.startup_rate(), 2.0);
        assert_eq!(params.lending.rate, 0.01);
    }
}
