use thiserror::Error;

use crate::values::{AgentId, Tick};

/// Errors raised while building or running a simulation
///
/// None of these are retried: every step is deterministic given its random
/// draws, so a failure points at bad input or a defect, never a transient
/// condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "No graphical degree sequence for {nodes} nodes with degrees in [{min_degree}, {max_degree}] after {attempts} attempts"
    )]
    DegreeSequenceExhausted {
        nodes: usize,
        min_degree: usize,
        max_degree: usize,
        attempts: usize,
    },

    #[error("Optimization failed: {0}")]
    OptimizationFailure(String),

    #[error("Invariant violated at tick {tick}: {reason}")]
    InvariantViolation { tick: Tick, reason: String },

    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),
}

impl SimError {
    /// True for errors caused by invalid run parameters
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::Configuration(_) | SimError::DegreeSequenceExhausted { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
