use efm_lending::LendingTerms;
use serde::{Deserialize, Serialize};

/// Economic rules of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomyParams {
    /// Cost of moving firms, as a multiple of the current wage
    pub move_cost: f64,
    /// Startup cost relative to the move cost
    pub startup_multiplier: f64,
    pub lending: LendingTerms,
}

impl Default for EconomyParams {
    fn default() -> Self {
        Self {
            move_cost: 1.0,
            startup_multiplier: 2.0,
            lending: LendingTerms::default(),
        }
    }
}

impl EconomyParams {
    pub fn move_rate(&self) -> f64 {
        self.move_cost
    }

    pub fn startup_rate(&self) -> f64 {
        self.startup_multiplier * self.move_cost
    }
}
