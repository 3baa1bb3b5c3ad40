use serde::{Deserialize, Serialize};

/// Credit conditions shared by every agent in a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LendingTerms {
    /// Whether loans can be originated at all
    pub enabled: bool,
    /// Per-tick compound interest rate
    pub rate: f64,
    /// Skip candidate firms whose required loan could not be repaid in time
    pub debt_awareness: bool,
    /// Ticks within which a loan must be projected to be repaid
    pub lookahead: u32,
    /// Haircut on the expected wage, in percent
    pub risk_pct: f64,
    /// Largest loan that can be originated; zero means uncapped
    pub loan_cap: f64,
}

impl Default for LendingTerms {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 0.0025,
            debt_awareness: true,
            lookahead: 12,
            risk_pct: 0.0,
            loan_cap: 0.0,
        }
    }
}

impl LendingTerms {
    /// No credit available
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            debt_awareness: false,
            ..Self::default()
        }
    }

    /// Whether a loan of `amount` is within the cap
    pub fn within_cap(&self, amount: f64) -> bool {
        self.loan_cap <= 0.0 || amount <= self.loan_cap
    }
}
