use serde::{Deserialize, Serialize};

use super::flags::{Outcome, TickFlags};
use super::production::ProductionParams;
use crate::error::{Result, SimError};
use crate::values::{AgentId, OMEGA, Tick};

/// An economic agent
///
/// Constants are drawn once at creation. The mutable part is rewritten by the
/// decision engine, the output distributor and loan service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Agent id, also the id of the firm it owns (if any)
    pub id: AgentId,

    // -- immutable --
    /// Production constants (used when this agent owns a firm)
    pub production: ProductionParams,
    /// Weight on income versus leisure in the utility function
    pub theta: f64,
    /// Outside-wage ceiling (endowment of effort)
    pub omega: f64,
    /// Share of each wage put into savings
    pub savings_rate: f64,
    /// Optimal effort when working alone
    pub e_self: f64,
    /// Utility attained when working alone
    pub u_self: f64,
    /// Degree in the social network
    pub links: usize,
    /// Index of the social network component containing this agent
    pub component: usize,

    // -- mutable --
    /// Owner of the firm this agent belongs to
    pub firm_id: AgentId,
    /// Currently committed effort, in [0, 1]
    pub e_star: f64,
    pub wage: f64,
    pub savings: f64,
    pub loan: f64,
    /// Transient per-tick flags
    pub flags: TickFlags,
}

impl Agent {
    /// Create a self-employed agent
    ///
    /// `singleton` is the optimal `(effort, utility)` pair when working alone;
    /// the starting wage is the output of that effort.
    pub fn new(
        id: AgentId,
        production: ProductionParams,
        theta: f64,
        savings_rate: f64,
        singleton: (f64, f64),
    ) -> Self {
        let (e_self, u_self) = singleton;
        Self {
            id,
            production,
            theta,
            omega: OMEGA,
            savings_rate,
            e_self,
            u_self,
            links: 0,
            component: 0,
            firm_id: id,
            e_star: e_self,
            wage: production.output(e_self),
            savings: 0.0,
            loan: 0.0,
            flags: TickFlags::default(),
        }
    }

    /// Record this agent's position in the social network
    pub fn with_social(mut self, links: usize, component: usize) -> Self {
        self.links = links;
        self.component = component;
        self
    }

    /// True if the agent owns the firm it belongs to (singletons own themselves)
    pub fn is_owner(&self) -> bool {
        self.firm_id == self.id
    }

    pub fn has_loan(&self) -> bool {
        self.loan != 0.0
    }

    pub fn reset_flags(&mut self) {
        self.flags.reset();
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.flags.outcome = Some(outcome);
    }

    /// Check the per-agent numeric invariants
    pub fn validate(&self, tick: Tick) -> Result<()> {
        let violation = |reason: String| SimError::InvariantViolation { tick, reason };

        if !(self.savings >= 0.0) {
            return Err(violation(format!(
                "agent {} has savings {}",
                self.id, self.savings
            )));
        }
        if !(self.loan >= 0.0) {
            return Err(violation(format!("agent {} has loan {}", self.id, self.loan)));
        }
        if !(0.0..=1.0).contains(&self.e_star) {
            return Err(violation(format!(
                "agent {} has effort {} outside [0, 1]",
                self.id, self.e_star
            )));
        }
        if !(self.wage >= 0.0) {
            return Err(violation(format!("agent {} has wage {}", self.id, self.wage)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_agent() -> Agent {
        Agent::new(3, ProductionParams::new(0.2, 1.0, 1.2), 0.5, 0.03, (0.4, 0.6))
    }

    #[test]
    fn test_new_agent_is_self_employed() {
        let agent = sample_agent();
        assert_eq!(agent.firm_id, 3);
        assert!(agent.is_owner());
        assert!(!agent.has_loan());
        assert_relative_eq!(agent.e_star, 0.4);
        assert_relative_eq!(agent.wage, agent.production.output(0.4));
        assert_relative_eq!(agent.omega, OMEGA);
    }

    #[test]
    fn test_validate_rejects_negative_savings() {
        let mut agent = sample_agent();
        agent.savings = -0.1;
        let err = agent.validate(7).unwrap_err();
        assert!(matches!(err, SimError::InvariantViolation { tick: 7, .. }));
    }

    #[test]
    fn test_validate_rejects_effort_out_of_range() {
        let mut agent = sample_agent();
        agent.e_star = 1.5;
        assert!(agent.validate(0).is_err());
        agent.e_star = f64::NAN;
        assert!(agent.validate(0).is_err());
    }

    #[test]
    fn test_record_outcome() {
        let mut agent = sample_agent();
        agent.record(Outcome::Move);
        assert!(agent.flags.moved());
        agent.reset_flags();
        assert!(agent.flags.outcome.is_none());
    }
}
