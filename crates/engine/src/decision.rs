use efm_core::{AgentId, Outcome, Result, Tick};
use efm_graph::Topology;
use efm_lending::Funding;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::economy::Economy;

/// Which branch of the decision procedure applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// The agent had no co-members
    Singleton,
    /// The agent shared a firm with others
    Member,
}

/// What the agent wanted to do before paying for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Stay,
    Move { firm: AgentId },
    Startup,
}

/// Best firm reachable through the social network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Owner of the candidate firm
    pub firm: AgentId,
    pub effort: f64,
    pub utility: f64,
}

/// Everything considered and decided by one active agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub tick: Tick,
    pub agent: AgentId,
    pub kind: DecisionKind,
    pub old_firm: AgentId,
    pub new_firm: AgentId,
    pub old_wage: f64,
    pub old_savings: f64,
    pub old_loan: f64,
    pub u_single: f64,
    pub u_current: Option<f64>,
    pub u_other: Option<f64>,
    pub candidate_firm: Option<AgentId>,
    pub intent: Intent,
    /// Price of the attempted move or startup
    pub cost: Option<f64>,
    pub outcome: Option<Outcome>,
    /// Effort the agent ends up committing
    pub effort: f64,
}

/// Result of `Economy::decide`, ready to apply to the firm graph
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub effort: f64,
    /// Firm the agent ends up in
    pub firm: AgentId,
    pub outcome: Option<Outcome>,
    pub record: DecisionRecord,
}

impl Decision {
    /// True if the agent leaves its current firm
    pub fn relocates(&self) -> bool {
        matches!(
            self.outcome,
            Some(Outcome::Move | Outcome::Startup | Outcome::Borrow)
        )
    }
}

/// Pick an intent from the three utilities
///
/// Returns the intent, the effort if it succeeds and the effort to fall back
/// on if it cannot be paid for. Ties go to starting up, then to moving.
pub(crate) fn choose(
    u_single: f64,
    e_single: f64,
    current: Option<(f64, f64)>,
    other: Option<Candidate>,
) -> (Intent, f64, f64) {
    match current {
        None => match other {
            Some(c) if c.utility > u_single => (Intent::Move { firm: c.firm }, c.effort, e_single),
            _ => (Intent::Stay, e_single, e_single),
        },
        Some((e_current, u_current)) => {
            let u_other = other.map_or(f64::NEG_INFINITY, |c| c.utility);
            if u_single >= u_other && u_single >= u_current {
                return (Intent::Startup, e_single, e_current);
            }
            match other {
                Some(c) if c.utility >= u_current => {
                    (Intent::Move { firm: c.firm }, c.effort, e_current)
                }
                _ => (Intent::Stay, e_current, e_current),
            }
        }
    }
}

impl Economy {
    /// Decide what agent `id` does this tick
    ///
    /// Pays for an accepted move or startup and records the outcome in the
    /// agent's flags; the firm graph is left for `apply_decision`.
    pub fn decide(&mut self, id: AgentId, tick: Tick) -> Result<Decision> {
        let agent = self.agent(id)?;
        let (old_firm, old_wage, old_savings, old_loan) =
            (agent.firm_id, agent.wage, agent.savings, agent.loan);
        let (u_single, e_single) = (agent.u_self, agent.e_self);

        let co_members = self.firms.co_members(id);
        let current = if co_members.is_empty() {
            None
        } else {
            Some(self.current_utility(id, &co_members)?)
        };
        let other = self.other_utility(id, &co_members)?;

        let (intent, target_effort, fallback_effort) = choose(u_single, e_single, current, other);

        let (cost, target_firm) = match intent {
            Intent::Stay => (None, old_firm),
            Intent::Move { firm } => (Some(self.params.move_rate() * old_wage), firm),
            Intent::Startup => (Some(self.params.startup_rate() * old_wage), id),
        };

        let (effort, firm, outcome) = match cost {
            None => (target_effort, old_firm, None),
            Some(cost) => {
                match self.desk.finance(&mut self.agents[id], cost) {
                    Funding::Savings => {
                        let outcome = if intent == Intent::Startup {
                            Outcome::Startup
                        } else {
                            Outcome::Move
                        };
                        (target_effort, target_firm, Some(outcome))
                    }
                    Funding::Loan { .. } => (target_effort, target_firm, Some(Outcome::Borrow)),
                    Funding::Refused => (fallback_effort, old_firm, Some(Outcome::Thwart)),
                }
            }
        };

        if let Some(outcome) = outcome {
            self.agents[id].record(outcome);
        }

        let record = DecisionRecord {
            tick,
            agent: id,
            kind: if current.is_some() {
                DecisionKind::Member
            } else {
                DecisionKind::Singleton
            },
            old_firm,
            new_firm: firm,
            old_wage,
            old_savings,
            old_loan,
            u_single,
            u_current: current.map(|(_, u)| u),
            u_other: other.map(|c| c.utility),
            candidate_firm: other.map(|c| c.firm),
            intent,
            cost,
            outcome,
            effort,
        };

        Ok(Decision {
            effort,
            firm,
            outcome,
            record,
        })
    }

    /// Optimal `(effort, utility)` in the agent's current firm
    ///
    /// Uses the owner's production constants, the co-members' total effort
    /// and the agent's own preferences.
    fn current_utility(&self, id: AgentId, co_members: &[AgentId]) -> Result<(f64, f64)> {
        let agent = &self.agents[id];
        let owner = self.agent(agent.firm_id)?;
        let e_other: f64 = co_members.iter().map(|&m| self.agents[m].e_star).sum();

        self.optimizer.optimize(
            &owner.production,
            agent.omega,
            agent.theta,
            e_other,
            co_members.len() + 1,
        )
    }

    /// Best firm among the agent's social neighbours outside its own firm
    ///
    /// Neighbours are scanned in ascending id order and a firm reached through
    /// several neighbours is evaluated once. With debt awareness on, a firm
    /// the agent could only join by borrowing is skipped unless the loan would
    /// be repaid from that firm's wage within the lookahead.
    fn other_utility(&self, id: AgentId, co_members: &[AgentId]) -> Result<Option<Candidate>> {
        let agent = &self.agents[id];
        let move_cost = self.params.move_rate() * agent.wage;
        let screen = self.desk.must_screen(agent, move_cost);

        let mut best: Option<Candidate> = None;
        let mut evaluated: Vec<AgentId> = Vec::new();

        for neighbor in self.social.neighbors(id) {
            if co_members.binary_search(&neighbor).is_ok() {
                continue;
            }
            let firm = self.agents[neighbor].firm_id;
            if evaluated.contains(&firm) {
                continue;
            }
            evaluated.push(firm);

            let owner = self.agent(firm)?;
            if screen && !self.desk.can_repay(agent, owner.wage, move_cost) {
                trace!(
                    "Agent {} cannot repay {:.6} from firm {} wage {:.6}",
                    id, move_cost, firm, owner.wage
                );
                continue;
            }

            let members = self.firms.component_of(firm);
            let e_firm: f64 = members.iter().map(|&m| self.agents[m].e_star).sum();
            let (effort, utility) = self.optimizer.optimize(
                &owner.production,
                agent.omega,
                agent.theta,
                e_firm,
                members.len() + 1,
            )?;

            if best.is_none_or(|b| utility > b.utility) {
                best = Some(Candidate {
                    firm,
                    effort,
                    utility,
                });
            }
        }

        Ok(best)
    }
}
