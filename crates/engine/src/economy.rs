use efm_core::{Agent, AgentId, Result, SimError, Tick};
use efm_graph::{FirmGraph, SocialGraph, Topology};
use efm_lending::LoanDesk;
use efm_optimizer::{EffortOptimizer, GoldenSectionMaximizer, ScalarMaximizer};
use log::debug;
use rand::Rng;

use crate::decision::DecisionRecord;
use crate::params::EconomyParams;

/// Population, networks and rules of one run
///
/// Owns every piece of mutable model state. Mutations made while one agent
/// decides are visible to the next agent immediately.
pub struct Economy {
    pub(crate) agents: Vec<Agent>,
    pub(crate) social: SocialGraph,
    pub(crate) firms: FirmGraph,
    pub(crate) params: EconomyParams,
    pub(crate) desk: LoanDesk,
    pub(crate) optimizer: EffortOptimizer<Box<dyn ScalarMaximizer>>,
}

impl Economy {
    /// Start an economy in which everyone is self-employed
    ///
    /// Agent ids must be `0..n` in order and match the social network's nodes.
    pub fn new(agents: Vec<Agent>, social: SocialGraph, params: EconomyParams) -> Result<Self> {
        if agents.len() != social.node_count() {
            return Err(SimError::Configuration(format!(
                "{} agents but social network has {} nodes",
                agents.len(),
                social.node_count()
            )));
        }
        if let Some((index, agent)) = agents.iter().enumerate().find(|(i, a)| a.id != *i) {
            return Err(SimError::Configuration(format!(
                "agent at position {} has id {}",
                index, agent.id
            )));
        }

        let firms = FirmGraph::new(agents.len());
        Ok(Self {
            agents,
            social,
            firms,
            params,
            desk: LoanDesk::new(params.lending),
            optimizer: EffortOptimizer::new(Box::new(GoldenSectionMaximizer::default())),
        })
    }

    /// Replace the maximizer behind effort optimization
    pub fn with_maximizer(mut self, maximizer: Box<dyn ScalarMaximizer>) -> Self {
        self.optimizer = EffortOptimizer::new(maximizer);
        self
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.agents.get(id).ok_or(SimError::UnknownAgent(id))
    }

    /// Mutable access to one agent
    ///
    /// Bypasses the engine's rules; `check_invariants` will catch an edit that
    /// breaks firm consistency.
    pub fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        self.agents.get_mut(id).ok_or(SimError::UnknownAgent(id))
    }

    pub fn social(&self) -> &SocialGraph {
        &self.social
    }

    pub fn firms(&self) -> &FirmGraph {
        &self.firms
    }

    pub fn params(&self) -> &EconomyParams {
        &self.params
    }

    pub fn maximizer_name(&self) -> &str {
        self.optimizer.maximizer().name()
    }

    /// Clear every agent's per-tick flags
    pub fn reset_flags(&mut self) {
        for agent in &mut self.agents {
            agent.reset_flags();
        }
    }

    /// Let one active agent reconsider its position
    pub fn step_agent<R: Rng + ?Sized>(
        &mut self,
        id: AgentId,
        tick: Tick,
        rng: &mut R,
    ) -> Result<DecisionRecord> {
        self.agent_mut(id)?.flags.go = true;
        let decision = self.decide(id, tick)?;
        self.apply_decision(id, &decision, rng)?;
        debug!("{:?}", decision.record);
        Ok(decision.record)
    }

    /// Split each firm's output evenly among its members
    ///
    /// Output uses the owner's production constants on the members' total
    /// effort. Every member saves its own share of the wage.
    pub fn distribute_output(&mut self) {
        for members in self.firms.components() {
            let owner = self.agents[members[0]].firm_id;
            let production = self.agents[owner].production;
            let effort: f64 = members.iter().map(|&m| self.agents[m].e_star).sum();
            let share = production.output(effort) / members.len() as f64;

            for &member in &members {
                let agent = &mut self.agents[member];
                agent.wage = share;
                agent.savings += share * agent.savings_rate;
            }
        }
    }

    /// Compound and pay down every outstanding loan
    pub fn service_loans(&mut self) {
        self.desk.service(&mut self.agents);
    }

    /// Fail fast on any state a correct tick cannot produce
    pub fn check_invariants(&self, tick: Tick) -> Result<()> {
        let n = self.agents.len();
        let mut firm_index = vec![0; n];
        for (index, members) in self.firms.components().iter().enumerate() {
            for &member in members {
                firm_index[member] = index;
            }
        }

        for agent in &self.agents {
            agent.validate(tick)?;

            let owner = agent.firm_id;
            if owner >= n {
                return Err(SimError::InvariantViolation {
                    tick,
                    reason: format!("agent {} points at unknown firm {}", agent.id, owner),
                });
            }
            if firm_index[owner] != firm_index[agent.id] {
                return Err(SimError::InvariantViolation {
                    tick,
                    reason: format!("agent {} has firm id {} outside its firm", agent.id, owner),
                });
            }
            if !self.agents[owner].is_owner() {
                return Err(SimError::InvariantViolation {
                    tick,
                    reason: format!(
                        "agent {} belongs to firm {} whose owner works for {}",
                        agent.id, owner, self.agents[owner].firm_id
                    ),
                });
            }
        }
        Ok(())
    }
}
