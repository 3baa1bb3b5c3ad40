//! Firm membership changes
//!
//! An agent leaving a firm it owns first hands the firm to one of the
//! remaining members, drawn uniformly at random, and every other member is
//! rewired to the new owner. Only then does the agent detach and join its
//! new firm (or stay alone after a startup).

use efm_core::{AgentId, Result};
use efm_graph::MutableTopology;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::decision::Decision;
use crate::economy::Economy;

impl Economy {
    /// Commit a decision: set the realized effort and move the agent if it left
    pub fn apply_decision<R: Rng + ?Sized>(
        &mut self,
        id: AgentId,
        decision: &Decision,
        rng: &mut R,
    ) -> Result<()> {
        self.agent_mut(id)?.e_star = decision.effort;
        if decision.relocates() {
            self.relocate(id, decision.firm, rng)?;
        }
        Ok(())
    }

    /// Move agent `id` into the firm owned by `new_firm`
    ///
    /// `new_firm == id` makes the agent a singleton.
    pub(crate) fn relocate<R: Rng + ?Sized>(
        &mut self,
        id: AgentId,
        new_firm: AgentId,
        rng: &mut R,
    ) -> Result<()> {
        self.agent(new_firm)?;
        let old_firm = self.agent(id)?.firm_id;
        let co_members = self.firms.co_members(id);

        if old_firm != id {
            self.firms.remove_edge(id, old_firm);
        } else if let Some(&new_owner) = co_members.choose(rng) {
            self.transfer_ownership(id, new_owner, &co_members);
        }

        if new_firm != id {
            self.firms.add_edge(id, new_firm);
        }
        self.agents[id].firm_id = new_firm;
        Ok(())
    }

    /// Hand the firm owned by `owner` to `new_owner`
    ///
    /// Every other member of `remaining` is rewired to the new owner, leaving
    /// `owner` with no firm edges.
    fn transfer_ownership(&mut self, owner: AgentId, new_owner: AgentId, remaining: &[AgentId]) {
        self.firms.remove_edge(new_owner, owner);
        self.agents[new_owner].firm_id = new_owner;

        for &member in remaining.iter().filter(|&&m| m != new_owner) {
            self.firms.remove_edge(member, owner);
            self.firms.add_edge(member, new_owner);
            self.agents[member].firm_id = new_owner;
        }

        debug!(
            "Firm {} passes to {} ({} members remain)",
            owner,
            new_owner,
            remaining.len()
        );
    }
}
