use efm_core::{Agent, AgentId, OMEGA, ProductionParams};
use efm_graph::SocialGraph;
use efm_optimizer::optimize_e;

use crate::economy::Economy;
use crate::params::EconomyParams;

/// Agent with its singleton optimum already computed
pub(crate) fn agent(id: AgentId, a: f64, b: f64, beta: f64, theta: f64, savings_rate: f64) -> Agent {
    let singleton = optimize_e(a, b, beta, OMEGA, theta, 0.0, 1).unwrap();
    Agent::new(id, ProductionParams::new(a, b, beta), theta, savings_rate, singleton)
}

pub(crate) fn economy(
    agents: Vec<Agent>,
    edges: &[(AgentId, AgentId)],
    params: EconomyParams,
) -> Economy {
    let social = SocialGraph::from_edges(agents.len(), edges);
    Economy::new(agents, social, params).unwrap()
}
