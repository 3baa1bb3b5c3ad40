//! Per-tick reports and run history
//!
//! Everything here is derived from the post-tick agent snapshots, so the
//! census and firm summaries are pure functions of `AgentSnapshot` rows.

use efm_core::{Agent, AgentId, ProductionParams, Tick};
use efm_engine::{DecisionRecord, Economy};
use efm_graph::FirmGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::SimulationConfig;
use crate::stats::{gini, mean, quintiles, ratio, std_dev};

/// Run parameters repeated on every snapshot row
///
/// Lets rows from different runs be concatenated and still grouped by the
/// parameters that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTag {
    pub experiment: String,
    pub seed: u64,
    pub churn: f64,
    pub move_cost: f64,
    pub startup_multiplier: f64,
    pub savings_rate_mean: f64,
    pub lending: bool,
    pub lending_rate: f64,
    pub debt_awareness: bool,
}

impl RunTag {
    pub fn of(config: &SimulationConfig) -> Self {
        Self {
            experiment: config.experiment.clone(),
            seed: config.seed,
            churn: config.churn,
            move_cost: config.move_cost,
            startup_multiplier: config.startup_multiplier,
            savings_rate_mean: config.savings_rate_mean,
            lending: config.lending,
            lending_rate: config.lending_rate,
            debt_awareness: config.debt_awareness,
        }
    }
}

/// Full state of one agent after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub tick: Tick,
    #[serde(flatten)]
    pub run: RunTag,
    pub id: AgentId,
    pub omega: f64,
    pub theta: f64,
    pub links: usize,
    pub component: usize,
    pub a: f64,
    pub b: f64,
    pub beta: f64,
    pub savings_rate: f64,
    pub u_self: f64,
    pub e_self: f64,
    pub e_star: f64,
    pub firm_id: AgentId,
    pub wage: f64,
    pub savings: f64,
    pub loan: f64,
    pub go: bool,
    pub borrow: bool,
    pub startup: bool,
    #[serde(rename = "move")]
    pub moved: bool,
    pub thwart: bool,
}

impl AgentSnapshot {
    pub fn capture(tick: Tick, run: &RunTag, agent: &Agent) -> Self {
        Self {
            tick,
            run: run.clone(),
            id: agent.id,
            omega: agent.omega,
            theta: agent.theta,
            links: agent.links,
            component: agent.component,
            a: agent.production.a,
            b: agent.production.b,
            beta: agent.production.beta,
            savings_rate: agent.savings_rate,
            u_self: agent.u_self,
            e_self: agent.e_self,
            e_star: agent.e_star,
            firm_id: agent.firm_id,
            wage: agent.wage,
            savings: agent.savings,
            loan: agent.loan,
            go: agent.flags.go,
            borrow: agent.flags.borrow(),
            startup: agent.flags.startup(),
            moved: agent.flags.moved(),
            thwart: agent.flags.thwart(),
        }
    }

    pub fn production(&self) -> ProductionParams {
        ProductionParams::new(self.a, self.b, self.beta)
    }

    pub fn net_worth(&self) -> f64 {
        self.savings - self.loan
    }

    /// Utility realized from the current wage and effort
    pub fn utility(&self) -> f64 {
        let leisure = (self.omega - self.e_star).max(0.0);
        self.wage.max(0.0).powf(self.theta) * leisure.powf(1.0 - self.theta)
    }
}

/// Members of every firm, keyed by owner
fn firms_by_owner(agents: &[AgentSnapshot]) -> BTreeMap<AgentId, Vec<&AgentSnapshot>> {
    let mut firms: BTreeMap<AgentId, Vec<&AgentSnapshot>> = BTreeMap::new();
    for agent in agents {
        firms.entry(agent.firm_id).or_default().push(agent);
    }
    firms
}

/// One multi-member firm after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmSummary {
    pub tick: Tick,
    pub firm_id: AgentId,
    pub headcount: usize,
    pub total_effort: f64,
    pub total_output: f64,
    pub average_wage: f64,
    pub total_savings: f64,
    pub total_loans: f64,
}

impl FirmSummary {
    /// Summaries of every firm with more than one member, ordered by owner
    ///
    /// `agents` must be indexed by id.
    pub fn collect(tick: Tick, agents: &[AgentSnapshot]) -> Vec<Self> {
        firms_by_owner(agents)
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|(owner, members)| {
                let headcount = members.len();
                let total_effort: f64 = members.iter().map(|m| m.e_star).sum();
                let total_output = agents[owner].production().output(total_effort);
                Self {
                    tick,
                    firm_id: owner,
                    headcount,
                    total_effort,
                    total_output,
                    average_wage: total_output / headcount as f64,
                    total_savings: members.iter().map(|m| m.savings).sum(),
                    total_loans: members.iter().map(|m| m.loan).sum(),
                }
            })
            .collect()
    }
}

/// Quintile boundaries and means of one distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuintileStats {
    /// 0th, 20th, 40th, 60th, 80th and 100th percentiles
    pub boundaries: [f64; 6],
    /// Mean of each quintile, bottom first; `None` when a quintile is empty
    pub means: [Option<f64>; 5],
    /// Top quintile mean over bottom quintile mean
    pub top_to_bottom: Option<f64>,
}

impl QuintileStats {
    pub fn of(values: &[f64]) -> Self {
        let (boundaries, means) = quintiles(values);
        let top_to_bottom = match (means[4], means[0]) {
            (Some(top), Some(bottom)) => ratio(top, bottom),
            _ => None,
        };
        Self {
            boundaries,
            means,
            top_to_bottom,
        }
    }
}

/// Economy-wide aggregates after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyCensus {
    pub tick: Tick,
    /// Firms of any size, singletons included
    pub num_firms: usize,
    pub num_singletons: usize,
    pub avg_firm_size: f64,
    /// Size of the largest firm; 1 when everyone is self-employed
    pub largest_firm_size: usize,
    /// Number of firms of each size
    pub firm_size_distribution: BTreeMap<usize, usize>,
    pub total_savings: f64,
    pub total_loans: f64,
    pub total_wages: f64,
    pub total_effort: f64,
    pub mean_utility: f64,
    pub wage_gini: f64,
    pub wealth_gini: f64,
    pub utility_gini: f64,
    pub wage_std: f64,
    pub wealth_std: f64,
    pub utility_std: f64,
    pub wage_quintiles: QuintileStats,
    pub wealth_quintiles: QuintileStats,
    pub utility_quintiles: QuintileStats,
    /// Total loans over total savings; `None` without savings
    pub debt_to_savings: Option<f64>,
    /// Share of agents working in a firm with others
    pub employment_rate: f64,
}

impl EconomyCensus {
    pub fn collect(tick: Tick, agents: &[AgentSnapshot]) -> Self {
        let population = agents.len();
        let firms = firms_by_owner(agents);

        let mut firm_size_distribution = BTreeMap::new();
        for members in firms.values() {
            *firm_size_distribution.entry(members.len()).or_insert(0) += 1;
        }
        let num_singletons = firm_size_distribution.get(&1).copied().unwrap_or(0);
        let largest_firm_size = firm_size_distribution.keys().next_back().copied().unwrap_or(1);

        let wages: Vec<f64> = agents.iter().map(|a| a.wage).collect();
        let wealth: Vec<f64> = agents.iter().map(AgentSnapshot::net_worth).collect();
        let utilities: Vec<f64> = agents.iter().map(AgentSnapshot::utility).collect();

        let total_savings: f64 = agents.iter().map(|a| a.savings).sum();
        let total_loans: f64 = agents.iter().map(|a| a.loan).sum();

        Self {
            tick,
            num_firms: firms.len(),
            num_singletons,
            avg_firm_size: ratio(population as f64, firms.len() as f64).unwrap_or(0.0),
            largest_firm_size,
            firm_size_distribution,
            total_savings,
            total_loans,
            total_wages: wages.iter().sum(),
            total_effort: agents.iter().map(|a| a.e_star).sum(),
            mean_utility: mean(&utilities).unwrap_or(0.0),
            wage_gini: gini(&wages),
            wealth_gini: gini(&wealth),
            utility_gini: gini(&utilities),
            wage_std: std_dev(&wages),
            wealth_std: std_dev(&wealth),
            utility_std: std_dev(&utilities),
            wage_quintiles: QuintileStats::of(&wages),
            wealth_quintiles: QuintileStats::of(&wealth),
            utility_quintiles: QuintileStats::of(&utilities),
            debt_to_savings: ratio(total_loans, total_savings),
            employment_rate: ratio((population - num_singletons) as f64, population as f64)
                .unwrap_or(0.0),
        }
    }
}

/// Everything produced by one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    pub agents: Vec<AgentSnapshot>,
    pub firms: Vec<FirmSummary>,
    pub census: EconomyCensus,
    /// One record per agent that passed its churn trial, in activation order
    pub decisions: Vec<DecisionRecord>,
}

impl TickReport {
    pub fn capture(
        tick: Tick,
        run: &RunTag,
        economy: &Economy,
        decisions: Vec<DecisionRecord>,
    ) -> Self {
        let agents: Vec<AgentSnapshot> = economy
            .agents()
            .iter()
            .map(|agent| AgentSnapshot::capture(tick, run, agent))
            .collect();
        let firms = FirmSummary::collect(tick, &agents);
        let census = EconomyCensus::collect(tick, &agents);

        Self {
            tick,
            agents,
            firms,
            census,
            decisions,
        }
    }

    pub fn active_agents(&self) -> usize {
        self.decisions.len()
    }
}

/// Terminal state of one node in the firm graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    pub id: AgentId,
    pub firm_id: AgentId,
    pub savings: f64,
    pub wage: f64,
    pub loan: f64,
}

/// Firm graph at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalTopology {
    pub nodes: Vec<NodeState>,
    /// Employment edges as `(low, high)` pairs
    pub edges: Vec<(AgentId, AgentId)>,
}

impl FinalTopology {
    pub fn capture(economy: &Economy) -> Self {
        let firms: &FirmGraph = economy.firms();
        Self {
            nodes: economy
                .agents()
                .iter()
                .map(|agent| NodeState {
                    id: agent.id,
                    firm_id: agent.firm_id,
                    savings: agent.savings,
                    wage: agent.wage,
                    loan: agent.loan,
                })
                .collect(),
            edges: firms.edges(),
        }
    }
}

/// Complete output of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    /// Parameters every row of the run was produced under
    pub config: SimulationConfig,
    pub ticks: Vec<TickReport>,
    pub topology: FinalTopology,
}

impl RunHistory {
    /// Every agent snapshot of the run, tick by tick
    pub fn snapshots(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.ticks.iter().flat_map(|t| t.agents.iter())
    }

    pub fn final_census(&self) -> Option<&EconomyCensus> {
        self.ticks.last().map(|t| &t.census)
    }
}
