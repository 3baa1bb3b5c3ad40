//! Simulation Properties Integration Test
//!
//! Runs the full tick loop and checks the properties every run must keep:
//! - Agent state stays within bounds at every tick
//! - Firm ids always resolve to an owner inside the agent's own firm
//! - At most one outcome flag per agent per tick
//! - Identical seeds give identical histories

use efm_graph::Topology;
use efm_runner::{AgentSnapshot, RunHistory, Simulation, SimulationConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn small_run() -> SimulationConfig {
    SimulationConfig {
        experiment: "small".to_string(),
        population: 10,
        churn: 1.0,
        lending: false,
        tmax: 5,
        ..SimulationConfig::default()
    }
}

fn busy_run() -> SimulationConfig {
    SimulationConfig {
        experiment: "busy".to_string(),
        population: 60,
        churn: 0.3,
        move_cost: 0.2,
        tmax: 40,
        seed: 7,
        ..SimulationConfig::default()
    }
}

fn outcome_flags(agent: &AgentSnapshot) -> usize {
    [agent.borrow, agent.startup, agent.moved, agent.thwart]
        .iter()
        .filter(|&&flag| flag)
        .count()
}

fn assert_history_invariants(history: &RunHistory) {
    for report in &history.ticks {
        let agents = &report.agents;
        for agent in agents {
            assert!((0.0..=1.0).contains(&agent.e_star), "{:?}", agent);
            assert!(agent.savings >= 0.0, "{:?}", agent);
            assert!(agent.loan >= 0.0, "{:?}", agent);
            assert!(agent.wage >= 0.0, "{:?}", agent);
            assert!(outcome_flags(agent) <= 1, "{:?}", agent);
            if outcome_flags(agent) == 1 {
                assert!(agent.go);
            }

            // The firm id names an agent that owns itself
            assert!(agent.firm_id < agents.len());
            assert_eq!(agents[agent.firm_id].firm_id, agent.firm_id);
        }
    }
}

#[test]
fn test_small_run_produces_every_row() {
    let history = Simulation::new(small_run()).unwrap().run().unwrap();

    assert_eq!(history.ticks.len(), 5);
    assert_eq!(history.snapshots().count(), 50);
    for (tick, report) in history.ticks.iter().enumerate() {
        assert_eq!(report.tick, tick as u64);
        assert_eq!(report.active_agents(), 10);
        assert_eq!(report.agents.len(), 10);
    }
    assert!(history.snapshots().all(|a| a.loan == 0.0 && !a.borrow));
    assert!(history.snapshots().all(|a| {
        a.run.experiment == "small" && a.run.churn == 1.0 && !a.run.lending
    }));
    assert_history_invariants(&history);
}

#[test]
fn test_firm_ids_stay_inside_own_firm() {
    let mut sim = Simulation::new(small_run()).unwrap();
    while sim.tick().unwrap().is_some() {
        let economy = sim.economy();
        for agent in economy.agents() {
            let firm = economy.firms().component_of(agent.id);
            assert!(
                firm.contains(&agent.firm_id),
                "agent {} points at {} outside {:?}",
                agent.id,
                agent.firm_id,
                firm
            );
        }
    }
}

#[test]
fn test_busy_run_keeps_invariants() {
    let history = Simulation::new(busy_run()).unwrap().run().unwrap();
    assert_eq!(history.ticks.len(), 40);
    assert_history_invariants(&history);

    // Firm summaries agree with the snapshots they came from
    for report in &history.ticks {
        let employed: usize = report.firms.iter().map(|f| f.headcount).sum();
        assert_eq!(employed + report.census.num_singletons, 60);
    }
}

#[test]
fn test_same_seed_same_history() {
    let first = Simulation::new(busy_run()).unwrap().run().unwrap();
    let second = Simulation::new(busy_run()).unwrap().run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_explicit_generator_matches_seed() {
    let config = busy_run();
    let rng = StdRng::seed_from_u64(config.seed);
    let explicit = Simulation::with_rng(config.clone(), rng).unwrap().run().unwrap();
    let seeded = Simulation::new(config).unwrap().run().unwrap();
    assert_eq!(explicit, seeded);
}

#[test]
fn test_no_activity_without_churn() {
    let config = SimulationConfig {
        churn: 0.0,
        ..busy_run()
    };
    let history = Simulation::new(config).unwrap().run().unwrap();

    assert!(history.ticks.iter().all(|t| t.active_agents() == 0));
    assert!(history.topology.edges.is_empty());
    assert!(history.snapshots().all(|a| a.firm_id == a.id && !a.go));
    let census = history.final_census().unwrap();
    assert_eq!(census.num_singletons, 60);
}

#[test]
fn test_final_topology_matches_last_tick() {
    let history = Simulation::new(busy_run()).unwrap().run().unwrap();
    let last = history.ticks.last().unwrap();

    for (node, agent) in history.topology.nodes.iter().zip(&last.agents) {
        assert_eq!(node.id, agent.id);
        assert_eq!(node.firm_id, agent.firm_id);
        assert_eq!(node.savings, agent.savings);
    }
    // Every edge joins a worker to its owner
    for &(a, b) in &history.topology.edges {
        let (na, nb) = (&history.topology.nodes[a], &history.topology.nodes[b]);
        assert!(na.firm_id == b || nb.firm_id == a);
    }
}

#[test]
fn test_invalid_config_aborts_before_running() {
    let config = SimulationConfig {
        population: 3,
        min_degree: 3,
        ..SimulationConfig::default()
    };
    let err = Simulation::new(config).err().unwrap();
    assert!(err.is_configuration());
}

#[test]
fn test_history_serializes() {
    let history = Simulation::new(small_run()).unwrap().run().unwrap();
    let json = serde_json::to_string(&history).unwrap();
    assert!(json.contains("\"census\""));
    assert!(json.contains("\"move\""));
}
