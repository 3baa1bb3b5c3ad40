//! Bootstrap - population and network setup
//!
//! Builds the starting economy from a config and the run's generator:
//! - Drawing each agent's preferences, production constants and savings rate
//! - Solving each agent's singleton effort problem
//! - Sampling the social network and recording each agent's place in it

use efm_core::{Agent, OMEGA, ProductionParams, Result, SimError};
use efm_engine::Economy;
use efm_graph::{SocialGraph, Topology};
use efm_optimizer::{EffortOptimizer, ScalarMaximizer, create_maximizer};
use log::{debug, info};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::SimulationConfig;

/// Normal draws rejected before falling back to clamping the last one
const MAX_TRUNCATION_REDRAWS: usize = 1000;

/// Savings rates drawn from a normal distribution truncated to `[0, 1]`
///
/// A zero spread gives every agent the mean.
#[derive(Debug, Clone, Copy)]
pub struct SavingsRateSampler {
    mean: f64,
    normal: Option<Normal<f64>>,
}

impl SavingsRateSampler {
    pub fn new(mean: f64, spread: f64) -> Result<Self> {
        let normal = if spread > 0.0 {
            Some(Normal::new(mean, spread).map_err(|e| {
                SimError::Configuration(format!("savings rate distribution: {}", e))
            })?)
        } else {
            None
        };
        Ok(Self { mean, normal })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let Some(normal) = self.normal else {
            return self.mean;
        };

        let mut draw = normal.sample(rng);
        for _ in 0..MAX_TRUNCATION_REDRAWS {
            if (0.0..=1.0).contains(&draw) {
                return draw;
            }
            draw = normal.sample(rng);
        }
        draw.clamp(0.0, 1.0)
    }
}

/// Draw one agent's constants and solve its singleton problem
fn create_agent<R: Rng + ?Sized, M: ScalarMaximizer>(
    id: usize,
    savings: &SavingsRateSampler,
    optimizer: &EffortOptimizer<M>,
    rng: &mut R,
) -> Result<Agent> {
    let theta = rng.gen_range(0.0..=1.0);
    let production = ProductionParams::new(
        rng.gen_range(0.0..0.5),
        rng.gen_range(0.75..1.25),
        rng.gen_range(1.0..1.5),
    );
    let savings_rate = savings.sample(rng);

    let singleton = optimizer.optimize(&production, OMEGA, theta, 0.0, 1)?;
    Ok(Agent::new(id, production, theta, savings_rate, singleton))
}

/// Build the starting economy: everyone self-employed
///
/// Agents are drawn first, in id order, then the social network; every draw
/// comes from `rng`.
pub fn bootstrap<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Economy> {
    config.validate()?;

    let savings = SavingsRateSampler::new(config.savings_rate_mean, config.savings_rate_spread)?;
    let optimizer = EffortOptimizer::new(create_maximizer(&config.optimizer));

    let agents = (0..config.population)
        .map(|id| create_agent(id, &savings, &optimizer, rng))
        .collect::<Result<Vec<_>>>()?;

    let social = SocialGraph::build(
        config.population,
        config.min_degree,
        config.max_degree,
        config.degree_sequence_attempts,
        rng,
    )?;

    let agents = agents
        .into_iter()
        .map(|agent| {
            let id = agent.id;
            agent.with_social(social.degree(id), social.component_index(id))
        })
        .collect();

    debug!(
        "Social network: {} edges, {} components",
        social.edge_count(),
        social.component_count()
    );
    info!(
        "Bootstrapped {} agents ({} maximizer)",
        config.population,
        optimizer.maximizer().name()
    );

    Ok(Economy::new(agents, social, config.economy_params())?
        .with_maximizer(optimizer.into_maximizer()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            population: 40,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_agents_within_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let economy = bootstrap(&small_config(), &mut rng).unwrap();

        assert_eq!(economy.population(), 40);
        for agent in economy.agents() {
            assert!((0.0..=1.0).contains(&agent.theta));
            assert!((0.0..0.5).contains(&agent.production.a));
            assert!((0.75..1.25).contains(&agent.production.b));
            assert!((1.0..1.5).contains(&agent.production.beta));
            assert!((0.0..=1.0).contains(&agent.savings_rate));
            assert!((2..=6).contains(&agent.links));
            assert!(agent.is_owner());
            assert_relative_eq!(agent.e_star, agent.e_self);
            assert_relative_eq!(agent.wage, agent.production.output(agent.e_self));
        }
        assert!(economy.check_invariants(0).is_ok());
    }

    #[test]
    fn test_zero_spread_gives_fixed_rate() {
        let config = SimulationConfig {
            savings_rate_spread: 0.0,
            ..small_config()
        };
        let economy = bootstrap(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(economy.agents().iter().all(|a| a.savings_rate == 0.03));
    }

    #[test]
    fn test_truncated_savings_rates() {
        let sampler = SavingsRateSampler::new(0.02, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let rate = sampler.sample(&mut rng);
            assert!((0.0..=1.0).contains(&rate));
        }
    }

    #[test]
    fn test_bootstrap_deterministic() {
        let a = bootstrap(&small_config(), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = bootstrap(&small_config(), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.agents(), b.agents());
        assert_eq!(a.social(), b.social());
    }

    #[test]
    fn test_configured_maximizer_is_used() {
        let golden = bootstrap(&small_config(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(golden.maximizer_name(), "GoldenSection");

        let config = SimulationConfig {
            optimizer: "grid".to_string(),
            ..small_config()
        };
        let grid = bootstrap(&config, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(grid.maximizer_name(), "Grid");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            population: 0,
            ..SimulationConfig::default()
        };
        let err = bootstrap(&config, &mut StdRng::seed_from_u64(0)).err();
        assert!(matches!(err, Some(SimError::Configuration(_))));
    }
}
