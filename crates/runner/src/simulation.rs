//! Simulation - the tick loop
//!
//! Each tick:
//! 1. Reset every agent's transient flags
//! 2. Shuffle the population into a random activation order
//! 3. Walk that order, letting each agent that passes its churn trial decide
//!    immediately, so later agents see earlier agents' moves
//! 4. Distribute output, then service loans
//! 5. Check invariants and capture the tick report
//!
//! All randomness flows through the single generator owned by the simulation.

use efm_clock::{ActivationSchedule, TickClock};
use efm_core::Result;
use efm_engine::Economy;
use log::{info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bootstrap::bootstrap;
use crate::config::SimulationConfig;
use crate::report::{FinalTopology, RunHistory, RunTag, TickReport};

/// One simulation run
pub struct Simulation<R: Rng = StdRng> {
    config: SimulationConfig,
    economy: Economy,
    clock: TickClock,
    schedule: ActivationSchedule,
    tag: RunTag,
    rng: R,
}

impl Simulation<StdRng> {
    /// Create a run seeded from `config.seed`
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Create a run drawing from an explicit generator
    pub fn with_rng(config: SimulationConfig, mut rng: R) -> Result<Self> {
        let economy = bootstrap(&config, &mut rng)?;
        Ok(Self {
            clock: TickClock::new(config.tmax),
            schedule: ActivationSchedule::new(config.churn),
            tag: RunTag::of(&config),
            config,
            economy,
            rng,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Run the next tick, or return `None` once every tick has run
    pub fn tick(&mut self) -> Result<Option<TickReport>> {
        let Some(tick) = self.clock.next_tick() else {
            return Ok(None);
        };

        self.economy.reset_flags();

        let order = self.schedule.order(self.economy.population(), &mut self.rng);
        let mut decisions = Vec::new();
        for id in order {
            if self.schedule.is_active(&mut self.rng) {
                decisions.push(self.economy.step_agent(id, tick, &mut self.rng)?);
            }
        }
        trace!("Tick {}: {} active agents", tick, decisions.len());

        self.economy.distribute_output();
        self.economy.service_loans();
        self.economy.check_invariants(tick)?;

        Ok(Some(TickReport::capture(tick, &self.tag, &self.economy, decisions)))
    }

    /// Run every remaining tick
    ///
    /// The history is only returned once all ticks have completed; any error
    /// aborts the run and discards what was collected.
    pub fn run(mut self) -> Result<RunHistory> {
        info!(
            "Starting run '{}': {} agents, {} ticks, seed {}, {} maximizer",
            self.config.experiment,
            self.config.population,
            self.clock.tmax(),
            self.config.seed,
            self.economy.maximizer_name()
        );

        let mut ticks = Vec::with_capacity(self.clock.remaining() as usize);
        while let Some(report) = self.tick()? {
            if self.clock.elapsed() % 100 == 0 {
                info!(
                    "Tick {}/{}: {} firms, {} singletons, employment {:.3}",
                    self.clock.elapsed(),
                    self.clock.tmax(),
                    report.census.num_firms,
                    report.census.num_singletons,
                    report.census.employment_rate
                );
            }
            ticks.push(report);
        }

        let topology = FinalTopology::capture(&self.economy);
        info!(
            "Finished run '{}': {} firm edges",
            self.config.experiment,
            topology.edges.len()
        );

        Ok(RunHistory {
            config: self.config,
            ticks,
            topology,
        })
    }
}
