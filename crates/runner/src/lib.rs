//! EFM Runner - Emergent Firms Simulation
//!
//! Orchestrates one run of the emergent firms model:
//!
//! - **Config**: flat JSON record with defaults for every parameter
//! - **Bootstrap**: draws the population and the social network
//! - **Simulation**: the tick loop over the engine's economy
//! - **Reports**: per-tick agent snapshots, firm summaries and census,
//!   plus the final firm topology
//!
//! ## Architecture
//!
//! ```text
//!   SimulationConfig ──► bootstrap ──► Economy (agents, social graph, firms)
//!                                         │
//!          ┌──────────────────────────────┘
//!          ▼
//!   ┌─────────────────── Simulation::tick ───────────────────┐
//!   │ reset flags ─► shuffle ─► churn trial ─► decide/apply  │
//!   │            distribute output ─► service loans          │
//!   │                   check invariants                     │
//!   └──────────────────────────┬─────────────────────────────┘
//!                              ▼
//!                TickReport (snapshots, firms, census, decisions)
//!                              │
//!                              ▼
//!                RunHistory + FinalTopology ──► efm-sim writes JSON
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use efm_runner::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::from_file("config.json")?;
//! let history = Simulation::new(config)?.run()?;
//! println!("{} ticks", history.ticks.len());
//! ```

pub mod bootstrap;
pub mod config;
pub mod report;
pub mod simulation;
pub mod stats;

// Re-export main types
pub use bootstrap::{SavingsRateSampler, bootstrap};
pub use config::{ConfigError, SimulationConfig};
pub use report::{
    AgentSnapshot, EconomyCensus, FinalTopology, FirmSummary, NodeState, QuintileStats,
    RunHistory, RunTag, TickReport,
};
pub use simulation::Simulation;
