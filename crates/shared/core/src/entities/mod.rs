mod agent;
mod flags;
mod production;

pub use agent::Agent;
pub use flags::{Outcome, TickFlags};
pub use production::ProductionParams;
