//! EFM Effort Optimizer
//!
//! Chooses how much effort an agent commits to a firm. Given the firm's
//! production constants and the effort of everyone else in it, the agent
//! maximizes
//!
//! ```text
//! U(e) = (O(e + E_other) / n)^theta * (w - e)^(1 - theta),   O(E) = a*E + b*E^beta
//! ```
//!
//! over `0 <= e < w`, `e <= 1`. With `beta > 1` the objective is not concave,
//! so the bounded search must be global.

mod effort;
mod golden;
mod grid;

pub use effort::{EffortOptimizer, effort_utility, grid_maximize_effort, optimize_e};
pub use golden::GoldenSectionMaximizer;
pub use grid::GridMaximizer;

// Re-export the trait from ports for convenience
pub use efm_ports::ScalarMaximizer;

/// Names accepted by `create_maximizer`, case-insensitive
pub const MAXIMIZER_NAMES: &[&str] = &["golden", "grid"];

/// Whether `name` selects a known maximizer
pub fn is_known_maximizer(name: &str) -> bool {
    MAXIMIZER_NAMES.contains(&name.to_lowercase().as_str())
}

/// Factory function to create maximizers by name
pub fn create_maximizer(maximizer_type: &str) -> Box<dyn ScalarMaximizer> {
    match maximizer_type.to_lowercase().as_str() {
        "grid" => Box::new(GridMaximizer::default()),
        _ => Box::new(GoldenSectionMaximizer::default()), // Default
    }
}
