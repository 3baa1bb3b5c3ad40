use serde::{Deserialize, Serialize};

/// Production constants drawn once per agent
///
/// A firm always produces with the constants of its current owner:
/// `O(E) = a·E + b·E^beta` for total member effort `E`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionParams {
    /// Linear (constant-returns) coefficient, in [0, 0.5)
    pub a: f64,
    /// Coefficient on the increasing-returns term, in [0.75, 1.25)
    pub b: f64,
    /// Returns-to-scale exponent, in [1, 1.5)
    pub beta: f64,
}

impl ProductionParams {
    pub fn new(a: f64, b: f64, beta: f64) -> Self {
        Self { a, b, beta }
    }

    /// Total output for the given aggregate effort
    pub fn output(&self, total_effort: f64) -> f64 {
        self.a * total_effort + self.b * total_effort.powf(self.beta)
    }
}
