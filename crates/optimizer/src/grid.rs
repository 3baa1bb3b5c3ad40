use efm_core::{Result, SimError};
use efm_ports::ScalarMaximizer;

/// Evenly spaced sample points over `[lower, upper]`, both ends included
pub(crate) fn linspace(lower: f64, upper: f64, points: usize) -> impl Iterator<Item = f64> {
    let steps = points.max(2) - 1;
    let step = (upper - lower) / steps as f64;
    (0..=steps).map(move |k| if k == steps { upper } else { lower + step * k as f64 })
}

/// Best finite sample of `f`, as `(index, x, f(x))`; first wins ties
pub(crate) fn best_sample(
    f: &dyn Fn(f64) -> f64,
    lower: f64,
    upper: f64,
    points: usize,
) -> Option<(usize, f64, f64)> {
    let mut best: Option<(usize, f64, f64)> = None;
    for (k, x) in linspace(lower, upper, points).enumerate() {
        let value = f(x);
        if !value.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, _, top)| value > top) {
            best = Some((k, x, value));
        }
    }
    best
}

/// Brute-force maximizer over a dense grid
///
/// Accurate to half the grid spacing. Used to cross-check the refined search
/// and when exact reproducibility against a plain scan matters more than
/// precision.
#[derive(Debug, Clone, Copy)]
pub struct GridMaximizer {
    points: usize,
}

impl GridMaximizer {
    pub fn new(points: usize) -> Self {
        Self {
            points: points.max(2),
        }
    }
}

impl Default for GridMaximizer {
    fn default() -> Self {
        Self::new(10_001)
    }
}

impl ScalarMaximizer for GridMaximizer {
    fn maximize(&self, f: &dyn Fn(f64) -> f64, lower: f64, upper: f64) -> Result<(f64, f64)> {
        if !(lower.is_finite() && upper.is_finite()) || lower > upper {
            return Err(SimError::OptimizationFailure(format!(
                "invalid bounds [{}, {}]",
                lower, upper
            )));
        }

        best_sample(f, lower, upper, self.points)
            .map(|(_, x, value)| (x, value))
            .ok_or_else(|| {
                SimError::OptimizationFailure(format!(
                    "objective not finite anywhere on [{}, {}]",
                    lower, upper
                ))
            })
    }

    fn name(&self) -> &str {
        "Grid"
    }
}
