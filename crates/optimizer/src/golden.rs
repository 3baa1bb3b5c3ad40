use efm_core::{Result, SimError};
use efm_ports::ScalarMaximizer;

use crate::grid::{best_sample, linspace};

/// 1 / golden ratio
const INV_PHI: f64 = 0.618_033_988_749_895;

/// Bracketing scan followed by golden-section refinement
///
/// A coarse scan locates the best sample, which brackets the global peak
/// between its two neighbours as long as the scan resolves every local
/// maximum. Golden-section search then narrows that bracket to `tolerance`.
/// The refined point is only kept if it beats the best sample.
#[derive(Debug, Clone, Copy)]
pub struct GoldenSectionMaximizer {
    scan_points: usize,
    tolerance: f64,
    max_iterations: usize,
}

impl GoldenSectionMaximizer {
    pub fn new(scan_points: usize, tolerance: f64) -> Self {
        Self {
            scan_points: scan_points.max(3),
            tolerance,
            max_iterations: 200,
        }
    }

    fn refine(&self, f: &dyn Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> Option<(f64, f64)> {
        let mut x1 = hi - INV_PHI * (hi - lo);
        let mut x2 = lo + INV_PHI * (hi - lo);
        let mut f1 = f(x1);
        let mut f2 = f(x2);

        for _ in 0..self.max_iterations {
            if hi - lo <= self.tolerance {
                break;
            }
            // NaN compares false, which keeps the lower half
            if f1 >= f2 || f2.is_nan() {
                hi = x2;
                x2 = x1;
                f2 = f1;
                x1 = hi - INV_PHI * (hi - lo);
                f1 = f(x1);
            } else {
                lo = x1;
                x1 = x2;
                f1 = f2;
                x2 = lo + INV_PHI * (hi - lo);
                f2 = f(x2);
            }
        }

        let x = 0.5 * (lo + hi);
        let value = f(x);
        value.is_finite().then_some((x, value))
    }
}

impl Default for GoldenSectionMaximizer {
    fn default() -> Self {
        Self::new(1001, 1e-10)
    }
}

impl ScalarMaximizer for GoldenSectionMaximizer {
    fn maximize(&self, f: &dyn Fn(f64) -> f64, lower: f64, upper: f64) -> Result<(f64, f64)> {
        if !(lower.is_finite() && upper.is_finite()) || lower > upper {
            return Err(SimError::OptimizationFailure(format!(
                "invalid bounds [{}, {}]",
                lower, upper
            )));
        }

        let (index, x, value) =
            best_sample(f, lower, upper, self.scan_points).ok_or_else(|| {
                SimError::OptimizationFailure(format!(
                    "objective not finite anywhere on [{}, {}]",
                    lower, upper
                ))
            })?;

        let samples: Vec<f64> = linspace(lower, upper, self.scan_points).collect();
        let lo = samples[index.saturating_sub(1)];
        let hi = samples[(index + 1).min(samples.len() - 1)];

        match self.refine(f, lo, hi) {
            Some((refined_x, refined_value)) if refined_value > value => {
                Ok((refined_x, refined_value))
            }
            _ => Ok((x, value)),
        }
    }

    fn name(&self) -> &str {
        "GoldenSection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smooth_peak() {
        let maximizer = GoldenSectionMaximizer::default();
        let (x, value) = maximizer
            .maximize(&|x| -(x - 0.123_456).powi(2) + 2.0, 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(x, 0.123_456, epsilon = 1e-6);
        assert_relative_eq!(value, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_global_over_local_peak() {
        // Local maximum at 0.2 (height 1), global at 0.8 (height 2)
        let f = |x: f64| {
            (-(x - 0.2).powi(2) / 0.005).exp() + 2.0 * (-(x - 0.8).powi(2) / 0.005).exp()
        };
        let (x, _) = GoldenSectionMaximizer::default()
            .maximize(&f, 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(x, 0.8, epsilon = 1e-4);
    }

    #[test]
    fn test_peak_on_boundary() {
        let maximizer = GoldenSectionMaximizer::default();
        let (x, value) = maximizer.maximize(&|x| x, 0.0, 1.0).unwrap();
        assert_relative_eq!(x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_interval() {
        let maximizer = GoldenSectionMaximizer::default();
        let (x, value) = maximizer.maximize(&|x| 3.0 * x, 0.5, 0.5).unwrap();
        assert_relative_eq!(x, 0.5);
        assert_relative_eq!(value, 1.5);
    }

    #[test]
    fn test_invalid_inputs_fail() {
        let maximizer = GoldenSectionMaximizer::default();
        assert!(maximizer.maximize(&|x| x, f64::NAN, 1.0).is_err());
        assert!(maximizer.maximize(&|_| f64::INFINITY, 0.0, 1.0).is_err());
    }
}
