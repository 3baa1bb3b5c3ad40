use efm_core::{ProductionParams, Result, SimError};
use efm_ports::ScalarMaximizer;
use log::trace;

use crate::golden::GoldenSectionMaximizer;
use crate::grid::GridMaximizer;

/// Gap kept between the effort upper bound and `w`
const EFFORT_MARGIN: f64 = 1e-9;

/// Utility of committing effort `e` to a firm of `n` members
pub fn effort_utility(
    production: &ProductionParams,
    w: f64,
    theta: f64,
    e_other: f64,
    n: usize,
    e: f64,
) -> f64 {
    let share = production.output(e + e_other) / n as f64;
    share.powf(theta) * (w - e).powf(1.0 - theta)
}

/// Optimal `(effort, utility)` using the default maximizer
///
/// `n` is the headcount including the deciding agent.
pub fn optimize_e(
    a: f64,
    b: f64,
    beta: f64,
    w: f64,
    theta: f64,
    e_other: f64,
    n: usize,
) -> Result<(f64, f64)> {
    EffortOptimizer::default().optimize(&ProductionParams::new(a, b, beta), w, theta, e_other, n)
}

/// Dense-grid maximization of the same objective, for verification
pub fn grid_maximize_effort(
    production: &ProductionParams,
    w: f64,
    theta: f64,
    e_other: f64,
    n: usize,
    points: usize,
) -> Result<(f64, f64)> {
    EffortOptimizer::new(GridMaximizer::new(points)).optimize(production, w, theta, e_other, n)
}

/// Effort optimizer backed by a bounded scalar maximizer
#[derive(Debug, Clone, Copy)]
pub struct EffortOptimizer<M: ScalarMaximizer = GoldenSectionMaximizer> {
    maximizer: M,
}

impl Default for EffortOptimizer<GoldenSectionMaximizer> {
    fn default() -> Self {
        Self::new(GoldenSectionMaximizer::default())
    }
}

impl<M: ScalarMaximizer> EffortOptimizer<M> {
    pub fn new(maximizer: M) -> Self {
        Self { maximizer }
    }

    pub fn maximizer(&self) -> &M {
        &self.maximizer
    }

    pub fn into_maximizer(self) -> M {
        self.maximizer
    }

    /// Maximize utility over `e in [0, min(1, w))`
    ///
    /// Fails with `SimError::OptimizationFailure` on non-finite inputs, an
    /// empty firm, a non-positive ceiling or a non-finite optimum.
    pub fn optimize(
        &self,
        production: &ProductionParams,
        w: f64,
        theta: f64,
        e_other: f64,
        n: usize,
    ) -> Result<(f64, f64)> {
        let inputs = [production.a, production.b, production.beta, w, theta, e_other];
        if inputs.iter().any(|x| !x.is_finite()) {
            return Err(SimError::OptimizationFailure(format!(
                "non-finite input: production {:?}, w {}, theta {}, e_other {}",
                production, w, theta, e_other
            )));
        }
        if n == 0 {
            return Err(SimError::OptimizationFailure(
                "firm headcount must be positive".to_string(),
            ));
        }

        let upper = w.min(1.0) - EFFORT_MARGIN;
        if upper < 0.0 {
            return Err(SimError::OptimizationFailure(format!(
                "effort ceiling {} leaves no feasible effort",
                w
            )));
        }

        let objective = |e: f64| effort_utility(production, w, theta, e_other, n, e);
        let (effort, utility) = self.maximizer.maximize(&objective, 0.0, upper)?;

        if !(effort.is_finite() && utility.is_finite()) {
            return Err(SimError::OptimizationFailure(format!(
                "{} returned a non-finite optimum ({}, {})",
                self.maximizer.name(),
                effort,
                utility
            )));
        }

        trace!(
            "optimize_e n={} e_other={:.4} -> e={:.6} U={:.6}",
            n, e_other, effort, utility
        );
        Ok((effort.clamp(0.0, 1.0), utility))
    }
}
