use efm_core::Result;

/// Port for bounded univariate maximization
///
/// Implementations must return the *global* maximum of `f` on the closed
/// interval `[lower, upper]`, not merely a local stationary point: the
/// effort objective is not concave when returns to scale exceed one.
pub trait ScalarMaximizer: Send + Sync {
    /// Maximize `f` on `[lower, upper]`
    ///
    /// Returns `(argmax, max)`. Fails with `SimError::OptimizationFailure`
    /// when no finite optimum exists on the interval.
    fn maximize(&self, f: &dyn Fn(f64) -> f64, lower: f64, upper: f64) -> Result<(f64, f64)>;

    /// Get the maximizer's name for debugging
    fn name(&self) -> &str {
        "ScalarMaximizer"
    }
}

impl<T: ScalarMaximizer + ?Sized> ScalarMaximizer for Box<T> {
    fn maximize(&self, f: &dyn Fn(f64) -> f64, lower: f64, upper: f64) -> Result<(f64, f64)> {
        (**self).maximize(f, lower, upper)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
