use efm_core::AgentId;
use rand::Rng;
use rand::seq::SliceRandom;

/// Per-tick activation rule
///
/// Each tick the whole population is shuffled into a random order; walking
/// that order, every agent faces an independent `Bernoulli(churn)` trial and
/// only those passing it reconsider their employment. Callers must draw the
/// trial for an agent right before that agent decides so that the draws
/// interleave with any randomness the decision itself consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationSchedule {
    churn: f64,
}

impl ActivationSchedule {
    /// `churn` is clamped into `[0, 1]`
    pub fn new(churn: f64) -> Self {
        Self {
            churn: churn.clamp(0.0, 1.0),
        }
    }

    pub fn churn(&self) -> f64 {
        self.churn
    }

    /// Uniformly random permutation of `0..population`
    pub fn order<R: Rng + ?Sized>(&self, population: usize, rng: &mut R) -> Vec<AgentId> {
        let mut order: Vec<AgentId> = (0..population).collect();
        order.shuffle(rng);
        order
    }

    /// One churn trial
    pub fn is_active<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.churn)
    }
}
