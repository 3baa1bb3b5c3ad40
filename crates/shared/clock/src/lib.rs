//! EFM Clock
//!
//! Discrete simulation time and the per-tick activation schedule:
//!
//! ```text
//! TickClock (0 .. tmax)
//!     │
//!     └── each tick ──► ActivationSchedule
//!                           │  1. uniform random permutation of agent ids
//!                           │  2. Bernoulli(churn) trial per id, in order
//!                           ▼
//!                       active agents decide sequentially
//! ```
//!
//! The clock owns no randomness: every draw goes through the run's single
//! generator, passed in by the caller.
//!
//! ## Usage
//!
//! ```ignore
//! use efm_clock::{ActivationSchedule, TickClock};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut clock = TickClock::new(500);
//! let schedule = ActivationSchedule::new(0.01);
//!
//! while let Some(tick) = clock.next_tick() {
//!     for agent in schedule.order(population, &mut rng) {
//!         if schedule.is_active(&mut rng) {
//!             // decide ...
//!         }
//!     }
//! }
//! ```

mod activation;
mod tick;

pub use activation::ActivationSchedule;
pub use tick::TickClock;
