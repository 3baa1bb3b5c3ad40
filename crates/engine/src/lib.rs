//! EFM Engine
//!
//! The economy a simulation tick acts on, responsible for:
//! - **Decisions**: an active agent compares staying, moving to a firm seen
//!   through its social network, and starting up on its own
//! - **Firm Membership**: accepted moves rewire the firm graph, handing a
//!   firm to a random remaining member when its owner leaves
//! - **Distribution**: each firm's output is split evenly among its members
//! - **Consistency**: every agent's firm id must resolve inside its own firm
//!
//! ## Architecture
//!
//! ```text
//!              ┌──────────────────────── Economy ────────────────────────┐
//!  agent i ──► │ decide ──► EffortOptimizer (U_single, U_current, U_other)│
//!              │   │                                                      │
//!              │   ├──► LoanDesk (screen candidates, finance the cost)    │
//!              │   ▼                                                      │
//!              │ apply_decision ──► FirmGraph (transfer ownership, rewire)│
//!              └──────────────────────────────────────────────────────────┘
//!  end of tick ──► distribute_output ──► service_loans ──► check_invariants
//! ```

pub mod decision;
pub mod economy;
pub mod membership;
pub mod params;

#[cfg(test)]
mod fixtures;

pub use decision::{Candidate, Decision, DecisionKind, DecisionRecord, Intent};
pub use economy::Economy;
pub use params::EconomyParams;
