//! EFM Core Domain
//!
//! Pure domain types for the emergent firms model.
//! This crate contains no I/O and no randomness, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Agent, Outcome, ProductionParams, TickFlags};
pub use error::{Result, SimError};
pub use values::{AgentId, OMEGA, Tick};
