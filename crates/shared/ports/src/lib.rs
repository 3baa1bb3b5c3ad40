//! EFM Ports
//!
//! Port definitions (traits) for the emergent firms model.
//! These define the boundaries between the economic engine and the
//! numerical / graph machinery it relies on.

mod maximizer;
mod topology;

pub use maximizer::ScalarMaximizer;
pub use topology::{MutableTopology, Topology};
