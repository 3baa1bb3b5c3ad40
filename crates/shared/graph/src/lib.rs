//! EFM Graphs
//!
//! Two undirected graphs over the agent population:
//!
//! - **SocialGraph**: fixed at initialization, decides which firms an agent
//!   can see. Built from a random graphical degree sequence.
//! - **FirmGraph**: starts as isolated nodes and is rewired by every accepted
//!   move or startup. Its connected components *are* the firms.
//!
//! Both implement the [`Topology`](efm_ports::Topology) port; only the firm
//! graph is mutable.

mod adjacency;
mod degree_sequence;
mod firm_graph;
mod social_graph;

pub use adjacency::Adjacency;
pub use degree_sequence::{havel_hakimi, is_graphical};
pub use firm_graph::FirmGraph;
pub use social_graph::SocialGraph;

// Re-export the ports for convenience
pub use efm_ports::{MutableTopology, Topology};
