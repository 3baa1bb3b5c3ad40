use efm_core::AgentId;
use efm_ports::{MutableTopology, Topology};
use serde::{Deserialize, Serialize};

use crate::adjacency::Adjacency;

/// Firm-membership graph
///
/// An edge joins a worker to the owner of its firm, so every firm is a star
/// around its owner. A connected component of size `n > 1` is a firm with
/// `n` members; a component of size one is a self-employed singleton.
///
/// Firms have no identity beyond this connectivity: callers resolve a
/// component's owner through the members' `firm_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmGraph {
    graph: Adjacency,
}

impl FirmGraph {
    /// Everyone self-employed
    pub fn new(n: usize) -> Self {
        Self {
            graph: Adjacency::new(n),
        }
    }

    /// Every firm and singleton, each sorted, ordered by smallest member
    pub fn components(&self) -> Vec<Vec<AgentId>> {
        self.graph.components()
    }

    /// Employment edges as `(low, high)` pairs
    pub fn edges(&self) -> Vec<(AgentId, AgentId)> {
        self.graph.edges()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Members of `node`'s firm other than `node` itself
    pub fn co_members(&self, node: AgentId) -> Vec<AgentId> {
        let mut members = self.graph.component_of(node);
        members.retain(|&m| m != node);
        members
    }

    pub fn is_singleton(&self, node: AgentId) -> bool {
        self.graph.degree(node) == 0
    }
}

impl Topology for FirmGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn neighbors(&self, node: AgentId) -> Vec<AgentId> {
        self.graph.neighbors(node)
    }

    fn component_of(&self, node: AgentId) -> Vec<AgentId> {
        self.graph.component_of(node)
    }

    fn has_edge(&self, a: AgentId, b: AgentId) -> bool {
        self.graph.has_edge(a, b)
    }

    fn degree(&self, node: AgentId) -> usize {
        self.graph.degree(node)
    }
}

impl MutableTopology for FirmGraph {
    fn add_edge(&mut self, a: AgentId, b: AgentId) {
        self.graph.add_edge(a, b);
    }

    fn remove_edge(&mut self, a: AgentId, b: AgentId) -> bool {
        self.graph.remove_edge(a, b)
    }
}
