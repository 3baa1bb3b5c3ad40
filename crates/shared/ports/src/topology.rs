use efm_core::AgentId;

/// Port for read access to an undirected graph over agents
///
/// Both the static social network and the firm-membership graph expose this
/// view. All node lists are returned in ascending id order so that callers
/// iterating them stay deterministic.
pub trait Topology {
    /// Number of nodes (agents) in the graph
    fn node_count(&self) -> usize;

    /// Direct neighbours of `node`
    fn neighbors(&self, node: AgentId) -> Vec<AgentId>;

    /// Every node in the connected component containing `node`, `node` included
    fn component_of(&self, node: AgentId) -> Vec<AgentId>;

    /// Whether an edge joins `a` and `b`
    fn has_edge(&self, a: AgentId, b: AgentId) -> bool;

    /// Number of edges incident to `node`
    fn degree(&self, node: AgentId) -> usize {
        self.neighbors(node).len()
    }
}

/// Port for graphs that change while the simulation runs
pub trait MutableTopology: Topology {
    /// Join `a` and `b`; a no-op if the edge exists or `a == b`
    fn add_edge(&mut self, a: AgentId, b: AgentId);

    /// Remove the edge between `a` and `b`, returning whether it existed
    fn remove_edge(&mut self, a: AgentId, b: AgentId) -> bool;
}
