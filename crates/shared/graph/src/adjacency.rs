use efm_core::AgentId;
use efm_ports::{MutableTopology, Topology};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Undirected simple graph stored as sorted neighbour sets
///
/// Nodes are the dense range `0..node_count`. Sorted sets keep every
/// traversal in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    neighbors: Vec<BTreeSet<AgentId>>,
}

impl Adjacency {
    /// Create a graph of `n` isolated nodes
    pub fn new(n: usize) -> Self {
        Self {
            neighbors: vec![BTreeSet::new(); n],
        }
    }

    /// Build a graph from an edge list
    pub fn from_edges(n: usize, edges: &[(AgentId, AgentId)]) -> Self {
        let mut graph = Self::new(n);
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Every edge once, as `(low, high)` pairs in ascending order
    pub fn edges(&self) -> Vec<(AgentId, AgentId)> {
        self.neighbors
            .iter()
            .enumerate()
            .flat_map(|(a, set)| set.range(a + 1..).map(move |&b| (a, b)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// All connected components, each sorted, ordered by their smallest node
    pub fn components(&self) -> Vec<Vec<AgentId>> {
        let mut visited = vec![false; self.neighbors.len()];
        let mut components = Vec::new();
        for start in 0..self.neighbors.len() {
            if !visited[start] {
                components.push(self.explore(start, &mut visited));
            }
        }
        components
    }

    /// Breadth-first search from `start`, marking nodes in `visited`
    fn explore(&self, start: AgentId, visited: &mut [bool]) -> Vec<AgentId> {
        let mut queue = VecDeque::from([start]);
        let mut members = Vec::new();
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            members.push(node);
            for &next in &self.neighbors[node] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        members.sort_unstable();
        members
    }
}

impl Topology for Adjacency {
    fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    fn neighbors(&self, node: AgentId) -> Vec<AgentId> {
        self.neighbors[node].iter().copied().collect()
    }

    fn component_of(&self, node: AgentId) -> Vec<AgentId> {
        if self.neighbors[node].is_empty() {
            return vec![node];
        }
        let mut visited = vec![false; self.neighbors.len()];
        self.explore(node, &mut visited)
    }

    fn has_edge(&self, a: AgentId, b: AgentId) -> bool {
        self.neighbors[a].contains(&b)
    }

    fn degree(&self, node: AgentId) -> usize {
        self.neighbors[node].len()
    }
}

impl MutableTopology for Adjacency {
    fn add_edge(&mut self, a: AgentId, b: AgentId) {
        if a == b {
            return;
        }
        self.neighbors[a].insert(b);
        self.neighbors[b].insert(a);
    }

    fn remove_edge(&mut self, a: AgentId, b: AgentId) -> bool {
        let removed = self.neighbors[a].remove(&b);
        self.neighbors[b].remove(&a);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_nodes_are_own_components() {
        let graph = Adjacency::new(4);
        assert_eq!(graph.components(), vec![vec![0], vec![1], vec![2], vec![3]]);
        assert_eq!(graph.component_of(2), vec![2]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_components_sorted() {
        let graph = Adjacency::from_edges(6, &[(4, 1), (1, 3), (5, 2)]);
        assert_eq!(graph.components(), vec![vec![0], vec![1, 3, 4], vec![2, 5]]);
        assert_eq!(graph.component_of(3), vec![1, 3, 4]);
    }

    #[test]
    fn test_add_remove_edge() {
        let mut graph = Adjacency::new(3);
        graph.add_edge(0, 2);
        graph.add_edge(2, 0);
        graph.add_edge(1, 1);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(2, 0));
        assert_eq!(graph.degree(1), 0);

        assert!(graph.remove_edge(2, 0));
        assert!(!graph.remove_edge(0, 2));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_edges_listed_once() {
        let graph = Adjacency::from_edges(4, &[(3, 0), (1, 2), (0, 1)]);
        assert_eq!(graph.edges(), vec![(0, 1), (0, 3), (1, 2)]);
    }
}
