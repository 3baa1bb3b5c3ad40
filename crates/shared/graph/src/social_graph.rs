use efm_core::{AgentId, Result, SimError};
use efm_ports::{MutableTopology, Topology};
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::adjacency::Adjacency;
use crate::degree_sequence::{havel_hakimi, is_graphical};

/// Retries after which a slow degree-sequence search is reported
const RETRY_WARN_THRESHOLD: usize = 100;

/// Degree-preserving edge swaps attempted per edge when randomizing
const SWAPS_PER_EDGE: usize = 10;

/// Static social network
///
/// Fixes each agent's visibility set: an agent only considers the firms of
/// its social neighbours. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialGraph {
    graph: Adjacency,
    /// Component index per node
    component_index: Vec<usize>,
    component_count: usize,
}

impl SocialGraph {
    /// Build a random social network whose degrees all lie in `[min_degree, max_degree]`
    ///
    /// Degrees are sampled uniformly per node until the sequence is graphical,
    /// giving up with `SimError::DegreeSequenceExhausted` after `max_attempts`.
    /// The sequence is realized exactly and then shuffled with
    /// degree-preserving edge swaps.
    pub fn build<R: Rng + ?Sized>(
        nodes: usize,
        min_degree: usize,
        max_degree: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if nodes == 0 {
            return Err(SimError::Configuration(
                "social network needs at least one agent".to_string(),
            ));
        }
        if min_degree > max_degree {
            return Err(SimError::Configuration(format!(
                "min degree {} exceeds max degree {}",
                min_degree, max_degree
            )));
        }
        if min_degree > nodes - 1 {
            return Err(SimError::Configuration(format!(
                "min degree {} infeasible for {} agents",
                min_degree, nodes
            )));
        }

        // No simple graph has a degree above n - 1
        let upper = max_degree.min(nodes - 1);

        for attempt in 1..=max_attempts {
            let degrees: Vec<usize> = (0..nodes)
                .map(|_| rng.gen_range(min_degree..=upper))
                .collect();

            if attempt == RETRY_WARN_THRESHOLD {
                warn!(
                    "Still searching for a graphical degree sequence after {} attempts",
                    attempt
                );
            }

            if !is_graphical(&degrees) {
                continue;
            }

            if let Some(edges) = havel_hakimi(&degrees) {
                debug!(
                    "Found graphical degree sequence for {} agents after {} attempt(s)",
                    nodes, attempt
                );
                let mut graph = Adjacency::from_edges(nodes, &edges);
                randomize(&mut graph, edges, rng);
                return Ok(Self::from_adjacency(graph));
            }
        }

        Err(SimError::DegreeSequenceExhausted {
            nodes,
            min_degree,
            max_degree,
            attempts: max_attempts,
        })
    }

    /// Build a social network from an explicit edge list
    pub fn from_edges(nodes: usize, edges: &[(AgentId, AgentId)]) -> Self {
        Self::from_adjacency(Adjacency::from_edges(nodes, edges))
    }

    fn from_adjacency(graph: Adjacency) -> Self {
        let components = graph.components();
        let mut component_index = vec![0; graph.node_count()];
        for (index, members) in components.iter().enumerate() {
            for &member in members {
                component_index[member] = index;
            }
        }

        Self {
            graph,
            component_index,
            component_count: components.len(),
        }
    }

    /// Index of the connected component containing `node`
    pub fn component_index(&self, node: AgentId) -> usize {
        self.component_index[node]
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn edges(&self) -> Vec<(AgentId, AgentId)> {
        self.graph.edges()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Topology for SocialGraph {
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

/// Shuffle a realized graph with double-edge swaps
///
/// `(a,b),(c,d)` becomes `(a,d),(c,b)` when that keeps the graph simple,
/// which leaves every degree unchanged.
fn randomize<R: Rng + ?Sized>(
    graph: &mut Adjacency,
    mut edges: Vec<(AgentId, AgentId)>,
    rng: &mut R,
) {
    let m = edges.len();
    if m < 2 {
        return;
    }

    for _ in 0..m * SWAPS_PER_EDGE {
        let i = rng.gen_range(0..m);
        let j = rng.gen_range(0..m);
        if i == j {
            continue;
        }

        let (a, b) = edges[i];
        let (c, d) = if rng.gen_bool(0.5) {
            edges[j]
        } else {
            (edges[j].1, edges[j].0)
        };

        if a == c || a == d || b == c || b == d {
            continue;
        }
        if graph.has_edge(a, d) || graph.has_edge(c, b) {
            continue;
        }

        graph.remove_edge(a, b);
        graph.remove_edge(c, d);
        graph.add_edge(a, d);
        graph.add_edge(c, b);
        edges[i] = (a.min(d), a.max(d));
        edges[j] = (c.min(b), c.max(b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_degrees_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let graph = SocialGraph::build(200, 2, 6, 1000, &mut rng).unwrap();

        assert_eq!(graph.node_count(), 200);
        for node in 0..200 {
            let degree = graph.degree(node);
            assert!((2..=6).contains(&degree), "node {} has degree {}", node, degree);
        }
    }

    #[test]
    fn test_small_population_caps_degree() {
        // Max degree above n - 1 is clamped rather than retried forever
        let mut rng = StdRng::seed_from_u64(7);
        let graph = SocialGraph::build(4, 2, 6, 1000, &mut rng).unwrap();
        for node in 0..4 {
            assert!((2..=3).contains(&graph.degree(node)));
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = SocialGraph::build(50, 2, 6, 1000, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = SocialGraph::build(50, 2, 6, 1000, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_infeasible_min_degree() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = SocialGraph::build(3, 3, 6, 1000, &mut rng).unwrap_err();
        assert!(err.is_configuration());

        let err = SocialGraph::build(0, 0, 0, 1000, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));

        let err = SocialGraph::build(10, 5, 2, 1000, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
    }

    #[test]
    fn test_retry_budget_exhausted() {
        // Zero attempts allowed
        let mut rng = StdRng::seed_from_u64(1);
        let err = SocialGraph::build(2, 1, 1, 0, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimError::DegreeSequenceExhausted { attempts: 0, .. }
        ));
    }

    #[test]
    fn test_component_index() {
        let graph = SocialGraph::from_edges(5, &[(0, 1), (3, 4)]);
        assert_eq!(graph.component_count(), 3);
        assert_eq!(graph.component_index(1), 0);
        assert_eq!(graph.component_index(2), 1);
        assert_eq!(graph.component_index(4), 2);
    }
}
