//! Degree sequence utilities
//!
//! Erdős–Gallai test and Havel–Hakimi construction for simple graphs.

use efm_core::AgentId;

/// Whether a simple undirected graph with exactly these degrees exists
pub fn is_graphical(degrees: &[usize]) -> bool {
    let n = degrees.len();
    let total: usize = degrees.iter().sum();
    if total % 2 != 0 {
        return false;
    }

    let mut sorted = degrees.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    // Erdős–Gallai: for every k, the k largest degrees can be absorbed
    let mut prefix = 0;
    for k in 1..=n {
        prefix += sorted[k - 1];
        let tail: usize = sorted[k..].iter().map(|&d| d.min(k)).sum();
        if prefix > k * (k - 1) + tail {
            return false;
        }
    }
    true
}

/// Realize a graphical degree sequence as an edge list
///
/// Repeatedly connects the node with the most unmet degree to the next
/// highest ones. Returns `None` if the sequence is not graphical.
pub fn havel_hakimi(degrees: &[usize]) -> Option<Vec<(AgentId, AgentId)>> {
    let mut remaining: Vec<(usize, AgentId)> = degrees
        .iter()
        .enumerate()
        .map(|(node, &d)| (d, node))
        .collect();
    let mut edges = Vec::with_capacity(degrees.iter().sum::<usize>() / 2);

    if remaining.is_empty() {
        return Some(edges);
    }

    loop {
        // Highest remaining degree first, ties by node id
        remaining.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        let (degree, node) = remaining[0];
        if degree == 0 {
            return Some(edges);
        }
        if degree >= remaining.len() {
            return None;
        }

        remaining[0].0 = 0;
        for entry in remaining.iter_mut().skip(1).take(degree) {
            if entry.0 == 0 {
                return None;
            }
            entry.0 -= 1;
            edges.push((node.min(entry.1), node.max(entry.1)));
        }
    }
}
