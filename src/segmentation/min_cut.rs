//! Minimum cut extraction from a solved residual graph.

use super::graph::Capacity;
use super::max_flow::ResidualGraph;
use super::terminals::FlowNetwork;

/// Nodes reachable from the source over residual edges above `epsilon`.
///
/// Iterative depth-first search; returns a per-node membership vector.
pub fn source_side(
    network: &FlowNetwork,
    residual: &ResidualGraph,
    epsilon: Capacity,
) -> Vec<bool> {
    let mut reached = vec![false; network.node_count()];
    let mut stack = vec![network.source()];
    reached[network.source()] = true;

    while let Some(u) = stack.pop() {
        for (&v, &capacity) in residual.neighbors(u) {
            if !reached[v] && capacity > epsilon {
                reached[v] = true;
                stack.push(v);
            }
        }
    }

    reached
}

/// Edges severed by the minimum cut, with the source side they separate.
#[derive(Clone, Debug, PartialEq)]
pub struct Cut {
    edges: Vec<(usize, usize)>,
    capacity: Capacity,
    source_side: Vec<bool>,
}

impl Cut {
    /// Derive the cut from the final residual graph.
    ///
    /// The cut holds every edge `(i, j)` of the capacity network with
    /// `i` on the source side, `j` off it and positive capacity. Its total
    /// capacity equals the max-flow value.
    pub fn extract(network: &FlowNetwork, residual: &ResidualGraph, epsilon: Capacity) -> Self {
        let source_side = source_side(network, residual, epsilon);

        let mut edges = Vec::new();
        let mut capacity = 0.0;
        for (i, &inside) in source_side.iter().enumerate() {
            if !inside {
                continue;
            }
            for (&j, &c) in network.neighbors(i) {
                if !source_side[j] && c > 0.0 {
                    edges.push((i, j));
                    capacity += c;
                }
            }
        }

        Self {
            edges,
            capacity,
            source_side,
        }
    }

    /// Cut edges as `(from, to)` pairs, ordered by `from` then `to`.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Sum of the capacities of the cut edges.
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Whether `node` lies on the source side.
    pub fn is_source_side(&self, node: usize) -> bool {
        self.source_side[node]
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::graph::CapacityGraph;
    use crate::segmentation::max_flow::MaxFlow;

    #[test]
    fn test_cut_matches_flow() {
        // 0 -> 1 -> 2 -> 3, weakest link 1 -> 2
        let mut graph = CapacityGraph::new(4, 1);
        graph.add_edge(0, 1, 3.0);
        graph.add_edge(1, 2, 0.25);
        graph.add_edge(2, 3, 3.0);
        let network = FlowNetwork::augment(&graph, &[0], &[3], 100.0).unwrap();

        let flow = MaxFlow::solve(&network, 1e-9);
        let cut = Cut::extract(&network, flow.residual(), 1e-9);

        assert_eq!(cut.edges(), &[(1, 2)]);
        assert!((cut.capacity() - flow.value()).abs() < 1e-12);
        assert!(cut.is_source_side(network.source()));
        assert!(cut.is_source_side(0));
        assert!(cut.is_source_side(1));
        assert!(!cut.is_source_side(2));
        assert!(!cut.is_source_side(network.sink()));
    }

    #[test]
    fn test_no_sink_seeds_empty_cut() {
        let mut graph = CapacityGraph::new(3, 1);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 0, 1.0);
        let network = FlowNetwork::augment(&graph, &[0], &[], 100.0).unwrap();

        let flow = MaxFlow::solve(&network, 1e-9);
        let cut = Cut::extract(&network, flow.residual(), 1e-9);

        assert!(cut.is_empty());
        assert_eq!(cut.capacity(), 0.0);
        assert!(cut.is_source_side(1));
        assert!(!cut.is_source_side(2));
    }
}
