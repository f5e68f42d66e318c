//! Maximum flow via shortest augmenting paths (Edmonds-Karp).
//!
//! The solver works on a residual copy of a [`FlowNetwork`]. Each round runs
//! a breadth-first search from the source over edges whose residual capacity
//! exceeds `epsilon`, then pushes the bottleneck amount along the path found,
//! creating reverse residual entries on demand. Rounds repeat until the sink
//! is unreachable.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{info, trace};

use super::graph::{Adjacency, Capacity};
use super::terminals::FlowNetwork;

/// Residual capacities, one ordered map per node.
///
/// Invariant: for every pair `(u, v)` with an entry in either direction,
/// `residual(u, v) + residual(v, u) == capacity(u, v) + capacity(v, u)`.
#[derive(Clone, Debug)]
pub struct ResidualGraph {
    edges: Vec<Adjacency>,
}

impl ResidualGraph {
    /// Full copy of the network's capacities.
    pub fn from_network(network: &FlowNetwork) -> Self {
        Self {
            edges: network.adjacency().to_vec(),
        }
    }

    /// Residual capacity of `u -> v`, zero when no entry exists.
    pub fn residual(&self, u: usize, v: usize) -> Capacity {
        self.edges[u].get(&v).copied().unwrap_or(0.0)
    }

    /// Residual entries leaving `u`, including reverse entries created
    /// during solving.
    pub fn neighbors(&self, u: usize) -> &Adjacency {
        &self.edges[u]
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Move `amount` of flow across `u -> v`.
    fn push(&mut self, u: usize, v: usize, amount: Capacity) {
        if let Some(forward) = self.edges[u].get_mut(&v) {
            *forward -= amount;
        }
        *self.edges[v].entry(u).or_insert(0.0) += amount;
    }
}

/// Edmonds-Karp solver state.
///
/// Use [`EdmondsKarp::augment`] to advance one round at a time or
/// [`EdmondsKarp::run`] to solve to completion.
pub struct EdmondsKarp<'a> {
    network: &'a FlowNetwork,
    residual: ResidualGraph,
    parent: Vec<Option<usize>>,
    visited: Vec<bool>,
    queue: VecDeque<usize>,
    epsilon: Capacity,
    flow: Capacity,
    rounds: usize,
}

impl<'a> EdmondsKarp<'a> {
    pub fn new(network: &'a FlowNetwork, epsilon: Capacity) -> Self {
        let n = network.node_count();
        Self {
            network,
            residual: ResidualGraph::from_network(network),
            parent: vec![None; n],
            visited: vec![false; n],
            queue: VecDeque::new(),
            epsilon,
            flow: 0.0,
            rounds: 0,
        }
    }

    /// Breadth-first search for the sink; fills `parent` along the way.
    fn bfs(&mut self) -> bool {
        let source = self.network.source();
        let sink = self.network.sink();

        self.visited.fill(false);
        self.parent.fill(None);
        self.queue.clear();

        self.visited[source] = true;
        self.queue.push_back(source);

        while let Some(u) = self.queue.pop_front() {
            for (&v, &capacity) in self.residual.edges[u].iter() {
                if self.visited[v] || capacity <= self.epsilon {
                    continue;
                }
                self.visited[v] = true;
                self.parent[v] = Some(u);
                if v == sink {
                    return true;
                }
                self.queue.push_back(v);
            }
        }

        false
    }

    /// Run one augmenting round.
    ///
    /// Returns the amount pushed, or `None` once the flow is maximal.
    pub fn augment(&mut self) -> Option<Capacity> {
        if !self.bfs() {
            return None;
        }

        let source = self.network.source();
        let sink = self.network.sink();

        let mut path_flow = Capacity::MAX;
        let mut v = sink;
        while v != source {
            let u = self.parent[v]?;
            path_flow = path_flow.min(self.residual.residual(u, v));
            v = u;
        }

        let mut v = sink;
        while v != source {
            let u = self.parent[v]?;
            self.residual.push(u, v, path_flow);
            v = u;
        }

        self.flow += path_flow;
        self.rounds += 1;
        trace!(round = self.rounds, path_flow, "augmented");
        Some(path_flow)
    }

    /// Flow pushed so far.
    pub fn flow(&self) -> Capacity {
        self.flow
    }

    /// Augmenting rounds completed so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn residual(&self) -> &ResidualGraph {
        &self.residual
    }

    /// Augment until no path remains.
    pub fn run(mut self) -> MaxFlow {
        let start = Instant::now();
        while self.augment().is_some() {}
        let elapsed = start.elapsed();

        info!(
            rounds = self.rounds,
            flow = self.flow,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "max flow solved"
        );

        MaxFlow {
            residual: self.residual,
            value: self.flow,
            rounds: self.rounds,
            elapsed,
        }
    }
}

/// Result of a completed max-flow computation.
#[derive(Clone, Debug)]
pub struct MaxFlow {
    residual: ResidualGraph,
    value: Capacity,
    rounds: usize,
    elapsed: Duration,
}

impl MaxFlow {
    /// Solve `network` to completion.
    pub fn solve(network: &FlowNetwork, epsilon: Capacity) -> Self {
        EdmondsKarp::new(network, epsilon).run()
    }

    /// Final residual graph.
    pub fn residual(&self) -> &ResidualGraph {
        &self.residual
    }

    /// Total flow pushed from source to sink.
    pub fn value(&self) -> Capacity {
        self.value
    }

    /// Number of augmenting rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Flow leaving the source, measured from the residual graph.
    pub fn source_outflow(&self, network: &FlowNetwork) -> Capacity {
        let source = network.source();
        network
            .neighbors(source)
            .iter()
            .map(|(&v, &c)| c - self.residual.residual(source, v))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SegmentationConfig;
    use crate::segmentation::graph::CapacityGraph;
    use crate::segmentation::image::RgbImage;

    /// Hand-built network on a graph of `n` pixels laid out as a 1-row image.
    fn network_from_edges(
        n: usize,
        edges: &[(usize, usize, f64)],
        sources: &[usize],
        sinks: &[usize],
    ) -> FlowNetwork {
        let mut graph = CapacityGraph::new(n, 1);
        for &(i, j, c) in edges {
            graph.add_edge(i, j, c);
        }
        FlowNetwork::augment(&graph, sources, sinks, 100.0).unwrap()
    }

    #[test]
    fn test_single_path_bottleneck() {
        // 0 -> 1 -> 2 with bottleneck 0.5
        let network = network_from_edges(3, &[(0, 1, 2.0), (1, 2, 0.5)], &[0], &[2]);
        let result = MaxFlow::solve(&network, 1e-9);
        assert!((result.value() - 0.5).abs() < 1e-12);
        assert_eq!(result.rounds(), 1);
        assert!((result.source_outflow(&network) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_classic_diamond() {
        // Two parallel routes plus a cross link
        let edges = [
            (0, 1, 3.0),
            (0, 2, 2.0),
            (1, 2, 1.0),
            (1, 3, 2.0),
            (2, 3, 3.0),
        ];
        let network = network_from_edges(4, &edges, &[0], &[3]);
        let result = MaxFlow::solve(&network, 1e-9);
        assert!((result.value() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_entries_created() {
        let network = network_from_edges(2, &[(0, 1, 1.0)], &[0], &[1]);
        let result = MaxFlow::solve(&network, 1e-9);
        assert_eq!(result.residual().residual(0, 1), 0.0);
        assert_eq!(result.residual().residual(1, 0), 1.0);
    }

    #[test]
    fn test_no_seeds_no_flow() {
        let network = network_from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)], &[], &[]);
        let result = MaxFlow::solve(&network, 1e-9);
        assert_eq!(result.value(), 0.0);
        assert_eq!(result.rounds(), 0);
    }

    #[test]
    fn test_residual_invariant_each_round() {
        let data: Vec<u8> = (0..16u8).flat_map(|i| [i * 15, 255 - i * 15, i * 7]).collect();
        let image = RgbImage::from_raw(&data, 4, 4, 3).unwrap();
        let config = SegmentationConfig::default();
        let graph = CapacityGraph::from_image(&image, None, &config).unwrap();
        let network = FlowNetwork::augment(&graph, &[0, 4], &[15, 11], 100_500.0).unwrap();

        let mut solver = EdmondsKarp::new(&network, 1e-9);
        while solver.augment().is_some() {
            let residual = solver.residual();
            for u in 0..network.node_count() {
                for &v in residual.neighbors(u).keys() {
                    let lhs = residual.residual(u, v) + residual.residual(v, u);
                    let rhs = network.capacity(u, v) + network.capacity(v, u);
                    assert!((lhs - rhs).abs() < 1e-6, "pair ({u}, {v}): {lhs} vs {rhs}");
                }
            }
        }
        assert!(solver.rounds() > 0);
    }
}
