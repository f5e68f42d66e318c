//! Terminal augmentation.
//!
//! Extends a pixel graph with a source terminal (id `n`) and a sink terminal
//! (id `n + 1`), where `n` is the pixel count, and links seed pixels to them
//! with a capacity far above any pixel similarity weight. The pixel graph is
//! copied, never modified, so augmentation can be repeated on the same base.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{SegmentError, SegmentResult};
use super::graph::{Adjacency, Capacity, CapacityGraph};
use super::image::{mask_allows, Mask};

/// Pixel graph plus source and sink terminals, ready for solving.
#[derive(Clone, Debug)]
pub struct FlowNetwork {
    width: usize,
    height: usize,
    edges: Vec<Adjacency>,
    source: usize,
    sink: usize,
    mask: Option<Mask>,
}

impl FlowNetwork {
    /// Copy `graph` and attach terminal links for the given seeds.
    ///
    /// Seeds excluded by the graph's mask are dropped. A pixel that appears
    /// in both lists is kept as a foreground seed only.
    ///
    /// # Arguments
    /// * `graph` - Pixel capacity graph
    /// * `source_seeds` - Foreground pixel ids, linked from the source
    /// * `sink_seeds` - Background pixel ids, linked to the sink
    /// * `terminal_capacity` - Capacity of every terminal link
    pub fn augment(
        graph: &CapacityGraph,
        source_seeds: &[usize],
        sink_seeds: &[usize],
        terminal_capacity: Capacity,
    ) -> SegmentResult<Self> {
        let pixels = graph.node_count();
        for &id in source_seeds.iter().chain(sink_seeds) {
            if id >= pixels {
                return Err(SegmentError::SeedOutOfRange { id, pixels });
            }
        }

        let mask = graph.mask();
        let source = pixels;
        let sink = pixels + 1;

        let mut edges = graph.adjacency().to_vec();
        edges.push(Adjacency::new());
        edges.push(Adjacency::new());

        let foreground: BTreeSet<usize> = source_seeds
            .iter()
            .copied()
            .filter(|&s| mask_allows(mask, s))
            .collect();
        for &s in &foreground {
            edges[source].insert(s, terminal_capacity);
        }

        let mut collisions = 0usize;
        let mut background = 0usize;
        for &t in sink_seeds {
            if !mask_allows(mask, t) {
                continue;
            }
            if foreground.contains(&t) {
                collisions += 1;
                continue;
            }
            if edges[t].insert(sink, terminal_capacity).is_none() {
                background += 1;
            }
        }

        let dropped = source_seeds.len() + sink_seeds.len() - foreground.len() - background;
        debug!(
            foreground = foreground.len(),
            background,
            collisions,
            dropped,
            "attached terminal links"
        );

        Ok(Self {
            width: graph.width(),
            height: graph.height(),
            edges,
            source,
            sink,
            mask: mask.cloned(),
        })
    }

    /// Source terminal id.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Sink terminal id.
    pub fn sink(&self) -> usize {
        self.sink
    }

    /// Total node count, terminals included.
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of pixel nodes.
    pub fn pixel_count(&self) -> usize {
        self.source
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Whether `id` is the source or sink terminal.
    #[inline]
    pub fn is_terminal(&self, id: usize) -> bool {
        id == self.source || id == self.sink
    }

    /// Capacity of `i -> j`, zero when the edge does not exist.
    pub fn capacity(&self, i: usize, j: usize) -> Capacity {
        self.edges[i].get(&j).copied().unwrap_or(0.0)
    }

    /// Outgoing edges of node `i`.
    pub fn neighbors(&self, i: usize) -> &Adjacency {
        &self.edges[i]
    }

    /// Sum of capacities leaving the source terminal.
    pub fn source_capacity(&self) -> Capacity {
        self.edges[self.source].values().sum()
    }

    pub(crate) fn adjacency(&self) -> &[Adjacency] {
        &self.edges
    }
}
