//! Grid graph construction.
//!
//! Every pixel becomes a node; every mask-active pixel gets a directed edge
//! to each in-bounds neighbor with a weight that is high for similar colors
//! and decays with color distance and geometric distance:
//!
//! ```text
//! weight = exp(-|p - q| / (2 * sigma)) / |(dx, dy)|
//! ```
//!
//! Adjacency is sparse (at most 8 entries per pixel) and stored as one
//! ordered map per node, which keeps traversal order deterministic.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::SegmentationConfig;
use crate::error::SegmentResult;
use super::image::{pixel_id, Mask, RgbImage};

/// Edge capacity type.
pub type Capacity = f64;

/// Outgoing edges of a node: neighbor id -> capacity.
pub type Adjacency = BTreeMap<usize, Capacity>;

/// Euclidean distance between two RGB triples.
#[inline]
pub fn color_distance(p: [u8; 3], q: [u8; 3]) -> f64 {
    let dr = p[0] as f64 - q[0] as f64;
    let dg = p[1] as f64 - q[1] as f64;
    let db = p[2] as f64 - q[2] as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Capacity of the edge from `p` to its neighbor `q` at offset `(dx, dy)`.
#[inline]
pub fn similarity_weight(p: [u8; 3], q: [u8; 3], dx: i64, dy: i64, sigma: f64) -> Capacity {
    let length = ((dx * dx + dy * dy) as f64).sqrt();
    (-color_distance(p, q) / (2.0 * sigma)).exp() / length
}

/// Directed capacity graph over the pixels of one image.
///
/// Holds only pixel nodes. Terminal nodes are added per solve on a separate
/// [`FlowNetwork`](super::terminals::FlowNetwork), so the same graph can be
/// cut any number of times.
#[derive(Clone, Debug)]
pub struct CapacityGraph {
    width: usize,
    height: usize,
    edges: Vec<Adjacency>,
    edge_count: usize,
    mask: Option<Mask>,
}

impl CapacityGraph {
    /// Graph with `width * height` pixel nodes and no edges.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            edges: vec![Adjacency::new(); width * height],
            edge_count: 0,
            mask: None,
        }
    }

    /// Build the similarity graph of an image.
    ///
    /// Only the source pixel of each candidate edge is checked against the
    /// mask: an active pixel still links into an excluded neighbor, while an
    /// excluded pixel has no outgoing edges.
    ///
    /// # Arguments
    /// * `image` - RGB image
    /// * `mask` - Optional participation mask with the image's dimensions
    /// * `config` - Connectivity and sigma
    pub fn from_image(
        image: &RgbImage,
        mask: Option<&Mask>,
        config: &SegmentationConfig,
    ) -> SegmentResult<Self> {
        config.validate()?;
        let (width, height) = (image.width(), image.height());
        if let Some(m) = mask {
            m.check_dimensions(width, height)?;
        }

        let mut graph = Self::new(width, height);
        let offsets = config.connectivity.offsets();

        for y in 0..height {
            for x in 0..width {
                if let Some(m) = mask {
                    if !m.is_active(x, y) {
                        continue;
                    }
                }

                let index = pixel_id(x, y, width);
                let p = image.pixel(x, y);

                for &(dx, dy) in offsets {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || nx >= width as i64 || ny < 0 || ny >= height as i64 {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    let q = image.pixel(nx, ny);
                    let weight = similarity_weight(p, q, dx, dy, config.sigma);
                    graph.add_edge(index, pixel_id(nx, ny, width), weight);
                }
            }
        }

        graph.mask = mask.cloned();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built grid graph"
        );
        Ok(graph)
    }

    /// Set (or replace) the capacity of edge `i -> j`.
    pub fn add_edge(&mut self, i: usize, j: usize, capacity: Capacity) {
        if self.edges[i].insert(j, capacity).is_none() {
            self.edge_count += 1;
        }
    }

    /// Capacity of `i -> j`, zero when the edge does not exist.
    pub fn capacity(&self, i: usize, j: usize) -> Capacity {
        self.edges
            .get(i)
            .and_then(|adj| adj.get(&j))
            .copied()
            .unwrap_or(0.0)
    }

    /// Outgoing edges of node `i`.
    pub fn neighbors(&self, i: usize) -> &Adjacency {
        &self.edges[i]
    }

    pub(crate) fn adjacency(&self) -> &[Adjacency] {
        &self.edges
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixel nodes.
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Attach a mask used for seed filtering and output filtering.
    pub fn set_mask(&mut self, mask: Option<Mask>) {
        self.mask = mask;
    }
}
