//! Foreground/background partitioning from a minimum cut.
//!
//! Every endpoint of a cut edge is marked as boundary. A guarded traversal
//! from the source then collects the foreground. A step that touches a
//! boundary node is only taken when both of its ends lie on the source side
//! of the cut, so reverse residual entries created while solving cannot
//! leak the region across the cut, while seeds sitting right at the cut
//! still reach the pixels behind them.

use super::graph::Capacity;
use super::image::mask_allows;
use super::max_flow::ResidualGraph;
use super::min_cut::Cut;
use super::terminals::FlowNetwork;

/// Foreground and background pixel ids of one segmentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    /// Mask-active pixels on the source side, ascending
    pub foreground: Vec<usize>,
    /// Mask-active pixels on the sink side, ascending
    pub background: Vec<usize>,
}

impl Partition {
    /// Split the pixels of `network` along `cut`.
    ///
    /// Terminal ids and mask-excluded pixels never appear in the output;
    /// every other pixel appears in exactly one of the two lists.
    pub fn from_cut(
        network: &FlowNetwork,
        residual: &ResidualGraph,
        cut: &Cut,
        epsilon: Capacity,
    ) -> Self {
        let n = network.node_count();
        let mut boundary = vec![false; n];
        for &(i, j) in cut.edges() {
            boundary[i] = true;
            boundary[j] = true;
        }

        let source = network.source();
        let mut reached = vec![false; n];
        let mut stack = vec![source];
        reached[source] = true;

        while let Some(u) = stack.pop() {
            for (&v, &capacity) in residual.neighbors(u) {
                if reached[v] || capacity <= epsilon {
                    continue;
                }
                let crosses = (boundary[u] || boundary[v])
                    && !(cut.is_source_side(u) && cut.is_source_side(v));
                if crosses {
                    continue;
                }
                reached[v] = true;
                stack.push(v);
            }
        }

        let mask = network.mask();
        let mut partition = Self::default();
        for id in 0..network.pixel_count() {
            if !mask_allows(mask, id) {
                continue;
            }
            if reached[id] {
                partition.foreground.push(id);
            } else {
                partition.background.push(id);
            }
        }

        partition
    }

    /// Byte mask of `width * height` pixels: 255 for foreground, 0 otherwise.
    pub fn to_mask(&self, width: usize, height: usize) -> Vec<u8> {
        let mut mask = vec![0u8; width * height];
        for &id in &self.foreground {
            mask[id] = 255;
        }
        mask
    }

    /// Whether `id` was classified as foreground.
    pub fn is_foreground(&self, id: usize) -> bool {
        self.foreground.binary_search(&id).is_ok()
    }

    /// Total classified pixels.
    pub fn len(&self) -> usize {
        self.foreground.len() + self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
