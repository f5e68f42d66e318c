//! End-to-end segmentation: build, augment, solve, cut, partition.

use std::time::Duration;

use ndarray::Array2;

use crate::config::SegmentationConfig;
use crate::error::SegmentResult;
use super::graph::{Capacity, CapacityGraph};
use super::image::{Mask, RgbImage};
use super::max_flow::MaxFlow;
use super::min_cut::Cut;
use super::partition::Partition;
use super::terminals::FlowNetwork;

/// Solver statistics for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveStats {
    /// Number of augmenting paths found
    pub augmenting_rounds: usize,
    /// Wall time spent in the max-flow loop
    pub elapsed: Duration,
}

/// Outcome of a segmentation run.
#[derive(Clone, Debug)]
pub struct Segmentation {
    width: usize,
    height: usize,
    partition: Partition,
    cut: Cut,
    max_flow: Capacity,
    stats: SolveStats,
}

impl Segmentation {
    /// Foreground pixel ids, ascending.
    pub fn foreground(&self) -> &[usize] {
        &self.partition.foreground
    }

    /// Background pixel ids, ascending.
    pub fn background(&self) -> &[usize] {
        &self.partition.background
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn into_partition(self) -> Partition {
        self.partition
    }

    pub fn cut(&self) -> &Cut {
        &self.cut
    }

    /// Maximum flow value, equal to the cut capacity.
    pub fn max_flow(&self) -> Capacity {
        self.max_flow
    }

    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat byte mask (255 = foreground, 0 = background or excluded).
    pub fn to_mask(&self) -> Vec<u8> {
        self.partition.to_mask(self.width, self.height)
    }

    /// Byte mask shaped (height, width).
    pub fn to_array(&self) -> Array2<u8> {
        let mut array = Array2::<u8>::zeros((self.height, self.width));
        for &id in &self.partition.foreground {
            array[[id / self.width, id % self.width]] = 255;
        }
        array
    }
}

impl CapacityGraph {
    /// Cut this graph between the given seeds.
    ///
    /// Terminals are attached to a copy, so the graph can be cut again with
    /// other seeds.
    ///
    /// # Arguments
    /// * `source_seeds` - Foreground pixel ids
    /// * `sink_seeds` - Background pixel ids
    /// * `config` - Terminal capacity and epsilon
    pub fn min_cut(
        &self,
        source_seeds: &[usize],
        sink_seeds: &[usize],
        config: &SegmentationConfig,
    ) -> SegmentResult<Segmentation> {
        config.validate()?;
        let network =
            FlowNetwork::augment(self, source_seeds, sink_seeds, config.terminal_capacity)?;
        let flow = MaxFlow::solve(&network, config.epsilon);
        let cut = Cut::extract(&network, flow.residual(), config.epsilon);
        let partition = Partition::from_cut(&network, flow.residual(), &cut, config.epsilon);

        Ok(Segmentation {
            width: self.width(),
            height: self.height(),
            partition,
            cut,
            max_flow: flow.value(),
            stats: SolveStats {
                augmenting_rounds: flow.rounds(),
                elapsed: flow.elapsed(),
            },
        })
    }
}

/// Segment an image into foreground and background.
///
/// # Arguments
/// * `image` - RGB image
/// * `mask` - Optional participation mask; excluded pixels get no
///   outgoing edges, are ignored as seeds and are left out of the output
/// * `source_seeds` - Foreground pixel ids (`y * width + x`)
/// * `sink_seeds` - Background pixel ids
/// * `config` - Segmentation parameters
pub fn segment(
    image: &RgbImage,
    mask: Option<&Mask>,
    source_seeds: &[usize],
    sink_seeds: &[usize],
    config: &SegmentationConfig,
) -> SegmentResult<Segmentation> {
    let graph = CapacityGraph::from_image(image, mask, config)?;
    graph.min_cut(source_seeds, sink_seeds, config)
}
