//! Interactive graph-cut segmentation.
//!
//! Splits an image into foreground and background from user seed pixels by
//! computing a minimum s-t cut on a pixel grid graph:
//! - **Graph building**: similarity-weighted edges between neighboring pixels (`graph.rs`)
//! - **Terminals**: source/sink links to the seed pixels (`terminals.rs`)
//! - **Max flow**: Edmonds-Karp shortest augmenting paths (`max_flow.rs`)
//! - **Min cut**: residual reachability from the source (`min_cut.rs`)
//! - **Partition**: foreground/background pixel sets (`partition.rs`)
//! - **Refinement**: repeated runs restricted by new seeds (`refine.rs`)
//!
//! Data flows strictly forward through these stages; `pipeline.rs` wires
//! them together.

pub mod graph;
pub mod image;
pub mod max_flow;
pub mod min_cut;
pub mod partition;
pub mod pipeline;
pub mod refine;
pub mod terminals;

pub use graph::CapacityGraph;
pub use image::{pixel_coords, pixel_id, Mask, RgbImage};
pub use max_flow::{EdmondsKarp, MaxFlow, ResidualGraph};
pub use min_cut::Cut;
pub use partition::Partition;
pub use pipeline::{segment, Segmentation, SolveStats};
pub use refine::{label_regions, Intention, RefinementSession};
pub use terminals::FlowNetwork;
