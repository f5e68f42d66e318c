//! Segmentation parameters.
//!
//! The defaults reproduce the classic interactive graph-cut setup:
//! 4-connected grid, smoothing sigma of 2.0 and terminal links of 100500,
//! far above any sum of pixel similarity weights (each weight is at most 1).

use serde::{Deserialize, Serialize};

use crate::error::{SegmentError, SegmentResult};

/// Default smoothing constant for the similarity weight.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// Default capacity of seed-to-terminal links.
pub const DEFAULT_TERMINAL_CAPACITY: f64 = 100_500.0;

/// Default tolerance below which a residual capacity counts as saturated.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Pixel neighborhood used when building the grid graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Left, right, down, up
    #[default]
    Four,
    /// Four plus the diagonals
    Eight,
}

/// Neighbor offsets as (dx, dy), axis-aligned first.
const OFFSETS: [(i64, i64); 8] = [
    (-1, 0),  // left
    (1, 0),   // right
    (0, 1),   // down
    (0, -1),  // up
    (1, 1),   // down-right
    (-1, 1),  // down-left
    (1, -1),  // up-right
    (-1, -1), // up-left
];

impl Connectivity {
    /// Offsets visited for every pixel, in a fixed order.
    pub fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Connectivity::Four => &OFFSETS[..4],
            Connectivity::Eight => &OFFSETS[..],
        }
    }
}

/// Parameters for one segmentation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Neighborhood of each pixel node
    pub connectivity: Connectivity,
    /// Smoothing constant in `exp(-|p - q| / (2 * sigma))`
    pub sigma: f64,
    /// Capacity of source/sink links to seed pixels
    pub terminal_capacity: f64,
    /// Residual capacities at or below this value are treated as zero
    pub epsilon: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Four,
            sigma: DEFAULT_SIGMA,
            terminal_capacity: DEFAULT_TERMINAL_CAPACITY,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl SegmentationConfig {
    /// Default parameters with the given neighborhood.
    pub fn with_connectivity(connectivity: Connectivity) -> Self {
        Self {
            connectivity,
            ..Self::default()
        }
    }

    /// Check that all numeric parameters are usable.
    pub fn validate(&self) -> SegmentResult<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(SegmentError::InvalidConfig(format!(
                "sigma must be positive and finite, got {}",
                self.sigma
            )));
        }
        if !self.terminal_capacity.is_finite() || self.terminal_capacity <= 0.0 {
            return Err(SegmentError::InvalidConfig(format!(
                "terminal_capacity must be positive and finite, got {}",
                self.terminal_capacity
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(SegmentError::InvalidConfig(format!(
                "epsilon must be non-negative and finite, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SegmentationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.connectivity, Connectivity::Four);
        assert_eq!(config.terminal_capacity, 100_500.0);
    }

    #[test]
    fn test_offsets() {
        assert_eq!(Connectivity::Four.offsets().len(), 4);
        let eight = Connectivity::Eight.offsets();
        assert_eq!(eight.len(), 8);
        // Every diagonal appears exactly once
        for d in [(1, 1), (-1, 1), (1, -1), (-1, -1)] {
            assert_eq!(eight.iter().filter(|&&o| o == d).count(), 1);
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = SegmentationConfig::default();
        config.sigma = 0.0;
        assert!(matches!(config.validate(), Err(SegmentError::InvalidConfig(_))));

        let mut config = SegmentationConfig::default();
        config.terminal_capacity = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SegmentationConfig::default();
        config.epsilon = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SegmentationConfig =
            serde_json::from_str(r#"{"connectivity": "eight"}"#).unwrap();
        assert_eq!(config.connectivity, Connectivity::Eight);
        assert_eq!(config.sigma, DEFAULT_SIGMA);
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
    }
}
