//! Error types for graph-cut segmentation.

use thiserror::Error;

/// Result type alias for segmentation operations
pub type SegmentResult<T> = std::result::Result<T, SegmentError>;

/// Errors raised while ingesting inputs or configuring a segmentation run.
///
/// All of these are precondition failures detected before a graph is built;
/// the solver itself has no failure modes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// Image does not have the expected 3 color channels
    #[error("Expected a 3-channel RGB image, got {channels} channel(s)")]
    ChannelMismatch {
        /// Channel count found in the input
        channels: usize,
    },

    /// Raw buffer length disagrees with the declared dimensions
    #[error("Buffer length {actual} does not match {width}x{height}x{channels} = {expected}")]
    BufferLength {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Declared channel count
        channels: usize,
        /// Required length
        expected: usize,
        /// Length actually provided
        actual: usize,
    },

    /// Mask shape differs from the image shape
    #[error("Mask is {mask_width}x{mask_height}, image is {width}x{height}")]
    MaskDimensions {
        /// Image width
        width: usize,
        /// Image height
        height: usize,
        /// Mask width
        mask_width: usize,
        /// Mask height
        mask_height: usize,
    },

    /// A seed id does not address a pixel of the image
    #[error("Seed pixel id {id} is outside an image of {pixels} pixels")]
    SeedOutOfRange {
        /// Offending seed id
        id: usize,
        /// Number of pixels in the image
        pixels: usize,
    },

    /// Segmentation parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
