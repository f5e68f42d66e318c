//! WebAssembly exports for graph-cut segmentation.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! Browser canvases hand out RGBA bytes, so the exports here accept RGBA
//! and drop the alpha channel before segmentation.

use wasm_bindgen::prelude::*;

use crate::config::{Connectivity, SegmentationConfig};
use crate::error::SegmentError;
use crate::segmentation::{segment, Mask, RgbImage};

fn rgba_to_rgb(data: &[u8], width: usize, height: usize) -> Result<RgbImage, SegmentError> {
    let expected = width * height * 4;
    if data.len() != expected {
        return Err(SegmentError::BufferLength {
            width,
            height,
            channels: 4,
            expected,
            actual: data.len(),
        });
    }
    let rgb: Vec<u8> = data
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    RgbImage::from_raw(&rgb, width, height, 3)
}

// ============================================================================
// Graph Cut Segmentation
// ============================================================================

/// Segment an RGBA u8 image into foreground and background.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `source` - Foreground seed pixel ids (y * width + x)
/// * `sink` - Background seed pixel ids
/// * `mask` - Flat mask (length = width * height, non-zero = active), or empty for none
/// * `eight_connected` - Use 8-connected instead of 4-connected neighbors
///
/// # Returns
/// Flat mask of width * height bytes, 255 = foreground
#[wasm_bindgen]
pub fn graph_cut_segment_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    source: &[u32],
    sink: &[u32],
    mask: &[u8],
    eight_connected: bool,
) -> Result<Vec<u8>, JsError> {
    let image = rgba_to_rgb(data, width, height)?;
    let mask = if mask.is_empty() {
        None
    } else {
        Some(Mask::from_u8(mask, width, height)?)
    };

    let source: Vec<usize> = source.iter().map(|&id| id as usize).collect();
    let sink: Vec<usize> = sink.iter().map(|&id| id as usize).collect();
    let config = SegmentationConfig::with_connectivity(if eight_connected {
        Connectivity::Eight
    } else {
        Connectivity::Four
    });

    let result = segment(&image, mask.as_ref(), &source, &sink, &config)?;
    Ok(result.to_mask())
}
