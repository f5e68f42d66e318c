//! Iterative refinement of a segmentation.
//!
//! After a first cut, the user adds more seeds and runs again. Later runs
//! are restricted to the part of the image the new seeds talk about:
//! - all new seeds on current foreground: re-cut the foreground only
//! - all new seeds on current background: re-cut the background only
//! - otherwise: re-cut the connected regions that contain a new seed
//!
//! The classification model holds 1 for foreground and 0 for background.

use std::collections::{BTreeSet, VecDeque};

use ndarray::Array2;
use tracing::debug;

use crate::config::SegmentationConfig;
use crate::error::{SegmentError, SegmentResult};
use super::image::{pixel_coords, Mask, RgbImage};
use super::pipeline::{segment, Segmentation};

/// Model value for foreground pixels.
pub const FOREGROUND: u8 = 1;

/// Model value for background pixels.
pub const BACKGROUND: u8 = 0;

/// Label connected regions of equal model value (4-connected).
///
/// Labels start at 1 and are assigned in row-major order of each region's
/// first pixel.
pub fn label_regions(model: &Array2<u8>) -> Array2<u32> {
    let (height, width) = model.dim();
    let mut labels = Array2::<u32>::zeros((height, width));
    let mut next = 1u32;
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if labels[[y, x]] != 0 {
                continue;
            }
            let value = model[[y, x]];
            labels[[y, x]] = next;
            queue.push_back((x, y));

            while let Some((cx, cy)) = queue.pop_front() {
                for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    if nx < 0 || nx >= width as i64 || ny < 0 || ny >= height as i64 {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if labels[[ny, nx]] == 0 && model[[ny, nx]] == value {
                        labels[[ny, nx]] = next;
                        queue.push_back((nx, ny));
                    }
                }
            }

            next += 1;
        }
    }

    labels
}

/// What a batch of new seeds asks to refine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intention {
    /// Every new seed lies on current foreground
    RefineForeground,
    /// Every new seed lies on current background
    RefineBackground,
    /// Seeds on both; only the regions they touch are re-cut
    Mixed,
}

/// Work out which pixels a refinement run may touch.
///
/// With no new seeds at all, the foreground branch applies.
///
/// # Arguments
/// * `model` - Current classification (1 = foreground, 0 = background)
/// * `labels` - Region labels of `model`
/// * `new_source` - Foreground seeds added since the last run
/// * `new_sink` - Background seeds added since the last run
pub fn intention(
    model: &Array2<u8>,
    labels: &Array2<u32>,
    new_source: &[usize],
    new_sink: &[usize],
) -> SegmentResult<(Intention, Mask)> {
    let (height, width) = model.dim();
    let pixels = width * height;
    let seeds: Vec<usize> = new_source.iter().chain(new_sink).copied().collect();
    for &id in &seeds {
        if id >= pixels {
            return Err(SegmentError::SeedOutOfRange { id, pixels });
        }
    }

    let value_at = |id: usize| {
        let (x, y) = pixel_coords(id, width);
        model[[y, x]]
    };
    let all_foreground = seeds.iter().all(|&id| value_at(id) == FOREGROUND);
    let all_background = seeds.iter().all(|&id| value_at(id) == BACKGROUND);

    let (intent, active) = if all_foreground {
        (Intention::RefineForeground, model.mapv(|v| v == FOREGROUND))
    } else if all_background {
        (Intention::RefineBackground, model.mapv(|v| v == BACKGROUND))
    } else {
        let regions: BTreeSet<u32> = seeds
            .iter()
            .map(|&id| {
                let (x, y) = pixel_coords(id, width);
                labels[[y, x]]
            })
            .collect();
        (Intention::Mixed, labels.mapv(|l| regions.contains(&l)))
    };

    debug!(intention = ?intent, seeds = seeds.len(), "refinement intention");
    Ok((intent, Mask::new(active)))
}

/// Interactive segmentation state carried across runs.
pub struct RefinementSession {
    image: RgbImage,
    config: SegmentationConfig,
    source: Vec<usize>,
    sink: Vec<usize>,
    model: Array2<u8>,
    labels: Array2<u32>,
    initial: bool,
}

impl RefinementSession {
    pub fn new(image: RgbImage, config: SegmentationConfig) -> SegmentResult<Self> {
        config.validate()?;
        let (width, height) = (image.width(), image.height());
        Ok(Self {
            image,
            config,
            source: Vec::new(),
            sink: Vec::new(),
            model: Array2::from_elem((height, width), FOREGROUND),
            labels: Array2::zeros((height, width)),
            initial: true,
        })
    }

    /// Add seeds and re-segment.
    ///
    /// The first run covers the whole image. Later runs are restricted by
    /// [`intention`] of the newly added seeds, while all seeds collected so
    /// far are passed to the solver. Mask-active pixels of the model are
    /// overwritten with the result.
    pub fn run(&mut self, new_source: &[usize], new_sink: &[usize]) -> SegmentResult<Segmentation> {
        let pixels = self.image.len();
        for &id in new_source.iter().chain(new_sink) {
            if id >= pixels {
                return Err(SegmentError::SeedOutOfRange { id, pixels });
            }
        }

        let mask = if self.initial {
            None
        } else {
            Some(intention(&self.model, &self.labels, new_source, new_sink)?.1)
        };

        self.source.extend_from_slice(new_source);
        self.sink.extend_from_slice(new_sink);

        let result = segment(&self.image, mask.as_ref(), &self.source, &self.sink, &self.config)?;

        let width = self.image.width();
        for &id in result.foreground() {
            let (x, y) = pixel_coords(id, width);
            self.model[[y, x]] = FOREGROUND;
        }
        for &id in result.background() {
            let (x, y) = pixel_coords(id, width);
            self.model[[y, x]] = BACKGROUND;
        }
        self.labels = label_regions(&self.model);
        self.initial = false;

        Ok(result)
    }

    /// Forget all seeds and the current classification.
    pub fn clear(&mut self) {
        self.source.clear();
        self.sink.clear();
        self.model.fill(FOREGROUND);
        self.labels.fill(0);
        self.initial = true;
    }

    /// Current classification (1 = foreground, 0 = background).
    pub fn model(&self) -> &Array2<u8> {
        &self.model
    }

    pub fn labels(&self) -> &Array2<u32> {
        &self.labels
    }

    pub fn source_seeds(&self) -> &[usize] {
        &self.source
    }

    pub fn sink_seeds(&self) -> &[usize] {
        &self.sink
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}
