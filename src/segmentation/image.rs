//! Image and mask ingestion.
//!
//! Pixels are addressed in row-major order: `id = y * width + x`.

use ndarray::{Array2, Array3, ArrayView3};

use crate::error::{SegmentError, SegmentResult};

/// Row-major pixel id of `(x, y)`.
#[inline]
pub fn pixel_id(x: usize, y: usize, width: usize) -> usize {
    y * width + x
}

/// `(x, y)` coordinates of a row-major pixel id.
#[inline]
pub fn pixel_coords(id: usize, width: usize) -> (usize, usize) {
    (id % width, id / width)
}

/// RGB u8 image with shape (height, width, 3).
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage {
    data: Array3<u8>,
}

impl RgbImage {
    /// Wrap an (height, width, channels) array, requiring exactly 3 channels.
    pub fn from_array(data: Array3<u8>) -> SegmentResult<Self> {
        let channels = data.dim().2;
        if channels != 3 {
            return Err(SegmentError::ChannelMismatch { channels });
        }
        Ok(Self { data })
    }

    /// Copy a view, requiring exactly 3 channels.
    pub fn from_view(view: ArrayView3<u8>) -> SegmentResult<Self> {
        Self::from_array(view.to_owned())
    }

    /// Build from a flat interleaved buffer.
    ///
    /// # Arguments
    /// * `data` - Interleaved pixel bytes (length = width * height * channels)
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `channels` - Channels per pixel in `data` (must be 3)
    pub fn from_raw(
        data: &[u8],
        width: usize,
        height: usize,
        channels: usize,
    ) -> SegmentResult<Self> {
        if channels != 3 {
            return Err(SegmentError::ChannelMismatch { channels });
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(SegmentError::BufferLength {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        let array = Array3::from_shape_vec((height, width, channels), data.to_vec()).map_err(|_| {
            SegmentError::BufferLength {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            }
        })?;
        Ok(Self { data: array })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Number of pixels (width * height).
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RGB triple at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }
}

/// Per-pixel participation mask with shape (height, width).
///
/// `true` pixels take part in graph construction and in the output;
/// `false` pixels are excluded.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    data: Array2<bool>,
}

impl Mask {
    pub fn new(data: Array2<bool>) -> Self {
        Self { data }
    }

    /// Mask with every pixel active.
    pub fn all(width: usize, height: usize) -> Self {
        Self {
            data: Array2::from_elem((height, width), true),
        }
    }

    /// Build from bytes (0 = excluded, >0 = active).
    pub fn from_u8(data: &[u8], width: usize, height: usize) -> SegmentResult<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(SegmentError::BufferLength {
                width,
                height,
                channels: 1,
                expected,
                actual: data.len(),
            });
        }
        let values = data.iter().map(|&v| v > 0).collect();
        let array = Array2::from_shape_vec((height, width), values).map_err(|_| {
            SegmentError::BufferLength {
                width,
                height,
                channels: 1,
                expected,
                actual: data.len(),
            }
        })?;
        Ok(Self { data: array })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn is_active(&self, x: usize, y: usize) -> bool {
        self.data[[y, x]]
    }

    /// Whether the pixel with row-major `id` is active.
    #[inline]
    pub fn is_active_id(&self, id: usize) -> bool {
        let (x, y) = pixel_coords(id, self.width());
        self.is_active(x, y)
    }

    /// Number of active pixels.
    pub fn count_active(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Fail unless the mask matches the image dimensions.
    pub fn check_dimensions(&self, width: usize, height: usize) -> SegmentResult<()> {
        if self.width() != width || self.height() != height {
            return Err(SegmentError::MaskDimensions {
                width,
                height,
                mask_width: self.width(),
                mask_height: self.height(),
            });
        }
        Ok(())
    }
}

/// Optional mask lookup: an absent mask means every pixel is active.
#[inline]
pub(crate) fn mask_allows(mask: Option<&Mask>, id: usize) -> bool {
    mask.map_or(true, |m| m.is_active_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_rgba() {
        let data = vec![0u8; 2 * 2 * 4];
        assert_eq!(
            RgbImage::from_raw(&data, 2, 2, 4),
            Err(SegmentError::ChannelMismatch { channels: 4 })
        );
        let array = Array3::<u8>::zeros((2, 2, 4));
        assert!(RgbImage::from_array(array).is_err());
    }

    #[test]
    fn test_rejects_short_buffer() {
        let data = vec![0u8; 11];
        assert!(matches!(
            RgbImage::from_raw(&data, 2, 2, 3),
            Err(SegmentError::BufferLength { expected: 12, actual: 11, .. })
        ));
    }

    #[test]
    fn test_pixel_layout() {
        // 2x1 image: red then blue
        let data = [255u8, 0, 0, 0, 0, 255];
        let image = RgbImage::from_raw(&data, 2, 1, 3).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 1);
        assert_eq!(image.pixel(0, 0), [255, 0, 0]);
        assert_eq!(image.pixel(1, 0), [0, 0, 255]);
    }

    #[test]
    fn test_pixel_id_roundtrip() {
        assert_eq!(pixel_id(3, 2, 5), 13);
        assert_eq!(pixel_coords(13, 5), (3, 2));
    }

    #[test]
    fn test_mask_from_u8() {
        let mask = Mask::from_u8(&[0, 1, 255, 0], 2, 2).unwrap();
        assert!(!mask.is_active(0, 0));
        assert!(mask.is_active(1, 0));
        assert!(mask.is_active_id(2));
        assert_eq!(mask.count_active(), 2);
        assert!(mask.check_dimensions(2, 2).is_ok());
        assert!(mask.check_dimensions(3, 2).is_err());
    }
}
