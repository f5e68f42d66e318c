//! GraphCut Rust Extensions
//!
//! Interactive binary image segmentation by minimum s-t cut, implemented in
//! Rust with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Segmentation works on RGB u8 images of shape (height, width, 3).
//! Pixels are addressed by row-major id: `id = y * width + x`.
//!
//! ## Inputs and Outputs
//! - **Seeds**: foreground ("source") and background ("sink") pixel ids
//! - **Mask**: optional (height, width) grid; excluded pixels take no part
//! - **Result**: foreground and background pixel id lists, or a byte mask
//!   with 255 for foreground
//!
//! The solver is single-threaded and synchronous. Hosts that need a
//! responsive UI should run it off the interaction thread.

pub mod config;
pub mod error;
pub mod segmentation;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{Connectivity, SegmentationConfig};
pub use error::{SegmentError, SegmentResult};
pub use segmentation::{segment, Mask, RgbImage, Segmentation};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::config::{Connectivity, SegmentationConfig};
    use crate::error::SegmentError;
    use crate::segmentation::{segment, Mask, RgbImage};

    fn to_py_err(err: SegmentError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    // ========================================================================
    // Graph Cut Segmentation
    // ========================================================================

    /// Segment an RGB u8 image into foreground and background.
    ///
    /// # Arguments
    /// * `image` - RGB image (height, width, 3)
    /// * `source` - Foreground seed pixel ids (y * width + x)
    /// * `sink` - Background seed pixel ids
    /// * `mask` - Optional (height, width) mask, non-zero = active
    /// * `eight_connected` - Use 8-connected instead of 4-connected neighbors
    /// * `sigma` - Color smoothing constant (default: 2.0)
    ///
    /// # Returns
    /// (height, width) u8 mask, 255 = foreground
    #[pyfunction]
    #[pyo3(signature = (image, source, sink, mask=None, eight_connected=false, sigma=2.0))]
    pub fn graph_cut_segment<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        source: Vec<usize>,
        sink: Vec<usize>,
        mask: Option<PyReadonlyArray2<'py, u8>>,
        eight_connected: bool,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let image = RgbImage::from_view(image.as_array()).map_err(to_py_err)?;
        let mask = mask.map(|m| Mask::new(m.as_array().mapv(|v| v > 0)));

        let config = SegmentationConfig {
            connectivity: if eight_connected { Connectivity::Eight } else { Connectivity::Four },
            sigma,
            ..SegmentationConfig::default()
        };

        let result = py
            .allow_threads(|| segment(&image, mask.as_ref(), &source, &sink, &config))
            .map_err(to_py_err)?;
        Ok(result.to_array().into_pyarray(py))
    }

    /// Python module definition
    #[pymodule]
    pub fn graphcut_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(graph_cut_segment, m)?)?;
        Ok(())
    }
}
