use wplot_core::Complex64;

use crate::error::RenderError;

/// Per-pixel complex results for a frame (or a row band of one).
///
/// This is the raw output of the evaluator before colorization. `min`/`max`
/// are the extrema of the projection the frame was evaluated with — they
/// travel with the values because the colorizer's rescaling needs the pair
/// that matches the values.
#[derive(Debug, Clone)]
pub struct ValueBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major, index-aligned with the pixel grid: `(i % width, i / width)`.
    pub values: Vec<Complex64>,
    /// Minimum of the projection over all values.
    pub min: f64,
    /// Maximum of the projection over all values.
    pub max: f64,
}

impl ValueBuffer {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reassemble a full frame from row bands.
    ///
    /// `bands` pairs each band with the absolute pixel row it starts at.
    /// Bands may arrive in any order; `min`/`max` are folded across all of
    /// them. Rows left uncovered make the assembly fail.
    pub fn assemble(
        width: u32,
        height: u32,
        bands: &[(u32, ValueBuffer)],
    ) -> crate::Result<ValueBuffer> {
        let size = width as usize * height as usize;
        let mut values = vec![Complex64::new(0.0, 0.0); size];
        let mut covered: u32 = 0;
        let mut extrema: Option<(f64, f64)> = None;

        for (pixel_top, band) in bands {
            debug_assert_eq!(band.width, width);
            let dst_start = *pixel_top as usize * width as usize;
            let dst_end = dst_start + band.pixel_count();
            values[dst_start..dst_end].copy_from_slice(&band.values);
            covered += band.height;

            extrema = Some(match extrema {
                None => (band.min, band.max),
                Some((lo, hi)) => (lo.min(band.min), hi.max(band.max)),
            });
        }

        if covered != height {
            return Err(RenderError::IncompleteAssembly {
                got: covered,
                expected: height,
            });
        }
        let (min, max) = extrema.unwrap_or((0.0, 0.0));
        Ok(ValueBuffer {
            width,
            height,
            values,
            min,
            max,
        })
    }
}
