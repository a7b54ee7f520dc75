use num_complex::Complex64;

use crate::error::CoreError;

/// The rectangular region of the complex plane a pixel grid is mapped onto.
///
/// Defined by two corner points. The mapping from pixel coordinates to the
/// plane is affine with no rotation or shear: pixel `(0, 0)` lands exactly on
/// `top_left`, and pixel `(width-1, height-1)` approaches `bottom_right` in
/// the limit (the far corner itself corresponds to the one-past-the-end
/// pixel).
///
/// Corner ordering is deliberately not validated; inverted corners silently
/// produce a mirrored mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Complex point at pixel `(0, 0)`.
    pub top_left: Complex64,

    /// Complex point one pixel past `(width-1, height-1)`.
    pub bottom_right: Complex64,

    /// Grid width in pixels.
    pub width: u32,

    /// Grid height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport, validating only the pixel dimensions.
    pub fn new(
        top_left: Complex64,
        bottom_right: Complex64,
        width: u32,
        height: u32,
    ) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("dimensions must be > 0, got {width}×{height}"),
            });
        }
        if bottom_right.re <= top_left.re || bottom_right.im <= top_left.im {
            tracing::warn!(
                ?top_left,
                ?bottom_right,
                "viewport corners not in increasing order; mapping will be mirrored or degenerate"
            );
        }
        Ok(Self {
            top_left,
            bottom_right,
            width,
            height,
        })
    }

    /// Default view: a square window around the origin where most elementary
    /// functions show their structure.
    pub fn default_square(width: u32, height: u32) -> Self {
        Self {
            top_left: Complex64::new(-2.0, -2.0),
            bottom_right: Complex64::new(2.0, 2.0),
            width,
            height,
        }
    }

    /// Span of the viewport along the real axis.
    pub fn plane_width(&self) -> f64 {
        self.bottom_right.re - self.top_left.re
    }

    /// Span of the viewport along the imaginary axis.
    pub fn plane_height(&self) -> f64 {
        self.bottom_right.im - self.top_left.im
    }

    /// Map an integer pixel coordinate to its point on the complex plane.
    #[inline]
    pub fn point_at(&self, px: u32, py: u32) -> Complex64 {
        Complex64::new(
            px as f64 * self.plane_width() / self.width as f64 + self.top_left.re,
            py as f64 * self.plane_height() / self.height as f64 + self.top_left.im,
        )
    }

    /// Total number of pixels in the grid.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
