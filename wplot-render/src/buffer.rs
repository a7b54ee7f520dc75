/// Owned RGBA frame the colorizer writes into.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major pixel bytes, `[r, g, b, a]` per pixel.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// A fresh frame: every pixel starts as opaque black, `[0, 0, 0, 255]`.
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = [0, 0, 0, 255].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Copy a row band's RGBA data into the buffer starting at `pixel_top`.
    pub fn blit_rows(&mut self, pixel_top: u32, band: &RenderBuffer) {
        debug_assert_eq!(band.width, self.width);
        debug_assert!(pixel_top + band.height <= self.height);
        let stride = self.width as usize * 4;
        let dst_start = pixel_top as usize * stride;
        let dst_end = dst_start + band.pixels.len();
        self.pixels[dst_start..dst_end].copy_from_slice(&band.pixels);
    }
}
