//! Render target: color image, depth plane and viewport transform

use super::image::Image;
use super::math::Mat4;

/// Channels in the color buffer (RGB, no alpha)
pub const COLOR_CHANNELS: usize = 3;

/// Render target for `draw_triangle`.
///
/// The color image and depth plane always share the same dimensions.
/// Depth grows with distance; a cleared plane holds `f32::MAX`.
pub struct Context {
    color: Image,
    depth: Vec<f32>,
    viewport: Mat4,
}

impl Context {
    /// Allocate and clear a `width` x `height` render target.
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "context dimensions must be positive");
        let mut context = Self {
            color: Image::new(width, height, COLOR_CHANNELS),
            depth: vec![0.0; width * height],
            viewport: Mat4::viewport(0, 0, width, height),
        };
        context.clear();
        log::debug!("Created {}x{} render context", width, height);
        context
    }

    /// Reset color to black and depth to the far sentinel
    pub fn clear(&mut self) {
        self.color.buffer.fill(0);
        self.depth.fill(f32::MAX);
    }

    /// Free the buffers. Equivalent to dropping the context.
    pub fn release(self) {}

    pub fn width(&self) -> usize {
        self.color.width
    }

    pub fn height(&self) -> usize {
        self.color.height
    }

    pub fn viewport(&self) -> &Mat4 {
        &self.viewport
    }

    pub fn color_buffer(&self) -> &Image {
        &self.color
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * self.width() + x]
    }

    /// RGB bytes of the pixel at (x, y)
    pub fn color_at(&self, x: usize, y: usize) -> [u8; 3] {
        let p = self.color.pixel(y, x);
        [p[0], p[1], p[2]]
    }

    /// Early depth test: would a fragment at `depth` land at `index`?
    pub(crate) fn passes_depth(&self, index: usize, depth: f32) -> bool {
        self.depth[index] > depth
    }

    /// Store a shaded fragment. Color channels are clamped to [0, 1] and
    /// truncated to bytes; alpha is ignored.
    pub(crate) fn write_fragment(&mut self, x: usize, y: usize, depth: f32, color: [f32; 4]) {
        let pixel = self.color.pixel_mut(y, x);
        for (dst, src) in pixel.iter_mut().zip(color.iter()) {
            *dst = (src.clamp(0.0, 1.0) * 255.0) as u8;
        }
        let width = self.color.width;
        self.depth[y * width + x] = depth;
    }
}
