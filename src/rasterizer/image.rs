//! 8-bit images with 1 to 4 channels
//!
//! Rows are stored bottom-up: row 0 is the bottom of the picture, which
//! matches both texture coordinates (v grows upward) and the viewport
//! transform (y grows upward). Files are flipped on load and save.

use std::path::Path;

use crate::error::{Error, Result};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn gray(self) -> u8 {
        ((self.r as u32 + self.g as u32 + self.b as u32) / 3) as u8
    }
}

/// Image with `channels` interleaved bytes per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub buffer: Vec<u8>,
}

impl Image {
    /// Create a zero-filled image
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be positive");
        assert!((1..=4).contains(&channels), "image must have 1 to 4 channels");
        Self {
            width,
            height,
            channels,
            buffer: vec![0; width * height * channels],
        }
    }

    /// Load an image file (format detected from the contents)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let image = Self::from_dynamic(img);
        log::debug!(
            "Loaded image {} ({}x{}, {} channels)",
            path.display(),
            image.width,
            image.height,
            image.channels
        );
        Ok(image)
    }

    /// Decode an image from raw file bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|source| Error::Image {
            path: "<memory>".into(),
            source,
        })?;
        Ok(Self::from_dynamic(img))
    }

    fn from_dynamic(img: image::DynamicImage) -> Self {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let (channels, buffer) = match img {
            image::DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            image::DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            image::DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };
        let mut image = Self {
            width,
            height,
            channels,
            buffer,
        };
        image.flip_v();
        image
    }

    /// Save the image; the format is chosen from the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let color_type = match self.channels {
            1 => image::ExtendedColorType::L8,
            2 => image::ExtendedColorType::La8,
            3 => image::ExtendedColorType::Rgb8,
            4 => image::ExtendedColorType::Rgba8,
            n => return Err(Error::UnsupportedChannels(n)),
        };

        let mut top_down = self.clone();
        top_down.flip_v();
        image::save_buffer(
            path,
            &top_down.buffer,
            self.width as u32,
            self.height as u32,
            color_type,
        )
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })
    }

    fn index(&self, row: usize, col: usize) -> usize {
        (row * self.width + col) * self.channels
    }

    /// Pixel bytes at (row, col)
    pub fn pixel(&self, row: usize, col: usize) -> &[u8] {
        let idx = self.index(row, col);
        &self.buffer[idx..idx + self.channels]
    }

    pub fn pixel_mut(&mut self, row: usize, col: usize) -> &mut [u8] {
        let idx = self.index(row, col);
        let channels = self.channels;
        &mut self.buffer[idx..idx + channels]
    }

    /// Read a pixel, expanding gray/gray-alpha/RGB to RGBA
    pub fn get_color(&self, row: usize, col: usize) -> Color {
        assert!(row < self.height && col < self.width, "pixel out of bounds");
        let p = self.pixel(row, col);
        match p.len() {
            1 => Color::new(p[0], p[0], p[0]),
            2 => Color::with_alpha(p[0], p[0], p[0], p[1]),
            3 => Color::new(p[0], p[1], p[2]),
            _ => Color::with_alpha(p[0], p[1], p[2], p[3]),
        }
    }

    /// Write a pixel, reducing RGBA to the image's channel layout
    pub fn set_color(&mut self, row: usize, col: usize, color: Color) {
        assert!(row < self.height && col < self.width, "pixel out of bounds");
        let p = self.pixel_mut(row, col);
        match p.len() {
            1 => p[0] = color.gray(),
            2 => {
                p[0] = color.gray();
                p[1] = color.a;
            }
            3 => p.copy_from_slice(&[color.r, color.g, color.b]),
            _ => p.copy_from_slice(&[color.r, color.g, color.b, color.a]),
        }
    }

    /// Mirror left-right
    pub fn flip_h(&mut self) {
        let (width, channels) = (self.width, self.channels);
        for row in self.buffer.chunks_exact_mut(width * channels) {
            for c in 0..width / 2 {
                let (left, right) = row.split_at_mut((width - 1 - c) * channels);
                left[c * channels..(c + 1) * channels].swap_with_slice(&mut right[..channels]);
            }
        }
    }

    /// Mirror top-bottom
    pub fn flip_v(&mut self) {
        let row_len = self.width * self.channels;
        for r in 0..self.height / 2 {
            let (top, bottom) = self.buffer.split_at_mut((self.height - 1 - r) * row_len);
            top[r * row_len..(r + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
        }
    }

    /// Expand to top-down RGBA bytes, ready for upload to a window texture
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 4);
        for row in (0..self.height).rev() {
            for col in 0..self.width {
                let c = self.get_color(row, col);
                out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        out
    }

    /// Set a pixel given in (x, y) = (col, row), ignoring out-of-bounds points
    pub fn draw_point(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.set_color(y as usize, x as usize, color);
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.draw_point(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw the outline of a triangle
    pub fn draw_triangle(&mut self, points: [(i32, i32); 3], color: Color) {
        for i in 0..3 {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % 3];
            self.draw_line(x0, y0, x1, y1, color);
        }
    }
}
