//! Camera frames and the overlays drawn onto them.
//!
//! Overlays are drawn with the `draw_*` functions. Each returns a guard that can be customized
//! (color, stroke width) and renders when it goes out of scope. Drawing is clipped to the image,
//! so shapes may extend past its edges.

mod draw;
mod rect;


use std::{fmt, path::Path};

use anyhow::{bail, Context};
use embedded_graphics::{pixelcolor::raw::RawU32, prelude::PixelColor};
use image::{imageops, ImageBuffer, ImageFormat, Rgba, RgbaImage};

use crate::resolution::Resolution;

pub use draw::*;
pub use rect::*;

/// An RGBA camera frame that overlays are drawn onto.
#[derive(Clone)]
pub struct Image {
    buf: RgbaImage,
}

impl Image {
    /// Creates a `width x height` image with every pixel set to [`Color::NULL`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    pub fn from_resolution(res: Resolution) -> Self {
        Self::new(res.width(), res.height())
    }

    /// Writes the image to `path` as a PNG file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
            bail!("cannot save image to '{}': only .png is supported", path.display());
        }
        self.buf
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("failed to write '{}'", path.display()))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Returns the [`Rect`] spanning the whole image.
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(0, 0, self.width(), self.height())
    }

    /// Returns the color of pixel `(x, y)`. Panics if it lies outside of the image.
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf.get_pixel(x, y).0)
    }

    /// Overwrites pixel `(x, y)`. Panics if it lies outside of the image.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.buf.put_pixel(x, y, Rgba(color.0));
    }

    /// Mirrors the image left to right, turning a camera frame into a selfie view.
    pub fn flip_horizontal_in_place(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.buf);
    }

    pub fn clear(&mut self, color: Color) {
        self.buf.pixels_mut().for_each(|px| *px = Rgba(color.0));
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image @ {}", self.resolution())
    }
}

/// An sRGB color with 8 bits per channel and straight alpha.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Color(pub(crate) [u8; 4]);

impl Color {
    /// All channels zero, the initial content of a new [`Image`].
    pub const NULL: Self = Self([0, 0, 0, 0]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    pub const BLUE: Self = Self([0, 0, 255, 255]);
    pub const MAGENTA: Self = Self([255, 0, 255, 255]);
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl PixelColor for Color {
    type Raw = RawU32;
}
