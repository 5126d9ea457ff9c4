//! The pixel buffer glyphs are drawn into.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};

use crate::Result;

/// Opaque black.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Opaque white.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Returns the foreground and background colors, black on white unless inverted.
pub fn resolve_colors(invert: bool) -> (Rgba<u8>, Rgba<u8>) {
    if invert {
        (WHITE, BLACK)
    } else {
        (BLACK, WHITE)
    }
}

/// An RGBA image with the colors text is drawn with.
///
/// Its size is fixed at creation, anything drawn outside of it is dropped.
pub struct Canvas {
    /// The pixels.
    pub(crate) image: RgbaImage,

    /// The color of the text.
    foreground: Rgba<u8>,
}

impl Canvas {
    /// Creates a canvas filled with the background color.
    pub fn new(width: u32, height: u32, (foreground, background): (Rgba<u8>, Rgba<u8>)) -> Canvas {
        let mut canvas = Canvas {
            image: RgbaImage::new(width, height),
            foreground,
        };
        canvas.fill(background);
        canvas
    }

    /// Paints every pixel with the color.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Returns the width of the canvas, in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Returns the height of the canvas, in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Composites the foreground color over a pixel, `coverage` being its opacity.
    pub fn blend(&mut self, x: i32, y: i32, coverage: u8) {
        if coverage == 0 || !self.contains(x, y) {
            return;
        }

        let alpha = u32::from(coverage);
        let foreground = self.foreground;
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);

        for (dst, src) in pixel.0.iter_mut().zip(foreground.0.iter()) {
            *dst = ((u32::from(*src) * alpha + u32::from(*dst) * (255 - alpha) + 127) / 255) as u8;
        }
    }

    /// Encodes the canvas as a PNG file.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ColorType::Rgba8,
        )?;
        Ok(bytes)
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height()
    }
}
