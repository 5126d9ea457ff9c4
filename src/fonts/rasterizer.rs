//! Draws glyphs of a font into a canvas with freetype.

use freetype::bitmap::PixelMode;
use freetype::face::LoadFlag;

use crate::canvas::Canvas;
use crate::config::Hinting;
use crate::fonts::Font;
use crate::layout::{Position, Rasterizer};
use crate::units::Fixed;
use crate::{Error, Result};

/// Renders glyphs with freetype and composites them into a canvas.
pub struct GlyphRasterizer<'a> {
    /// The font glyphs are taken from.
    font: &'a Font,

    /// Where glyphs are drawn.
    canvas: &'a mut Canvas,

    /// The flags glyphs are loaded with.
    flags: LoadFlag,
}

impl<'a> GlyphRasterizer<'a> {
    /// Creates a rasterizer drawing the font into the canvas.
    pub fn new(font: &'a Font, canvas: &'a mut Canvas, hinting: Hinting) -> GlyphRasterizer<'a> {
        let flags = match hinting {
            Hinting::None => LoadFlag::NO_HINTING,
            Hinting::Full => LoadFlag::DEFAULT,
        };

        GlyphRasterizer {
            font,
            canvas,
            flags,
        }
    }
}

/// Returns where a row of a bitmap starts in its buffer, `row` counting from the top.
///
/// A negative pitch means the rows are stored bottom to top.
fn row_offset(row: i32, rows: i32, pitch: i32) -> usize {
    if pitch < 0 {
        ((rows - 1 - row) * -pitch) as usize
    } else {
        (row * pitch) as usize
    }
}

/// Returns the coverage of a pixel of a bitmap row.
fn coverage(line: &[u8], col: i32, gray: bool) -> u8 {
    if gray {
        line[col as usize]
    } else if line[(col / 8) as usize] & (0x80 >> (col % 8)) != 0 {
        255
    } else {
        0
    }
}

impl<'a> Rasterizer for GlyphRasterizer<'a> {
    fn draw(&mut self, c: char, pen: Position) -> Result<Position> {
        let font = self.font;
        let face = &font.freetype;
        face.load_char(c as usize, self.flags | LoadFlag::RENDER)
            .map_err(|e| Error::DrawError(c, e))?;

        let glyph = face.glyph();
        let bitmap = glyph.bitmap();
        let (width, rows, pitch) = (bitmap.width(), bitmap.rows(), bitmap.pitch());

        if width > 0 && rows > 0 {
            let mode = bitmap.pixel_mode().map_err(|e| Error::DrawError(c, e))?;

            match mode {
                PixelMode::Gray | PixelMode::Mono => {
                    let left = pen.x.floor() + glyph.bitmap_left();
                    let top = pen.y.floor() - glyph.bitmap_top();
                    let gray = matches!(mode, PixelMode::Gray);
                    let buffer = bitmap.buffer();

                    for row in 0..rows {
                        let line = &buffer[row_offset(row, rows, pitch)..];

                        for col in 0..width {
                            self.canvas.blend(left + col, top + row, coverage(line, col, gray));
                        }
                    }
                }

                _ => warn!("unsupported pixel mode for {:?}, not drawn", c),
            }
        }

        let advance = glyph.advance();
        Ok(Position::new(
            pen.x + Fixed::clamped(i64::from(advance.x)),
            pen.y + Fixed::clamped(i64::from(advance.y)),
        ))
    }
}
