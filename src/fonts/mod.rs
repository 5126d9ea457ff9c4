//! This module contains everything that helps us dealing with fonts.

pub mod rasterizer;

use std::fs::File;
use std::path::{Path, PathBuf};

use freetype::{face, Face, Library};

use crate::layout::Metrics;
use crate::units::{Fixed, Pt};
use crate::{Error, Result};

pub use rasterizer::GlyphRasterizer;

/// A font loaded by freetype, used both to measure and to draw glyphs.
pub struct Font {
    /// The freetype face.
    freetype: Face,
}

impl Font {
    /// Creates a font from a path to a file.
    pub fn from_file<P: AsRef<Path>>(path: P, library: &Library) -> Result<Font> {
        File::open(path.as_ref()).map_err(|_| Error::FontNotFound(PathBuf::from(path.as_ref())))?;
        Ok(Font {
            freetype: library.new_face(path.as_ref(), 0)?,
        })
    }

    /// Returns the name of the font, if it has one.
    pub fn name(&self) -> Option<String> {
        match (self.freetype.family_name(), self.freetype.style_name()) {
            (Some(family), Some(style)) => Some(format!("{} {}", family, style)),
            (Some(family), None) => Some(family),
            _ => None,
        }
    }

    /// Sets the size glyphs are measured and drawn at.
    pub fn set_size(&self, size: Pt, dpi: f64) -> Result<()> {
        // A height in 1/64 px at 72 dpi keeps fractional resolutions exact.
        let height = size.to_fixed(dpi).0 as isize;
        self.freetype.set_char_size(0, height, 72, 72)?;
        Ok(())
    }

    /// Returns the index of the glyph of a char, 0 if the font has none.
    pub fn index(&self, c: char) -> u32 {
        self.freetype.get_char_index(c as usize)
    }
}

impl Metrics for Font {
    fn has_glyph(&self, c: char) -> bool {
        self.index(c) != 0
    }

    fn advance(&self, c: char) -> Result<Fixed> {
        self.freetype
            .load_char(c as usize, face::LoadFlag::NO_HINTING)
            .map_err(|e| Error::DrawError(c, e))?;

        Ok(Fixed::clamped(i64::from(self.freetype.glyph().advance().x)))
    }
}
