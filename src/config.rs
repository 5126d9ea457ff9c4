//! This module defines the options that drive the rendering. They are read
//! from an optional TOML file and from the command line, and take default
//! values that are also provided by this module.
//!
//! A `Config` is the raw, user facing set of options. It is turned once into an
//! immutable `LayoutConfig` before anything is laid out.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{fmt, fs, result};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::layout::{effective_size, Position};
use crate::units::{Fixed, Pt};
use crate::{Error, Result};

/// Serializes a `Pt` structure.
// This is required to use in macro `serialize_with`.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize_pt<S: Serializer>(pt: &Pt, serializer: S) -> result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(pt.0)
}

/// Deserializes a `Pt` structure.
pub fn deserialize_pt<'a, D: Deserializer<'a>>(deserializer: D) -> result::Result<Pt, D::Error> {
    deserializer.deserialize_f64(PtVisitor)
}

macro_rules! visit_from {
    ($visit: ident, $ty: ty) => {
        fn $visit<E>(self, value: $ty) -> result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Pt(f64::from(value)))
        }
    };
}

macro_rules! visit_as {
    ($visit: ident, $ty: ty) => {
        fn $visit<E>(self, value: $ty) -> result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Pt(value as f64))
        }
    };
}

/// Visitor for the `Pt` structure.
pub struct PtVisitor;

impl<'a> Visitor<'a> for PtVisitor {
    type Value = Pt;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a floating point number")
    }

    visit_from!(visit_u8, u8);
    visit_from!(visit_u16, u16);
    visit_from!(visit_u32, u32);
    visit_as!(visit_u64, u64);
    visit_from!(visit_i8, i8);
    visit_from!(visit_i16, i16);
    visit_from!(visit_i32, i32);
    visit_as!(visit_i64, i64);
    visit_from!(visit_f32, f32);
    visit_from!(visit_f64, f64);
}

/// How the font engine adjusts glyph outlines to the pixel grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hinting {
    /// Outlines are rendered as designed.
    None,

    /// Outlines and advances are snapped to the pixel grid.
    Full,
}

impl Default for Hinting {
    fn default() -> Hinting {
        Hinting::None
    }
}

impl FromStr for Hinting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Hinting> {
        match s {
            "none" => Ok(Hinting::None),
            "full" => Ok(Hinting::Full),
            other => Err(Error::InvalidConfig(format!(
                "unknown hinting \"{}\", expected none or full",
                other
            ))),
        }
    }
}

/// Holds every option of a rendering, as given by the user.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// The resolution, in dots per inch.
    pub dpi: f64,

    /// The path to the ttf font.
    pub font: Option<PathBuf>,

    /// The hinting passed to the font engine.
    pub hinting: Hinting,

    /// The requested font size, ignored when `chars` is positive.
    #[serde(serialize_with = "serialize_pt")]
    #[serde(deserialize_with = "deserialize_pt")]
    pub size: Pt,

    /// The width of the image, in pixels.
    pub width: i32,

    /// The height of the image, in pixels.
    pub height: i32,

    /// The left and right padding, in pixels.
    pub padding: i32,

    /// The number of chars per line the font size is derived from.
    ///
    /// Zero or a negative number keeps `size`.
    pub chars: i32,

    /// The line spacing, as a multiple of the font size.
    pub spacing: f64,

    /// Whether to draw white text on a black background.
    pub white_on_black: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            dpi: 240.0,
            font: None,
            hinting: Hinting::None,
            size: Pt(14.0),
            width: 940,
            height: 400,
            padding: 10,
            chars: 20,
            spacing: 1.0,
            white_on_black: false,
        }
    }
}

impl Config {
    /// Reads a configuration from a TOML file. Missing keys take their default value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::ConfigNotFound(PathBuf::from(path.as_ref()), e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the path of the font, or an error if none was given.
    pub fn font_path(&self) -> Result<&Path> {
        self.font
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig(String::from("no font file given")))
    }

    /// Checks the configuration and freezes it into a `LayoutConfig`.
    pub fn layout(&self) -> Result<LayoutConfig> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }

        if self.padding < 0 {
            return Err(Error::InvalidConfig(format!(
                "padding must not be negative, got {}",
                self.padding
            )));
        }

        if self.width > Fixed::MAX_PIXELS || self.height > Fixed::MAX_PIXELS {
            return Err(Error::InvalidConfig(format!(
                "image of {}x{} is too large, sides are limited to {} pixels",
                self.width,
                self.height,
                Fixed::MAX_PIXELS
            )));
        }

        if i64::from(self.width) <= 2 * i64::from(self.padding) {
            return Err(Error::InvalidConfig(format!(
                "width {} leaves no room between paddings of {}",
                self.width, self.padding
            )));
        }

        if self.height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "height must be positive, got {}",
                self.height
            )));
        }

        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "spacing must not be negative, got {}",
                self.spacing
            )));
        }

        let size = effective_size(self);

        if !(size.0.is_finite() && size.0 > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "font size must be positive, got {}",
                size
            )));
        }

        if size.checked_to_fixed(self.dpi).is_none()
            || (size * self.spacing).checked_to_fixed(self.dpi).is_none()
        {
            return Err(Error::InvalidConfig(format!(
                "font size {} with spacing {} at {} dpi is too large",
                size, self.spacing, self.dpi
            )));
        }

        if self.chars > 0 && size != self.size {
            debug!("size {} overridden by {} chars per line", self.size, self.chars);
        }

        Ok(LayoutConfig {
            dpi: self.dpi,
            size,
            width: self.width,
            height: self.height,
            padding: self.padding,
            spacing: self.spacing,
        })
    }
}

/// The immutable configuration the layout engine works with.
///
/// The font size held here is the effective one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// The resolution, in dots per inch.
    pub dpi: f64,

    /// The effective font size.
    pub size: Pt,

    /// The width of the canvas, in pixels.
    pub width: i32,

    /// The height of the canvas, in pixels.
    pub height: i32,

    /// The left and right padding, in pixels.
    pub padding: i32,

    /// The line spacing multiplier.
    pub spacing: f64,
}

impl LayoutConfig {
    /// The x coordinate every line starts at.
    pub fn line_start(&self) -> Fixed {
        Fixed::from_pixels(self.padding)
    }

    /// The rightmost pixel a glyph may reach without wrapping.
    pub fn right_edge(&self) -> i32 {
        self.width - self.padding
    }

    /// The vertical distance between two baselines.
    pub fn line_advance(&self) -> Fixed {
        (self.size * self.spacing).to_fixed(self.dpi)
    }

    /// The pen position of the first glyph of the first line.
    pub fn first_baseline(&self) -> Position {
        Position::new(
            self.line_start(),
            Fixed::from_pixels(self.size.to_fixed(self.dpi).round()),
        )
    }
}
