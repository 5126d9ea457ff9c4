//! Logic to place glyphs left to right and break the lines that don't fit the canvas.

pub mod constants;
pub mod engine;

use crate::config::Config;
use crate::units::{Fixed, Pt, POINTS_PER_INCH};
use crate::Result;

pub use engine::{Engine, Line};

/// A pen position, in fixed units from the top left corner of the canvas.
///
/// `y` is the baseline of the current line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Position {
    /// The horizontal coordinate.
    pub x: Fixed,

    /// The vertical coordinate of the baseline.
    pub y: Fixed,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: Fixed, y: Fixed) -> Position {
        Position { x, y }
    }
}

/// A char as the layout engine sees it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// The char, after tab substitution.
    pub glyph: char,

    /// How far the pen moves once the glyph is drawn, as announced by the font.
    pub advance: Fixed,
}

/// What the layout engine decided for the next piece of a line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutEvent {
    /// The char must be drawn with its pen at the position.
    Place(char, Position),

    /// The pen went back to the start of the next line.
    NewLine,
}

/// Answers the questions the layout engine has about a font.
pub trait Metrics {
    /// Returns whether the font has something to display for the char.
    fn has_glyph(&self, c: char) -> bool;

    /// Returns the advance of the char at the configured size.
    fn advance(&self, c: char) -> Result<Fixed>;

    /// Measures a char, returns `None` if the font can't display it.
    fn glyph(&self, c: char) -> Result<Option<Glyph>> {
        if !self.has_glyph(c) {
            return Ok(None);
        }

        Ok(Some(Glyph {
            glyph: c,
            advance: self.advance(c)?,
        }))
    }
}

/// Draws glyphs somewhere.
pub trait Rasterizer {
    /// Draws the char with its pen at `pen`, and returns where the pen is once the char is drawn.
    ///
    /// The returned position is trusted over any estimate of the layout engine.
    fn draw(&mut self, c: char, pen: Position) -> Result<Position>;
}

/// Computes the font size the layout will use.
///
/// A positive number of chars per line derives the size from the usable width, whatever size was
/// requested.
pub fn effective_size(config: &Config) -> Pt {
    if config.chars > 0 {
        let usable = (i64::from(config.width) - i64::from(config.padding) * 2) as f64;
        Pt(usable / f64::from(config.chars) * POINTS_PER_INCH / config.dpi)
    } else {
        config.size
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::layout::effective_size;
    use crate::units::{nearly_equal, Pt};
    use test_case::test_case;

    #[test_case(940, 10, 20, 240.0, 13.8)]
    #[test_case(50, 0, 5, 72.0, 10.0)]
    #[test_case(1000, 100, 40, 96.0, 15.0)]
    #[test_case(333, 7, 3, 300.0, 25.52)]
    fn derived_from_chars(width: i32, padding: i32, chars: i32, dpi: f64, expected: f64) {
        let config = Config {
            width,
            padding,
            chars,
            dpi,
            size: Pt(99.0),
            ..Config::default()
        };

        let size = effective_size(&config);
        assert!(nearly_equal(size.0, expected));
        assert_eq!(
            size.0,
            f64::from(width - 2 * padding) / f64::from(chars) * 72.0 / dpi
        );
    }

    #[test]
    fn padding_wider_than_image() {
        let config = Config {
            width: 940,
            padding: 1_500_000_000,
            chars: 10,
            dpi: 72.0,
            ..Config::default()
        };

        assert!(effective_size(&config).0 < 0.0);
    }

    #[test_case(0)]
    #[test_case(-3)]
    fn requested_size_without_chars(chars: i32) {
        let config = Config {
            chars,
            size: Pt(11.5),
            ..Config::default()
        };

        assert_eq!(effective_size(&config), Pt(11.5));
    }
}
