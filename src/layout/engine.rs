//! The pen state machine that splits lines of text to fit the width of the canvas.
//!
//! For each char of a line, the engine asks the font for its advance and decides, on whole
//! pixels, whether it still fits before the right padding. If it doesn't, the pen goes back to
//! the start of the next line before the char is placed. The advance is only a hint for this
//! decision: once a char is drawn, the pen position reported by the rasterizer replaces the
//! engine's own.

use std::str::Chars;

use crate::config::LayoutConfig;
use crate::layout::constants::{TAB, TAB_REPLACEMENT};
use crate::layout::{Glyph, LayoutEvent, Metrics, Position};
use crate::units::Fixed;
use crate::Result;

/// Holds the pen across the lines of a whole rendering.
#[derive(Debug)]
pub struct Engine {
    /// The configuration, with the effective font size.
    config: LayoutConfig,

    /// The position of the next glyph.
    pen: Position,
}

impl Engine {
    /// Creates an engine with its pen on the first baseline.
    pub fn new(config: LayoutConfig) -> Engine {
        Engine {
            pen: config.first_baseline(),
            config,
        }
    }

    /// Returns the current pen position.
    pub fn pen(&self) -> Position {
        self.pen
    }

    /// Starts laying out a line of text.
    ///
    /// The returned iterator produces the events lazily. Every `Place` event must be followed by
    /// a call to `Line::advance_to` with the position the rasterizer reports.
    pub fn layout_line<'e, 't, M: Metrics>(
        &'e mut self,
        text: &'t str,
        metrics: &'e M,
    ) -> Line<'e, 't, M> {
        Line {
            engine: self,
            metrics,
            chars: text.chars(),
            pending: None,
            done: false,
        }
    }

    /// Returns whether a glyph with this advance would cross the right padding.
    fn overflows(&self, advance: Fixed) -> bool {
        self.pen.x.round() + advance.round() > self.config.right_edge()
    }

    /// Moves the pen to the beginning of the next line.
    ///
    /// The pen stays on the last representable baseline once it reaches the bottom of the fixed
    /// point range.
    fn new_line(&mut self) {
        self.pen.x = self.config.line_start();
        self.pen.y += self.config.line_advance();
    }
}

/// The lazy layout of a single line of text.
pub struct Line<'e, 't, M> {
    /// The engine owning the pen.
    engine: &'e mut Engine,

    /// Where advances come from.
    metrics: &'e M,

    /// The chars that remain to be laid out.
    chars: Chars<'t>,

    /// A glyph that caused a wrap and still needs to be placed.
    pending: Option<Glyph>,

    /// Whether the closing line break was emitted.
    done: bool,
}

impl<'e, 't, M: Metrics> Line<'e, 't, M> {
    /// Moves the pen where the rasterizer says it ended.
    pub fn advance_to(&mut self, pen: Position) {
        self.engine.pen = pen;
    }

    /// Returns the current pen position.
    pub fn pen(&self) -> Position {
        self.engine.pen
    }

    /// Finds the next glyph the font can display.
    fn next_glyph(&mut self) -> Result<Option<Glyph>> {
        while let Some(c) = self.chars.next() {
            let c = if c == TAB { TAB_REPLACEMENT } else { c };

            match self.metrics.glyph(c)? {
                Some(glyph) => return Ok(Some(glyph)),
                None => trace!("no glyph for {:?}, skipped", c),
            }
        }

        Ok(None)
    }
}

impl<'e, 't, M: Metrics> Iterator for Line<'e, 't, M> {
    type Item = Result<LayoutEvent>;

    fn next(&mut self) -> Option<Result<LayoutEvent>> {
        if let Some(glyph) = self.pending.take() {
            return Some(Ok(LayoutEvent::Place(glyph.glyph, self.engine.pen)));
        }

        if self.done {
            return None;
        }

        match self.next_glyph() {
            Ok(Some(glyph)) => {
                if self.engine.overflows(glyph.advance) {
                    trace!("{:?} overflows at {:?}, wrapping", glyph.glyph, self.engine.pen);
                    self.engine.new_line();
                    self.pending = Some(glyph);
                    Some(Ok(LayoutEvent::NewLine))
                } else {
                    Some(Ok(LayoutEvent::Place(glyph.glyph, self.engine.pen)))
                }
            }

            Ok(None) => {
                self.done = true;
                self.engine.new_line();
                Some(Ok(LayoutEvent::NewLine))
            }

            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
