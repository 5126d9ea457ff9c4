//! This module turns a stream of text into an image.

use std::io::{BufRead, Write};

use freetype::Library;

use crate::canvas::{resolve_colors, Canvas};
use crate::config::{Config, LayoutConfig};
use crate::fonts::{Font, GlyphRasterizer};
use crate::layout::{Engine, LayoutEvent, Metrics, Rasterizer};
use crate::{Error, Result};

/// A summary of what was laid out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The number of lines read from the input.
    pub lines: usize,

    /// The number of glyphs drawn.
    pub glyphs: usize,

    /// The number of times a line was wrapped.
    pub wraps: usize,
}

/// Reads the next line of the input, without its line ending.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD.
fn read_line<I: BufRead>(input: &mut I, buffer: &mut Vec<u8>) -> Result<Option<String>> {
    buffer.clear();

    if input
        .read_until(b'\n', buffer)
        .map_err(Error::InputError)?
        == 0
    {
        return Ok(None);
    }

    if buffer.last() == Some(&b'\n') {
        buffer.pop();
    }

    if buffer.last() == Some(&b'\r') {
        buffer.pop();
    }

    Ok(Some(String::from_utf8_lossy(buffer).into_owned()))
}

/// Lays out every line of the input, drawing glyphs with the rasterizer.
///
/// Stops at the first error.
pub fn typeset<I, M, R>(
    layout: LayoutConfig,
    mut input: I,
    metrics: &M,
    rasterizer: &mut R,
) -> Result<Rendered>
where
    I: BufRead,
    M: Metrics,
    R: Rasterizer,
{
    let mut engine = Engine::new(layout);
    let mut rendered = Rendered::default();
    let mut buffer = Vec::new();

    while let Some(text) = read_line(&mut input, &mut buffer)? {
        let mut line = engine.layout_line(&text, metrics);
        let mut breaks = 0;

        while let Some(event) = line.next() {
            match event? {
                LayoutEvent::Place(c, pen) => {
                    let pen = rasterizer.draw(c, pen)?;
                    line.advance_to(pen);
                    rendered.glyphs += 1;
                }

                LayoutEvent::NewLine => breaks += 1,
            }
        }

        rendered.lines += 1;
        rendered.wraps += breaks - 1;
        debug!(
            "line {} laid out in {} rows, pen at {:?}",
            rendered.lines,
            breaks,
            engine.pen()
        );
    }

    if engine.pen().y.floor() > layout.height {
        warn!(
            "text ends at y = {}, below the {}px high image",
            engine.pen().y.floor(),
            layout.height
        );
    }

    Ok(rendered)
}

/// Renders the input as a PNG image written to the output.
///
/// Nothing is written unless the whole input was rendered and encoded.
pub fn render<I: BufRead, W: Write>(config: &Config, input: I, mut output: W) -> Result<Rendered> {
    let layout = config.layout()?;
    debug!("{:?}", layout);

    let library = Library::init()?;
    let font = Font::from_file(config.font_path()?, &library)?;
    font.set_size(layout.size, layout.dpi)?;

    info!(
        "using {} at {:.2}pt, {}dpi",
        font.name().unwrap_or_else(|| String::from("unnamed font")),
        layout.size.0,
        layout.dpi
    );

    let mut canvas = Canvas::new(
        layout.width as u32,
        layout.height as u32,
        resolve_colors(config.white_on_black),
    );

    let rendered = {
        let mut rasterizer = GlyphRasterizer::new(&font, &mut canvas, config.hinting);
        typeset(layout, input, &font, &mut rasterizer)?
    };

    let bytes = canvas.encode_png()?;
    output.write_all(&bytes)?;
    output.flush()?;

    info!(
        "rendered {} lines, {} glyphs, {} wraps into {}x{} image",
        rendered.lines,
        rendered.glyphs,
        rendered.wraps,
        canvas.width(),
        canvas.height()
    );

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use std::io::{self, BufReader, Cursor, Read};
    use std::path::PathBuf;

    use crate::config::{Config, LayoutConfig};
    use crate::document::{render, typeset, Rendered};
    use crate::layout::{Metrics, Position, Rasterizer};
    use crate::units::{Fixed, Pt};
    use crate::{Error, ErrorKind, Result};

    struct Monospace;

    impl Metrics for Monospace {
        fn has_glyph(&self, c: char) -> bool {
            c != '\t' && c != '\u{7}'
        }

        fn advance(&self, _: char) -> Result<Fixed> {
            Ok(Fixed::from_pixels(10))
        }
    }

    #[derive(Default)]
    struct Recorder {
        drawn: Vec<(char, Position)>,
    }

    impl Recorder {
        fn text(&self) -> String {
            self.drawn.iter().map(|(c, _)| *c).collect()
        }
    }

    impl Rasterizer for Recorder {
        fn draw(&mut self, c: char, pen: Position) -> Result<Position> {
            self.drawn.push((c, pen));
            Ok(Position::new(pen.x + Fixed::from_pixels(10), pen.y))
        }
    }

    struct FailAfter(usize);

    impl Rasterizer for FailAfter {
        fn draw(&mut self, c: char, pen: Position) -> Result<Position> {
            if self.0 == 0 {
                return Err(Error::DrawError(c, freetype::Error::CannotRenderGlyph));
            }
            self.0 -= 1;
            Ok(Position::new(pen.x + Fixed::from_pixels(10), pen.y))
        }
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    fn layout() -> LayoutConfig {
        LayoutConfig {
            dpi: 72.0,
            size: Pt(12.0),
            width: 50,
            height: 100,
            padding: 0,
            spacing: 1.0,
        }
    }

    #[test]
    fn lines_and_wraps() {
        let mut recorder = Recorder::default();
        let rendered = typeset(
            layout(),
            Cursor::new("ABCDEFG\n\nxy\n"),
            &Monospace,
            &mut recorder,
        )
        .unwrap();

        assert_eq!(
            rendered,
            Rendered {
                lines: 3,
                glyphs: 9,
                wraps: 1,
            }
        );
        assert_eq!(recorder.text(), "ABCDEFGxy");

        // ABCDE, FG, the empty line, then xy.
        let (x, pen) = recorder.drawn[7];
        assert_eq!(x, 'x');
        assert_eq!(pen, Position::new(Fixed(0), Fixed(4 * 12 * 64)));
    }

    #[test]
    fn last_line_without_newline() {
        let mut recorder = Recorder::default();
        let rendered = typeset(layout(), Cursor::new("ab\ncd"), &Monospace, &mut recorder).unwrap();
        assert_eq!(rendered.lines, 2);
        assert_eq!(recorder.text(), "abcd");
    }

    #[test]
    fn line_endings_stripped() {
        let mut recorder = Recorder::default();
        let rendered = typeset(
            layout(),
            Cursor::new("ab\r\ncd\r"),
            &Monospace,
            &mut recorder,
        )
        .unwrap();
        assert_eq!(rendered.lines, 2);
        assert_eq!(recorder.text(), "abcd");
    }

    #[test]
    fn empty_input() {
        let mut recorder = Recorder::default();
        let rendered = typeset(layout(), Cursor::new(""), &Monospace, &mut recorder).unwrap();
        assert_eq!(rendered, Rendered::default());
    }

    #[test]
    fn tabs_and_missing_glyphs() {
        let mut recorder = Recorder::default();
        typeset(
            layout(),
            Cursor::new("a\tb\u{7}c"),
            &Monospace,
            &mut recorder,
        )
        .unwrap();
        assert_eq!(recorder.text(), "a bc");
    }

    #[test]
    fn invalid_utf8_replaced() {
        let mut recorder = Recorder::default();
        typeset(
            layout(),
            Cursor::new(&b"a\xffb\n"[..]),
            &Monospace,
            &mut recorder,
        )
        .unwrap();
        assert_eq!(recorder.text(), "a\u{fffd}b");
    }

    #[test]
    fn draw_error_stops() {
        let e = typeset(layout(), Cursor::new("abc\ndef\n"), &Monospace, &mut FailAfter(4))
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Draw);
    }

    #[test]
    fn input_error_stops() {
        let mut recorder = Recorder::default();
        let e = typeset(
            layout(),
            BufReader::new(BrokenPipe),
            &Monospace,
            &mut recorder,
        )
        .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InputRead);
        assert!(recorder.drawn.is_empty());
    }

    #[test]
    fn no_output_without_font() {
        let config = Config {
            font: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..Config::default()
        };
        let mut output = Vec::new();
        let e = render(&config, Cursor::new("hello\n"), &mut output).unwrap_err();

        assert_eq!(e.kind(), ErrorKind::Configuration);
        assert!(output.is_empty());
    }

    #[test]
    fn no_output_with_invalid_config() {
        let config = Config {
            padding: -3,
            ..Config::default()
        };
        let mut output = Vec::new();
        let e = render(&config, Cursor::new("hello\n"), &mut output).unwrap_err();

        assert_eq!(e.kind(), ErrorKind::Configuration);
        assert!(output.is_empty());
    }

    #[test]
    fn render_with_system_font() {
        let font = match crate::fonts::tests::system_font() {
            Some(font) => font,
            None => return,
        };

        let config = Config {
            font: Some(font),
            white_on_black: true,
            ..Config::default()
        };
        let mut output = Vec::new();
        let rendered = render(&config, Cursor::new("Hello\tworld\n\nagain\n"), &mut output).unwrap();

        assert!(rendered.glyphs > 0);
        assert_eq!(&output[..8], b"\x89PNG\r\n\x1a\n");

        let image = image::load_from_memory_with_format(&output, image::ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(image.dimensions(), (940, 400));
        assert!(image.pixels().any(|p| p.0 != [0, 0, 0, 255]));
    }
}
