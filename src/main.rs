#[macro_use]
extern crate log;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::{crate_authors, crate_description, crate_version, value_t, App, Arg, ArgMatches};
use colored::*;

use textraster::config::{Config, Hinting};
use textraster::document::render;
use textraster::units::Pt;
use textraster::Error as SError;

fn main() {
    let matches = app().get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&matches) {
        debug!("{:?}", e);
        eprintln!("{} {}", "error:".bold().red(), e);
        exit(1);
    }
}

#[allow(dangerous_implicit_autorefs)]
fn app() -> App<'static, 'static> {
    App::new("textraster")
        .version(crate_version!())
        .author(crate_authors!("\n"))
        .about(crate_description!())
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .value_name("FILE")
                .help("TOML file with default options"),
        )
        .arg(
            Arg::with_name("fontfile")
                .long("fontfile")
                .takes_value(true)
                .value_name("FILE")
                .help("Filename of the ttf font"),
        )
        .arg(
            Arg::with_name("dpi")
                .long("dpi")
                .takes_value(true)
                .help("Screen resolution in dots per inch [default: 240]"),
        )
        .arg(
            Arg::with_name("hinting")
                .long("hinting")
                .takes_value(true)
                .possible_values(&["none", "full"])
                .help("Hinting of the glyphs [default: none]"),
        )
        .arg(
            Arg::with_name("size")
                .long("size")
                .takes_value(true)
                .help("Font size in points, ignored when chars is positive [default: 14]"),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .help("Image width in pixels [default: 940]"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .help("Image height in pixels [default: 400]"),
        )
        .arg(
            Arg::with_name("padding")
                .long("padding")
                .takes_value(true)
                .help("Text left and right padding in pixels [default: 10]"),
        )
        .arg(
            Arg::with_name("chars")
                .long("chars")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Chars displayed per line, 0 to use size [default: 20]"),
        )
        .arg(
            Arg::with_name("spacing")
                .long("spacing")
                .takes_value(true)
                .help("Line spacing [default: 1.0]"),
        )
        .arg(
            Arg::with_name("whiteonblack")
                .long("whiteonblack")
                .help("White text on a black background"),
        )
        .arg(
            Arg::with_name("input")
                .long("input")
                .short("i")
                .takes_value(true)
                .value_name("FILE")
                .help("Text to render, stdin if missing"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .value_name("FILE")
                .help("Where to write the png, stdout if missing"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Logs more, can be repeated"),
        )
}

/// Builds the configuration from the config file and the command line, the latter taking
/// precedence.
fn config(matches: &ArgMatches) -> Result<Config, Box<dyn Error>> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    macro_rules! override_with {
        ($field: ident, $name: expr, $ty: ty) => {
            if matches.is_present($name) {
                config.$field = value_t!(matches, $name, $ty)?;
            }
        };
    }

    override_with!(dpi, "dpi", f64);
    override_with!(width, "width", i32);
    override_with!(height, "height", i32);
    override_with!(padding, "padding", i32);
    override_with!(chars, "chars", i32);
    override_with!(spacing, "spacing", f64);

    if matches.is_present("size") {
        config.size = Pt(value_t!(matches, "size", f64)?);

        if config.chars > 0 {
            warn!(
                "--size is overridden by the size derived from {} chars per line, \
                 use --chars 0 to keep it",
                config.chars
            );
        }
    }

    if let Some(font) = matches.value_of("fontfile") {
        config.font = Some(PathBuf::from(font));
    }

    if let Some(hinting) = matches.value_of("hinting") {
        config.hinting = hinting.parse::<Hinting>()?;
    }

    if matches.is_present("whiteonblack") {
        config.white_on_black = true;
    }

    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = config(matches)?;
    debug!("{:?}", config);

    let input: Box<dyn Read> = match matches.value_of("input") {
        Some(path) => Box::new(File::open(path).map_err(SError::InputError)?),
        None => Box::new(io::stdin()),
    };

    // The output is only opened once the png is fully encoded.
    let mut png = Vec::new();
    render(&config, BufReader::new(input), &mut png)?;

    let output: Box<dyn Write> = match matches.value_of("output") {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    let mut output = BufWriter::new(output);
    output.write_all(&png)?;
    output.flush()?;

    Ok(())
}
