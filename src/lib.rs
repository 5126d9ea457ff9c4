//! This crate contains all the tools we need to turn lines of text into a wrapped raster image.

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub mod canvas;
pub mod config;
pub mod document;
pub mod fonts;
pub mod layout;
pub mod saturating;
pub mod units;

use std::path::PathBuf;
use std::{error, fmt, io, result};

macro_rules! impl_from_error {
    ($type: ty, $variant: path, $from: ty) => {
        impl From<$from> for $type {
            fn from(e: $from) -> $type {
                $variant(e)
            }
        }
    };
}

/// The different families of errors, telling at which stage a run failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration or the font could not be loaded, nothing was laid out.
    Configuration,

    /// A glyph could not be measured or drawn.
    Draw,

    /// The input stream failed.
    InputRead,

    /// The image could not be encoded.
    Encode,

    /// The encoded image could not be written.
    Output,
}

/// The error type of the library.
#[derive(Debug)]
pub enum Error {
    /// The specified font was not found.
    FontNotFound(PathBuf),

    /// Error while dealing with freetype when loading a font.
    FreetypeError(freetype::Error),

    /// The configuration file could not be read.
    ConfigNotFound(PathBuf, io::Error),

    /// The configuration file is not valid toml.
    TomlError(toml::de::Error),

    /// A configuration value is out of range.
    InvalidConfig(String),

    /// Freetype failed to measure or render a char.
    DrawError(char, freetype::Error),

    /// Reading the input failed.
    InputError(io::Error),

    /// The image encoder failed.
    EncodeError(image::ImageError),

    /// Another io error occured.
    IoError(io::Error),
}

impl_from_error!(Error, Error::FreetypeError, freetype::Error);
impl_from_error!(Error, Error::TomlError, toml::de::Error);
impl_from_error!(Error, Error::EncodeError, image::ImageError);
impl_from_error!(Error, Error::IoError, io::Error);

impl Error {
    /// Returns the stage at which the error occured.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FontNotFound(_)
            | Error::FreetypeError(_)
            | Error::ConfigNotFound(..)
            | Error::TomlError(_)
            | Error::InvalidConfig(_) => ErrorKind::Configuration,
            Error::DrawError(..) => ErrorKind::Draw,
            Error::InputError(_) => ErrorKind::InputRead,
            Error::EncodeError(_) => ErrorKind::Encode,
            Error::IoError(_) => ErrorKind::Output,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FontNotFound(path) => write!(fmt, "couldn't find font \"{}\"", path.display()),
            Error::FreetypeError(e) => write!(fmt, "freetype error: {}", e),
            Error::ConfigNotFound(path, e) => {
                write!(fmt, "couldn't read config \"{}\": {}", path.display(), e)
            }
            Error::TomlError(e) => write!(fmt, "invalid config file: {}", e),
            Error::InvalidConfig(e) => write!(fmt, "invalid configuration: {}", e),
            Error::DrawError(c, e) => write!(fmt, "failed to draw {:?}: {}", c, e),
            Error::InputError(e) => write!(fmt, "couldn't read input: {}", e),
            Error::EncodeError(e) => write!(fmt, "couldn't encode image: {}", e),
            Error::IoError(e) => write!(fmt, "an io error occured: {}", e),
        }
    }
}

impl error::Error for Error {}

/// The result type of the library.
pub type Result<T> = result::Result<T, Error>;
