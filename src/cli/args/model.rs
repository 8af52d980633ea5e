//! Data structures for command-line arguments.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use clap;
use grift::{CaptionContent, CaptionStyle, ExportFormat, StyleError};
use serde_json;


/// Structure to hold options received from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// What the program should do.
    pub command: Command,
}

#[allow(dead_code)]
impl Options {
    #[inline]
    pub fn verbose(&self) -> bool { self.verbosity > 0 }
    #[inline]
    pub fn quiet(&self) -> bool { self.verbosity < 0 }
}


/// Subcommand given on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// List the preset templates.
    Templates,
    /// Caption an image and export it.
    Caption(CaptionOptions),
}

/// Options of the `caption` subcommand.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionOptions {
    /// Image to put the captions on.
    pub source: Source,
    pub content: CaptionContent,
    /// Style of the captions, after all the style flags have been applied.
    pub style: CaptionStyle,
    pub format: ExportFormat,

    /// Directory to download the meme into.
    ///
    /// If absent, the image shall be written to standard output.
    pub output_dir: Option<PathBuf>,
    /// Whether to also put the meme on the clipboard.
    pub copy: bool,
    /// Whether to print the share link for the meme.
    pub share: bool,

    pub template_dir: PathBuf,
    pub font_dir: PathBuf,
}

/// Where the image to caption comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Image file on disk.
    File(PathBuf),
    /// Preset template of given name.
    Template(String),
}


/// Error that can occur while parsing of command line arguments.
#[derive(Debug)]
pub enum ArgsError {
    /// General when parsing the arguments.
    Parse(clap::Error),
    /// The --style file couldn't be read.
    StyleFile(PathBuf, io::Error),
    /// The --style file isn't valid JSON of a caption style.
    StyleJson(serde_json::Error),
    /// Style flags resulted in an invalid style.
    Style(StyleError),
}

impl From<clap::Error> for ArgsError {
    fn from(input: clap::Error) -> Self {
        ArgsError::Parse(input)
    }
}
impl From<serde_json::Error> for ArgsError {
    fn from(input: serde_json::Error) -> Self {
        ArgsError::StyleJson(input)
    }
}
impl From<StyleError> for ArgsError {
    fn from(input: StyleError) -> Self {
        ArgsError::Style(input)
    }
}

impl Error for ArgsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ArgsError::Parse(ref e) => Some(e),
            ArgsError::StyleFile(_, ref e) => Some(e),
            ArgsError::StyleJson(ref e) => Some(e),
            ArgsError::Style(ref e) => Some(e),
        }
    }
}

impl fmt::Display for ArgsError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ArgsError::Parse(ref e) => write!(fmt, "invalid arguments: {}", e),
            ArgsError::StyleFile(ref path, ref e) =>
                write!(fmt, "cannot read style file {}: {}", path.display(), e),
            ArgsError::StyleJson(ref e) => write!(fmt, "caption style JSON error: {}", e),
            ArgsError::Style(ref e) => write!(fmt, "invalid caption style: {}", e),
        }
    }
}
