//! Module for loading fonts used in captions.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

use rusttype;

use super::Loader;
use super::filesystem::{BytesLoader, PathLoader};


pub const FILE_EXTENSION: &str = "ttf";


/// Font that can be used to caption images.
pub enum Font {
    /// TrueType font loaded from a file.
    Outline {
        name: String,
        font: rusttype::Font<'static>,
    },
    /// The built-in bold block font.
    ///
    /// It is always available, so it serves as the fallback whenever
    /// the requested font family cannot be loaded.
    Block,
}

impl Font {
    /// Create a font from the content of a TrueType file.
    pub fn from_bytes<N: Into<String>>(name: N, bytes: Vec<u8>) -> Result<Self, FontError> {
        let name = name.into();
        match rusttype::Font::try_from_vec(bytes) {
            Some(font) => Ok(Font::Outline{name, font}),
            None => Err(FontError::Invalid(name)),
        }
    }

    /// Name of the font family.
    pub fn name(&self) -> &str {
        match *self {
            Font::Outline{ref name, ..} => name,
            Font::Block => "(built-in)",
        }
    }

    #[inline]
    pub fn is_builtin(&self) -> bool {
        match *self { Font::Block => true, _ => false }
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Font({})", self.name())
    }
}


/// Loader of TrueType fonts from a directory, by font family name.
#[derive(Debug)]
pub struct FontLoader {
    inner: BytesLoader,
}

impl FontLoader {
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        FontLoader{
            inner: BytesLoader::new(PathLoader::for_extensions(directory, &[FILE_EXTENSION])),
        }
    }
}

impl Loader for FontLoader {
    type Item = Font;
    type Err = FontError;

    fn load(&self, name: &str) -> Result<Font, Self::Err> {
        let bytes = self.inner.load(name).map_err(|e| {
            debug!("Can't read font `{}` from {}: {}", name, self.inner.directory().display(), e);
            FontError::File(e)
        })?;
        let font = Font::from_bytes(name, bytes).map_err(|e| {
            error!("Font file for `{}` could not be parsed", name); e
        })?;
        debug!("Font `{}` loaded successfully", name);
        Ok(font)
    }
}


/// Error while loading a font.
#[derive(Debug)]
pub enum FontError {
    /// The font file couldn't be found or read.
    File(io::Error),
    /// The file doesn't contain a usable font.
    Invalid(String),
}

impl Error for FontError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            FontError::File(ref e) => Some(e),
            FontError::Invalid(_) => None,
        }
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FontError::File(ref e) => write!(fmt, "cannot read font file: {}", e),
            FontError::Invalid(ref n) => write!(fmt, "file for font `{}` is not a valid font", n),
        }
    }
}
