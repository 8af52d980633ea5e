//! Module handling preset meme templates.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

use super::Loader;
use super::filesystem::{BytesLoader, PathLoader};


/// File extensions of template images.
pub const IMAGE_FILE_EXTENSIONS: &[&str] = &["gif", "jpeg", "jpg", "png", "webp", "bmp"];


/// Describes one of the preset templates offered as a quick start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateInfo {
    /// Name the template is loaded by.
    pub name: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Canonical location of the template image.
    pub url: &'static str,
}

lazy_static! {
    /// Catalog of the preset templates.
    pub static ref TEMPLATES: Vec<TemplateInfo> = vec![
        TemplateInfo{name: "drake", label: "Drake",
                     url: "https://i.imgflip.com/30b1gx.jpg"},
        TemplateInfo{name: "distracted", label: "Distracted",
                     url: "https://i.imgflip.com/1ur9b0.jpg"},
        TemplateInfo{name: "two-buttons", label: "Two Buttons",
                     url: "https://i.imgflip.com/1g8my4.jpg"},
        TemplateInfo{name: "change-mind", label: "Change Mind",
                     url: "https://i.imgflip.com/24y43o.jpg"},
        TemplateInfo{name: "expanding", label: "Expanding",
                     url: "https://i.imgflip.com/1jwhww.jpg"},
        TemplateInfo{name: "surprised", label: "Surprised",
                     url: "https://i.imgflip.com/2fm6x.jpg"},
    ];
}

impl TemplateInfo {
    /// Look up a preset template by its name (case insensitive).
    pub fn find(name: &str) -> Option<&'static TemplateInfo> {
        let name = name.trim().to_lowercase();
        TEMPLATES.iter().find(|t| t.name == name)
    }
}


/// Loader of template images, resolved by name in a local directory.
///
/// The loaded resource is the still-encoded image file;
/// decoding happens when the template is committed as the source image.
#[derive(Debug)]
pub struct TemplateLoader {
    inner: BytesLoader,
}

impl TemplateLoader {
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        TemplateLoader{
            inner: BytesLoader::new(PathLoader::for_extensions(directory, IMAGE_FILE_EXTENSIONS)),
        }
    }
}

impl Loader for TemplateLoader {
    type Item = Vec<u8>;
    type Err = TemplateError;

    fn load(&self, name: &str) -> Result<Vec<u8>, Self::Err> {
        let bytes = self.inner.load(name).map_err(|e| {
            if TemplateInfo::find(name).is_some() {
                warn!("Preset template `{}` is not available in {}: {}",
                    name, self.inner.directory().display(), e);
            }
            TemplateError::File(e)
        })?;
        debug!("Template `{}` read ({} bytes)", name, bytes.len());
        Ok(bytes)
    }
}


/// Error while obtaining a template image.
#[derive(Debug)]
pub enum TemplateError {
    /// The template file couldn't be found or read.
    File(io::Error),
    /// The template exists, but its pixels may not be accessed
    /// (e.g. a remote image served without permission to read it back).
    Restricted(String),
}

impl Error for TemplateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            TemplateError::File(ref e) => Some(e),
            TemplateError::Restricted(_) => None,
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TemplateError::File(ref e) => write!(fmt, "cannot read template: {}", e),
            TemplateError::Restricted(ref t) =>
                write!(fmt, "access to the pixels of template `{}` is restricted", t),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use spectral::prelude::*;
    use tempfile::tempdir;

    use resources::Loader;
    use super::{TemplateError, TemplateInfo, TemplateLoader, TEMPLATES};

    #[test]
    fn catalog() {
        assert_eq!(6, TEMPLATES.len());
        let drake = TemplateInfo::find(" Drake ").unwrap();
        assert_eq!("https://i.imgflip.com/30b1gx.jpg", drake.url);
        assert!(TemplateInfo::find("zoidberg").is_none());
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("drake.jpg"), b"\xff\xd8\xff").unwrap();
        let loader = TemplateLoader::new(dir.path());
        assert_that!(loader.load("drake")).is_ok().has_length(3);
    }

    #[test]
    fn missing_template() {
        let dir = tempdir().unwrap();
        let loader = TemplateLoader::new(dir.path());
        match loader.load("surprised") {
            Err(TemplateError::File(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
