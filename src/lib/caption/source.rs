//! Module implementing the source image of the compositor.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use image::{self, RgbaImage};
use mime::{self, Mime};

use super::error::CaptionError;


/// Decoded bitmap that captions are drawn over.
///
/// Source images are never modified:
/// every render starts from a fresh copy of the pixels.
#[derive(Clone)]
pub struct SourceImage {
    name: String,
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decode an image file, detecting its format from the content.
    pub fn decode<N: Into<String>>(name: N, bytes: &[u8]) -> Result<Self, CaptionError> {
        let name = name.into();
        trace!("Decoding image `{}` from {} byte(s)", name, bytes.len());
        let img = image::load_from_memory(bytes).map_err(|e| {
            debug!("Failed to decode image `{}`: {}", name, e);
            CaptionError::decode(name.as_str(), e)
        })?;
        Self::from_pixels(name, img.to_rgba8())
    }

    /// Create the source image from already decoded pixels.
    pub fn from_pixels<N: Into<String>>(name: N, pixels: RgbaImage) -> Result<Self, CaptionError> {
        let name = name.into();
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptionError::decode(name, "image has no pixels"));
        }
        debug!("Image `{}` has {}x{} pixels", name, width, height);
        Ok(SourceImage{name, pixels})
    }
}

impl SourceImage {
    /// Name of the file or template the image came from.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[inline]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "SourceImage({:?}, {}x{})", self.name, self.width(), self.height())
    }
}


/// A file submitted by the user, along with its declared media type.
#[derive(Clone)]
pub struct FileUpload {
    pub name: String,
    pub media_type: Mime,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    #[inline]
    pub fn new<N: Into<String>>(name: N, media_type: Mime, bytes: Vec<u8>) -> Self {
        FileUpload{name: name.into(), media_type, bytes}
    }

    /// Read a file from disk, declaring its media type based on the file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media_type_for(path);
        trace!("File {} declared as {}", path.display(), media_type);
        Ok(FileUpload{name, media_type, bytes})
    }

    /// Whether the declared media type is that of an image.
    #[inline]
    pub fn is_image(&self) -> bool {
        self.media_type.type_() == mime::IMAGE
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("bytes", &format!("<{} byte(s)>", self.bytes.len()))
            .finish()
    }
}

/// Guess the media type of a file from its extension.
pub fn media_type_for(path: &Path) -> Mime {
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "webp" => "image/webp".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        "txt" => mime::TEXT_PLAIN,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
