//! Defines the output of an export operation.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use mime::{self, Mime};

use super::error::CaptionError;


/// Format of exported images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Lossless PNG. This is the default.
    Png,
    /// Lossy JPEG, encoded with the style's export quality.
    Jpeg,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Png
    }
}

impl ExportFormat {
    /// File extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    #[inline]
    pub fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            _ => Err(format!("unsupported export format `{}`", s)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.extension())
    }
}


/// Output of the export process: an encoded image.
#[derive(Clone, Debug)]
#[must_use = "unused caption output which must be used"]
pub struct CaptionOutput {
    format: ImageFormat,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl CaptionOutput {
    /// Encode a rendered canvas in given format.
    ///
    /// `jpeg_quality` (1-100) is only used for lossy formats.
    pub(crate) fn encode(img: &RgbaImage, format: ExportFormat,
                         jpeg_quality: u8) -> Result<Self, CaptionError> {
        let (width, height) = img.dimensions();
        debug!("Encoding {}x{} image as {:?}...", width, height, format);

        let mut bytes = vec![];
        match format {
            ExportFormat::Png => {
                trace!("Writing PNG image");
                PngEncoder::new(&mut bytes)
                    .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .map_err(CaptionError::export)?;
            }
            ExportFormat::Jpeg => {
                trace!("Writing JPEG with quality {}", jpeg_quality);
                // JPEG has no alpha channel.
                let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut bytes, jpeg_quality)
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(CaptionError::export)?;
            }
        }

        trace!("Encoded image has {} byte(s)", bytes.len());
        Ok(CaptionOutput{format: format.image_format(), width, height, bytes})
    }
}

impl CaptionOutput {
    /// Image format of the output.
    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Pixel dimensions of the encoded image.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw bytes of the output.
    ///
    /// See `CaptionOutput::format` for how to interpret it.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Convert the output into a vector of bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The MIME type that matches output's format.
    pub fn mime_type(&self) -> Option<Mime> {
        match self.format {
            ImageFormat::Jpeg => Some(mime::IMAGE_JPEG),
            ImageFormat::Png => Some(mime::IMAGE_PNG),
            _ => None,
        }
    }
}

impl Deref for CaptionOutput {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes()
    }
}

impl From<CaptionOutput> for Vec<u8> {
    fn from(output: CaptionOutput) -> Self {
        output.into_bytes()
    }
}


#[cfg(test)]
mod tests {
    use image::{self, ImageFormat, Rgba, RgbaImage};
    use mime;
    use spectral::prelude::*;

    use super::{CaptionOutput, ExportFormat};

    #[test]
    fn png_is_lossless() {
        let mut img = RgbaImage::from_pixel(7, 5, Rgba([10, 20, 30, 255]));
        img.put_pixel(3, 2, Rgba([200, 100, 0, 128]));

        let output = CaptionOutput::encode(&img, ExportFormat::Png, 90).unwrap();
        assert_eq!(ImageFormat::Png, output.format());
        assert_eq!(Some(mime::IMAGE_PNG), output.mime_type());

        let decoded = image::load_from_memory(output.bytes()).unwrap().to_rgba8();
        assert_eq!(img, decoded);
    }

    #[test]
    fn jpeg() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([0x30, 0x60, 0x90, 255]));
        let output = CaptionOutput::encode(&img, ExportFormat::Jpeg, 90).unwrap();
        assert_eq!(Some(mime::IMAGE_JPEG), output.mime_type());
        assert_eq!((16, 16), output.dimensions());
        assert_that!(image::guess_format(output.bytes())).is_ok().is_equal_to(ImageFormat::Jpeg);
    }

    #[test]
    fn export_format_parsing() {
        assert_that!("PNG".parse::<ExportFormat>()).is_ok().is_equal_to(ExportFormat::Png);
        assert_that!("jpeg".parse::<ExportFormat>()).is_ok().is_equal_to(ExportFormat::Jpeg);
        assert_that!("gif".parse::<ExportFormat>()).is_err();
        assert_eq!("jpg", ExportFormat::Jpeg.extension());
    }
}
