//! Module with the destinations of exported memes.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rand::{self, Rng};
use time::OffsetDateTime;
use urlencoding;

use super::error::Cause;
use super::output::{CaptionOutput, ExportFormat};


/// Length of the random part of download file names.
pub const FILE_NAME_SUFFIX_LENGTH: usize = 6;
const FILE_NAME_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Base of the share intent URLs.
pub const SHARE_INTENT_URL: &str = "https://twitter.com/intent/tweet";


/// Generate a file name for a download, e.g. `grifts-meme-k3x9a0.png`.
pub fn file_name(prefix: &str, format: ExportFormat) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..FILE_NAME_SUFFIX_LENGTH)
        .map(|_| FILE_NAME_ALPHABET[rng.gen_range(0..FILE_NAME_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}.{}", prefix, suffix, format.extension())
}

/// Build the URL of a share intent with given text & link.
pub fn share_url(text: &str, link: &str) -> String {
    format!("{}?text={}&url={}", SHARE_INTENT_URL,
        urlencoding::encode(text), urlencoding::encode(link))
}


/// Destination of downloaded memes.
pub trait DownloadSink {
    /// Store the encoded image under given file name.
    ///
    /// On failure, nothing should be left behind under that name.
    fn save(&mut self, file_name: &str, output: &CaptionOutput) -> io::Result<()>;
}

/// Download sink which writes files into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    #[inline]
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        DirectorySink{directory: directory.as_ref().to_owned()}
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path that a file of given name would be saved at.
    #[inline]
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, file_name: &str, output: &CaptionOutput) -> io::Result<()> {
        let path = self.path_for(file_name);
        let partial = self.directory.join(format!(".{}.part", file_name));
        trace!("Writing {} byte(s) to {}", output.len(), partial.display());

        let result = fs::File::create(&partial)
            .and_then(|mut f| { f.write_all(output.bytes())?; f.sync_all() })
            .and_then(|_| fs::rename(&partial, &path));
        if let Err(e) = result {
            if let Err(cleanup_err) = fs::remove_file(&partial) {
                if cleanup_err.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to remove partial file {}: {}", partial.display(), cleanup_err);
                }
            }
            return Err(e);
        }
        debug!("Saved {}", path.display());
        Ok(())
    }
}


/// System clipboard that can receive images.
pub trait Clipboard {
    /// Whether the clipboard can hold image data at all.
    fn supports_images(&self) -> bool {
        true
    }

    /// Put an image onto the clipboard.
    ///
    /// The image is provided both as raw pixels and as a PNG file,
    /// whichever the clipboard prefers.
    fn write_image(&mut self, pixels: &RgbaImage, png: &CaptionOutput) -> Result<(), Cause>;
}

/// Clipboard of an environment without image support.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn supports_images(&self) -> bool {
        false
    }

    fn write_image(&mut self, _: &RgbaImage, _: &CaptionOutput) -> Result<(), Cause> {
        Err("image clipboard is not available".into())
    }
}


/// Opens share intents, usually in a web browser.
pub trait ShareLauncher {
    fn open(&mut self, url: &str) -> Result<(), Cause>;
}


/// A download that was made recently.
#[derive(Clone)]
pub struct RecentExport {
    pub file_name: String,
    pub output: CaptionOutput,
    pub created_at: OffsetDateTime,
}

impl RecentExport {
    pub(crate) fn new(file_name: String, output: CaptionOutput) -> Self {
        RecentExport{file_name, output, created_at: OffsetDateTime::now_utc()}
    }
}

impl fmt::Debug for RecentExport {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("RecentExport")
            .field("file_name", &self.file_name)
            .field("size", &self.output.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use spectral::prelude::*;
    use tempfile::tempdir;

    use caption::output::{CaptionOutput, ExportFormat};
    use super::{file_name, share_url, DirectorySink, DownloadSink};

    #[test]
    fn file_names() {
        let name = file_name("grifts-meme", ExportFormat::Png);
        assert_that!(name.len()).is_equal_to("grifts-meme-".len() + 6 + ".png".len());
        assert!(name.starts_with("grifts-meme-"));
        assert!(name.ends_with(".png"));
        let suffix = &name["grifts-meme-".len()..name.len() - 4];
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));

        assert!(file_name("x", ExportFormat::Jpeg).ends_with(".jpg"));
    }

    #[test]
    fn share_url_is_encoded() {
        let url = share_url("Check out this meme I made with GRIFTS! 🔥",
                            "https://grifts.co.uk/viral/meme-captioner.html");
        assert_eq!(
            "https://twitter.com/intent/tweet\
             ?text=Check%20out%20this%20meme%20I%20made%20with%20GRIFTS%21%20%F0%9F%94%A5\
             &url=https%3A%2F%2Fgrifts.co.uk%2Fviral%2Fmeme-captioner.html",
            url);
    }

    #[test]
    fn directory_sink_writes_whole_file() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));
        let output = CaptionOutput::encode(&img, ExportFormat::Png, 90).unwrap();

        let mut sink = DirectorySink::new(dir.path());
        sink.save("meme.png", &output).unwrap();

        assert_eq!(output.bytes(), &fs::read(dir.path().join("meme.png")).unwrap()[..]);
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(1, entries);
    }

    #[test]
    fn directory_sink_failure_leaves_nothing() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::new(1, 1);
        let output = CaptionOutput::encode(&img, ExportFormat::Png, 90).unwrap();

        let mut sink = DirectorySink::new(dir.path().join("missing"));
        assert_that!(sink.save("meme.png", &output)).is_err();
        assert_eq!(0, fs::read_dir(dir.path()).unwrap().count());
    }
}
