//! Module with compositor configuration.

use std::time::Duration;

use model::WATERMARK_TEXT;
use super::super::output::ExportFormat;


/// Prefix of the names of downloaded files.
pub const DEFAULT_FILE_NAME_PREFIX: &str = "grifts-meme";
/// Text of the share intent.
pub const DEFAULT_SHARE_TEXT: &str = "Check out this meme I made with GRIFTS! 🔥";
/// Link back to the captioner, included in the share intent.
pub const DEFAULT_SHARE_LINK: &str = "https://grifts.co.uk/viral/meme-captioner.html";
/// Delay after the last text edit before the canvas is re-rendered.
pub const DEFAULT_TEXT_DEBOUNCE_MS: u64 = 150;
/// How many of the latest downloads are remembered.
pub const DEFAULT_RECENT_CAPACITY: usize = 3;


/// Structure holding configuration for the `Compositor`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Format of downloaded images.
    pub export_format: ExportFormat,
    /// Downloads are named `<prefix>-<random suffix>.<extension>`.
    pub file_name_prefix: String,
    /// Text stamped on the images when the watermark is enabled.
    pub watermark_text: String,
    pub share_text: String,
    pub share_link: String,
    pub text_debounce: Duration,
    pub recent_capacity: usize,
}

impl Default for Config {
    /// Initialize Config with default values.
    fn default() -> Self {
        Config{
            export_format: ExportFormat::default(),
            file_name_prefix: DEFAULT_FILE_NAME_PREFIX.into(),
            watermark_text: WATERMARK_TEXT.into(),
            share_text: DEFAULT_SHARE_TEXT.into(),
            share_link: DEFAULT_SHARE_LINK.into(),
            text_debounce: Duration::from_millis(DEFAULT_TEXT_DEBOUNCE_MS),
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }
}
