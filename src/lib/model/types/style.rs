//! Module implementing the `CaptionStyle` type and patches that modify it.

use std::error;
use std::fmt;

use model::constants::{DEFAULT_BOTTOM_OFFSET_PERCENT, DEFAULT_COLOR, DEFAULT_EXPORT_QUALITY,
                       DEFAULT_FONT, DEFAULT_FONT_SIZE_PERCENT, DEFAULT_OUTLINE_COLOR,
                       DEFAULT_OUTLINE_WIDTH_PERCENT, DEFAULT_TOP_OFFSET_PERCENT,
                       LINE_GAP_RATIO, MAX_FONT_SIZE_PERCENT, MAX_OUTLINE_WIDTH_PERCENT,
                       MIN_FONT_SIZE_PERCENT};
use super::color::Color;


/// Describes how captions are drawn over the image.
///
/// All sizes and offsets are given as percentages of the image *height*,
/// so that captions scale together with the image resolution.
///
/// A style is an immutable snapshot: modifications go through `StylePatch`
/// and `CaptionStyle::apply`, which validates the result.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionStyle {
    /// Name of the font family to render the captions with.
    pub font_family: String,
    /// Font size as percentage of image height.
    pub font_size_percent: f32,
    /// Width of the text outline as percentage of image height.
    pub outline_width_percent: f32,
    /// Fill color of the text. Defaults to white.
    pub text_color: Color,
    /// Color of the text outline. Defaults to black.
    pub outline_color: Color,
    /// Baseline of the top caption's first line, in % of height from the top edge.
    pub top_offset_percent: f32,
    /// Baseline of the bottom caption's last line, in % of height from the bottom edge.
    pub bottom_offset_percent: f32,
    /// Whether to stamp the watermark on the image.
    pub watermark: bool,
    /// Quality of lossy exports, within [0, 1].
    pub export_quality: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        CaptionStyle{
            font_family: DEFAULT_FONT.into(),
            font_size_percent: DEFAULT_FONT_SIZE_PERCENT,
            outline_width_percent: DEFAULT_OUTLINE_WIDTH_PERCENT,
            text_color: DEFAULT_COLOR,
            outline_color: DEFAULT_OUTLINE_COLOR,
            top_offset_percent: DEFAULT_TOP_OFFSET_PERCENT,
            bottom_offset_percent: DEFAULT_BOTTOM_OFFSET_PERCENT,
            watermark: true,
            export_quality: DEFAULT_EXPORT_QUALITY,
        }
    }
}

// Pixel metrics for a canvas of given height.
impl CaptionStyle {
    /// Font size in pixels for a canvas of given height.
    #[inline]
    pub fn font_size_px(&self, height: u32) -> f32 {
        self.font_size_percent * height as f32 / 100.0
    }

    /// Outline (stroke) width in pixels for a canvas of given height.
    #[inline]
    pub fn outline_width_px(&self, height: u32) -> f32 {
        self.outline_width_percent * height as f32 / 100.0
    }

    /// Distance between baselines of consecutive caption lines, in pixels.
    #[inline]
    pub fn line_advance_px(&self, height: u32) -> f32 {
        let size = self.font_size_px(height);
        size + size * LINE_GAP_RATIO
    }

    /// Y coordinate of the top caption's first baseline.
    #[inline]
    pub fn top_baseline_px(&self, height: u32) -> f32 {
        height as f32 * self.top_offset_percent / 100.0
    }

    /// Y coordinate of the bottom caption's last baseline.
    #[inline]
    pub fn bottom_baseline_px(&self, height: u32) -> f32 {
        height as f32 * (100.0 - self.bottom_offset_percent) / 100.0
    }

    /// JPEG quality (1-100) corresponding to `export_quality`.
    #[inline]
    pub fn jpeg_quality(&self) -> u8 {
        let q = (self.export_quality * 100.0).round() as i32;
        q.max(1).min(100) as u8
    }
}

impl CaptionStyle {
    /// Produce a new style with the changes from given patch applied.
    ///
    /// The original style is left untouched, also when the result is invalid.
    pub fn apply(&self, patch: &StylePatch) -> Result<CaptionStyle, Error> {
        let mut result = self.clone();

        macro_rules! patch_field {
            ($name:ident) => (
                if let Some(ref value) = patch.$name {
                    result.$name = value.clone();
                }
            );
        }
        patch_field!(font_family);
        patch_field!(font_size_percent);
        patch_field!(outline_width_percent);
        patch_field!(text_color);
        patch_field!(outline_color);
        patch_field!(top_offset_percent);
        patch_field!(bottom_offset_percent);
        patch_field!(watermark);
        patch_field!(export_quality);

        result.validate()?;
        Ok(result)
    }

    /// Check that all the values of the style are within their allowed ranges.
    pub fn validate(&self) -> Result<(), Error> {
        if self.font_family.trim().is_empty() {
            return Err(Error::NoFontFamily);
        }
        check_range("font size", self.font_size_percent,
            MIN_FONT_SIZE_PERCENT, MAX_FONT_SIZE_PERCENT)?;
        check_range("outline width", self.outline_width_percent,
            0.0, MAX_OUTLINE_WIDTH_PERCENT)?;
        check_range("top offset", self.top_offset_percent, 0.0, 100.0)?;
        check_range("bottom offset", self.bottom_offset_percent, 0.0, 100.0)?;
        check_range("export quality", self.export_quality, 0.0, 1.0)?;
        Ok(())
    }
}

fn check_range(what: &'static str, value: f32, min: f32, max: f32) -> Result<(), Error> {
    // Written so that NaN fails the check as well.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(Error::OutOfRange{what, value, min, max})
    }
}


/// Set of changes to apply to a `CaptionStyle`.
///
/// Only the fields that are set are modified.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[must_use = "unused style patch which must be applied"]
pub struct StylePatch {
    pub font_family: Option<String>,
    pub font_size_percent: Option<f32>,
    pub outline_width_percent: Option<f32>,
    pub text_color: Option<Color>,
    pub outline_color: Option<Color>,
    pub top_offset_percent: Option<f32>,
    pub bottom_offset_percent: Option<f32>,
    pub watermark: Option<bool>,
    pub export_quality: Option<f32>,
}

impl StylePatch {
    /// Create an empty patch.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch which restores the default caption positions.
    #[inline]
    pub fn reset_positions() -> Self {
        StylePatch::new()
            .top_offset(DEFAULT_TOP_OFFSET_PERCENT)
            .bottom_offset(DEFAULT_BOTTOM_OFFSET_PERCENT)
    }

    /// Whether the patch changes anything at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == StylePatch::default()
    }
}

// Setters.
impl StylePatch {
    #[inline]
    pub fn font_family<S: Into<String>>(mut self, family: S) -> Self {
        self.font_family = Some(family.into()); self
    }

    #[inline]
    pub fn font_size(mut self, percent: f32) -> Self {
        self.font_size_percent = Some(percent); self
    }

    #[inline]
    pub fn outline_width(mut self, percent: f32) -> Self {
        self.outline_width_percent = Some(percent); self
    }

    #[inline]
    pub fn text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color); self
    }

    #[inline]
    pub fn outline_color(mut self, color: Color) -> Self {
        self.outline_color = Some(color); self
    }

    #[inline]
    pub fn top_offset(mut self, percent: f32) -> Self {
        self.top_offset_percent = Some(percent); self
    }

    #[inline]
    pub fn bottom_offset(mut self, percent: f32) -> Self {
        self.bottom_offset_percent = Some(percent); self
    }

    #[inline]
    pub fn watermark(mut self, enabled: bool) -> Self {
        self.watermark = Some(enabled); self
    }

    #[inline]
    pub fn export_quality(mut self, quality: f32) -> Self {
        self.export_quality = Some(quality); self
    }
}


/// Error for a `CaptionStyle` with invalid values.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Empty font family name.
    NoFontFamily,
    /// A numeric parameter outside of its allowed range.
    OutOfRange{what: &'static str, value: f32, min: f32, max: f32},
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoFontFamily => write!(fmt, "no font family chosen"),
            Error::OutOfRange{what, value, min, max} =>
                write!(fmt, "{} out of range: {} not in [{}, {}]", what, value, min, max),
        }
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use model::Color;
    use super::{CaptionStyle, Error, StylePatch};

    #[test]
    fn default_is_valid() {
        assert_that!(CaptionStyle::default().validate()).is_ok();
    }

    #[test]
    fn pixel_metrics_scale_with_height() {
        let style = CaptionStyle::default().apply(&StylePatch::new().font_size(10.0)).unwrap();
        assert_eq!(40.0, style.font_size_px(400));
        assert_eq!(80.0, style.font_size_px(800));
        assert_eq!(2.0 * style.outline_width_px(300), style.outline_width_px(600));
        assert_eq!(40.0, style.top_baseline_px(400));
        assert_eq!(380.0, style.bottom_baseline_px(400));
    }

    #[test]
    fn apply_only_touches_patched_fields() {
        let style = CaptionStyle::default();
        let patched = style.apply(&StylePatch::new()
            .text_color(Color(1, 2, 3))
            .watermark(false)).unwrap();
        assert_eq!(Color(1, 2, 3), patched.text_color);
        assert!(!patched.watermark);
        assert_eq!(style.font_size_percent, patched.font_size_percent);
        assert_eq!(style.outline_color, patched.outline_color);
    }

    #[test]
    fn apply_rejects_out_of_range() {
        let style = CaptionStyle::default();
        assert_that!(style.apply(&StylePatch::new().font_size(50.0))).is_err();
        assert_that!(style.apply(&StylePatch::new().font_size(1.0))).is_err();
        assert_that!(style.apply(&StylePatch::new().export_quality(1.5))).is_err();
        assert_that!(style.apply(&StylePatch::new().top_offset(-1.0))).is_err();
        assert_that!(style.apply(&StylePatch::new().outline_width(::std::f32::NAN))).is_err();
        assert_that!(style.apply(&StylePatch::new().font_family("  ")))
            .is_err().is_equal_to(Error::NoFontFamily);
    }

    #[test]
    fn reset_positions() {
        let moved = CaptionStyle::default()
            .apply(&StylePatch::new().top_offset(30.0).bottom_offset(40.0)).unwrap();
        let reset = moved.apply(&StylePatch::reset_positions()).unwrap();
        assert_eq!(CaptionStyle::default(), reset);
    }

    #[test]
    fn jpeg_quality() {
        let style = CaptionStyle::default();
        assert_eq!(90, style.jpeg_quality());
        let zero = style.apply(&StylePatch::new().export_quality(0.0)).unwrap();
        assert_eq!(1, zero.jpeg_quality());
    }
}
