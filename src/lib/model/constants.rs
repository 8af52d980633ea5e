//! Module defining constants relevant to the data model.

use super::types::Color;


/// Name of the default font.
pub const DEFAULT_FONT: &str = "Impact";

/// Default color of the text.
pub const DEFAULT_COLOR: Color = Color(0xff, 0xff, 0xff);
/// Default color of the text outline.
/// This should be the inversion of DEFAULT_COLOR.
pub const DEFAULT_OUTLINE_COLOR: Color = Color(0x0, 0x0, 0x0);

/// Default caption font size, in percent of the image height.
pub const DEFAULT_FONT_SIZE_PERCENT: f32 = 8.0;
/// Smallest allowed caption font size (% of image height).
pub const MIN_FONT_SIZE_PERCENT: f32 = 4.0;
/// Largest allowed caption font size (% of image height).
pub const MAX_FONT_SIZE_PERCENT: f32 = 20.0;

/// Default width of the caption outline, in percent of the image height.
pub const DEFAULT_OUTLINE_WIDTH_PERCENT: f32 = 0.8;
/// Largest allowed outline width (% of image height).
pub const MAX_OUTLINE_WIDTH_PERCENT: f32 = 3.0;

/// Default baseline of the top caption, in percent of image height from the top edge.
pub const DEFAULT_TOP_OFFSET_PERCENT: f32 = 10.0;
/// Default baseline of the bottom caption, in percent of image height from the bottom edge.
pub const DEFAULT_BOTTOM_OFFSET_PERCENT: f32 = 5.0;

/// Default quality of lossy exports, within [0, 1].
pub const DEFAULT_EXPORT_QUALITY: f32 = 0.9;

/// Gap between lines of a multi-line caption, as a fraction of the font size.
pub const LINE_GAP_RATIO: f32 = 0.1;


/// Text of the watermark stamped on exported memes.
pub const WATERMARK_TEXT: &str = "GRIFTS.CO.UK";
