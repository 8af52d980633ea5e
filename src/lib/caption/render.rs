//! Module implementing the rendering of the captioned canvas.
//! All the drawing logic lives here.

use image::RgbaImage;
use rusttype::point;

use model::{CaptionContent, CaptionStyle, Color, Slot};
use resources::Font;
use util::text::{self, HAlign, Style, TextError};
use super::error::CaptionError;
use super::source::SourceImage;
use super::state::CompositorState;


/// Opacity of the watermark text.
pub const WATERMARK_OPACITY: f32 = 0.4;
/// Font size of the watermark, as a fraction of canvas height.
pub const WATERMARK_SIZE_RATIO: f32 = 0.02;
/// Distance of the watermark from the right & bottom edges,
/// as a fraction of canvas width & height respectively.
pub const WATERMARK_MARGIN_RATIO: f32 = 0.015;

/// Size of the canvas shown while no image is loaded.
pub const PLACEHOLDER_SIZE: (u32, u32) = (800, 600);
pub const PLACEHOLDER_BACKGROUND: Color = Color(0x1a, 0x1a, 0x1a);
pub const PLACEHOLDER_TEXT: &str = "Upload an image or select a template";
const PLACEHOLDER_TEXT_COLOR: Color = Color(0x99, 0x99, 0x99);
const PLACEHOLDER_FONT_SIZE: f32 = 24.0;


/// Render the canvas for given state.
///
/// Without a loaded image, this is the placeholder canvas.
pub fn render(state: &CompositorState, font: &Font,
              watermark: &str) -> Result<RgbaImage, CaptionError> {
    match state.source() {
        Some(source) => render_captioned(source, state.style(), state.content(), font, watermark),
        None => Ok(render_placeholder(font)),
    }
}

/// Render the source image with captions (and watermark, if enabled) drawn over it.
///
/// The drawing happens on a fresh copy of the source pixels,
/// so the result never includes anything from previous renders.
pub fn render_captioned(source: &SourceImage, style: &CaptionStyle, content: &CaptionContent,
                        font: &Font, watermark: &str) -> Result<RgbaImage, CaptionError> {
    debug!("Rendering {:?} over {:?}", content, source);
    let mut canvas = source.pixels().clone();

    for &slot in [Slot::Top, Slot::Bottom].iter() {
        let lines = content.lines(slot);
        if lines.is_empty() {
            trace!("Empty {:?} caption, skipping.", slot);
            continue;
        }
        draw_caption(&mut canvas, slot, &lines, style, font)?;
    }

    if style.watermark {
        if let Err(e) = draw_watermark(&mut canvas, watermark, font) {
            warn!("Failed to draw the watermark: {}", e);
        }
    }
    Ok(canvas)
}

/// Render the canvas shown when no image is loaded.
pub fn render_placeholder(font: &Font) -> RgbaImage {
    let (width, height) = PLACEHOLDER_SIZE;
    let mut canvas = RgbaImage::from_pixel(width, height, PLACEHOLDER_BACKGROUND.into());
    let style = Style::new(font, PLACEHOLDER_FONT_SIZE, PLACEHOLDER_TEXT_COLOR);
    let anchor = point(width as f32 / 2.0, height as f32 / 2.0);
    if let Err(e) = text::render_line(&mut canvas, PLACEHOLDER_TEXT, HAlign::Center, anchor, &style) {
        warn!("Failed to draw the placeholder text: {}", e);
    }
    canvas
}


/// Draw lines of a single caption, stacked from the caption's anchor baseline.
///
/// The top caption grows downwards from its first line,
/// while the bottom caption grows upwards from its last line.
fn draw_caption(canvas: &mut RgbaImage, slot: Slot, lines: &[String],
                style: &CaptionStyle, font: &Font) -> Result<(), CaptionError> {
    let (width, height) = canvas.dimensions();
    let size = style.font_size_px(height);
    let advance = style.line_advance_px(height);
    let outline = style.outline_width_px(height);
    trace!("{:?} caption: {} line(s) at {}px with {}px outline", slot, lines.len(), size, outline);

    let text_style = Style::new(font, size, style.text_color)
        .outline(style.outline_color, outline);
    let x = width as f32 / 2.0;
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        let baseline = match slot {
            Slot::Top => style.top_baseline_px(height) + i as f32 * advance,
            Slot::Bottom => style.bottom_baseline_px(height) - (last - i) as f32 * advance,
        };
        if line.trim().is_empty() {
            continue;
        }
        text::check(font, line);
        text::render_line(canvas, line, HAlign::Center, point(x, baseline), &text_style)?;
    }
    Ok(())
}

/// Draw the watermark in the bottom right corner.
fn draw_watermark(canvas: &mut RgbaImage, watermark: &str, font: &Font) -> Result<(), TextError> {
    if watermark.trim().is_empty() {
        return Ok(());
    }
    let (width, height) = canvas.dimensions();
    let (width, height) = (width as f32, height as f32);
    let anchor = point(width - width * WATERMARK_MARGIN_RATIO,
                       height - height * WATERMARK_MARGIN_RATIO);
    let style = Style::new(font, height * WATERMARK_SIZE_RATIO, Color::white())
        .opacity(WATERMARK_OPACITY);
    trace!("Drawing watermark {:?} at {:?}", watermark, anchor);
    text::render_line(canvas, watermark, HAlign::Right, anchor, &style)
}


#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use spectral::prelude::*;

    use caption::source::SourceImage;
    use caption::state::CompositorState;
    use model::{CaptionContent, CaptionStyle, StylePatch};
    use resources::Font;
    use super::{render, render_captioned, PLACEHOLDER_SIZE};

    const BACKGROUND: Rgba<u8> = Rgba([0x20, 0x40, 0x60, 0xff]);

    fn source(width: u32, height: u32) -> SourceImage {
        SourceImage::from_pixels("solid", RgbaImage::from_pixel(width, height, BACKGROUND)).unwrap()
    }

    fn style(patch: StylePatch) -> CaptionStyle {
        CaptionStyle::default().apply(&patch).unwrap()
    }

    fn ink_rows(img: &RgbaImage) -> Vec<u32> {
        let mut rows: Vec<u32> = img.enumerate_pixels()
            .filter(|&(_, _, p)| *p != BACKGROUND)
            .map(|(_, y, _)| y)
            .collect();
        rows.dedup();
        rows
    }

    #[test]
    fn placeholder_without_image() {
        let canvas = render(&CompositorState::default(), &Font::Block, "WM").unwrap();
        assert_eq!(PLACEHOLDER_SIZE, canvas.dimensions());
        assert_eq!(&Rgba([0x1a, 0x1a, 0x1a, 0xff]), canvas.get_pixel(0, 0));
    }

    #[test]
    fn canvas_has_source_dimensions() {
        let style = style(StylePatch::new());
        let canvas = render_captioned(&source(321, 123), &style,
            &CaptionContent::new("top", "bottom"), &Font::Block, "WM").unwrap();
        assert_eq!((321, 123), canvas.dimensions());
    }

    #[test]
    fn blank_captions_leave_image_untouched() {
        let style = style(StylePatch::new().watermark(false));
        let img = source(100, 100);
        let canvas = render_captioned(&img, &style,
            &CaptionContent::new("  ", "\n"), &Font::Block, "WM").unwrap();
        assert_eq!(img.pixels(), &canvas);
    }

    #[test]
    fn multiline_bottom_caption_grows_upwards() {
        let style = style(StylePatch::new().font_size(10.0).outline_width(0.0).watermark(false));
        let canvas = render_captioned(&source(400, 400), &style,
            &CaptionContent::new("", "ONE\nTWO"), &Font::Block, "").unwrap();

        // Last baseline at 380, the one above at 380 - 44.
        let rows = ink_rows(&canvas);
        assert_that!(rows.first().cloned()).is_some().is_equal_to(336 - 35);
        assert_that!(rows.last().cloned()).is_some().is_equal_to(379);
    }

    #[test]
    fn watermark_in_bottom_right_corner() {
        let style = style(StylePatch::new().watermark(true));
        let canvas = render_captioned(&source(400, 400), &style,
            &CaptionContent::default(), &Font::Block, "GRIFTS.CO.UK").unwrap();

        let inked: Vec<(u32, u32)> = canvas.enumerate_pixels()
            .filter(|&(_, _, p)| *p != BACKGROUND)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        for (x, y) in inked {
            assert_that!(x).is_greater_than(300);
            assert_that!(x).is_less_than(394);
            assert_that!(y).is_greater_than(380);
            assert_that!(y).is_less_than(394);
        }
    }

    #[test]
    fn long_caption_on_tall_image() {
        let style = style(StylePatch::new().font_size(20.0).outline_width(0.0).watermark(false));
        let content = CaptionContent::new("A".repeat(1700), "");
        let canvas = render_captioned(&source(10, 10_000), &style, &content, &Font::Block, "")
            .unwrap();
        assert_eq!((10, 10_000), canvas.dimensions());
    }
}
