//! Module responsible for rendering text.
//!
//! Text is first rasterized into a coverage `Mask` in canvas coordinates.
//! The outline is the mask grown outward by half of the stroke width,
//! blended before the mask itself is blended with the fill color.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use image::{Pixel, RgbaImage};
use itertools::Itertools;
use rusttype::{point, GlyphId, Point, Rect, Scale};

use model::Color;
use resources::Font;
use super::block_font::{self, EM_SIZE, GLYPH_ADVANCE, GLYPH_ROWS};


/// Check if given font has all the glyphs for given text.
pub fn check(font: &Font, text: &str) {
    let missing: HashSet<char> = match *font {
        Font::Outline{ref font, ..} => text.chars()
            .filter(|c| !c.is_whitespace())
            .filter(|&c| font.glyph(c).id() == GlyphId(0))
            .collect(),
        Font::Block => text.chars()
            .filter(|&c| block_font::resolve(c) == block_font::MISSING_GLYPH)
            .collect(),
    };
    if !missing.is_empty() {
        warn!("Font `{}` is missing glyphs for {} codepoint(s): {}",
            font.name(), missing.len(),
            missing.into_iter().map(|c| format!("{:#x}", c as u32)).sorted().join(", "));
    }
}


/// Horizontal alignment of a line of text relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HAlign {
    Left,
    Center,
    Right,
}


/// Style that the text is rendered with.
pub struct Style<'f> {
    font: &'f Font,
    size: f32,
    color: Color,
    opacity: f32,
    outline: Option<(Color, f32)>,
}

impl<'f> Style<'f> {
    #[inline]
    pub fn new(font: &'f Font, size: f32, color: Color) -> Self {
        Style{font, size, color, opacity: 1.0, outline: None}
    }

    /// Render the text semi-transparent.
    #[inline]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.max(0.0).min(1.0); self
    }

    /// Stroke the text with an outline of given color & width (in pixels).
    #[inline]
    pub fn outline(mut self, color: Color, width: f32) -> Self {
        self.outline = if width > 0.0 { Some((color, width)) } else { None }; self
    }

    #[inline]
    pub fn font(&self) -> &Font {
        self.font
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }
}

impl<'f> fmt::Debug for Style<'f> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Style")
            .field("font", &self.font.name())
            .field("size", &self.size)
            .field("color", &self.color)
            .field("opacity", &self.opacity)
            .field("outline", &self.outline)
            .finish()
    }
}


/// Renders a line of text onto given image.
///
/// The line is anchored at `anchor`: its x coordinate is interpreted
/// according to `align`, while y is the baseline.
/// Parts of the text that fall outside of the image are clipped.
pub fn render_line(img: &mut RgbaImage, s: &str, align: HAlign,
                   anchor: Point<f32>, style: &Style) -> Result<(), TextError> {
    trace!("render_line(..., {:?}, {:?}, {:?}, {:?})", s, align, anchor, style);
    if !(style.size > 0.0) || !style.size.is_finite() {
        return Err(TextError::InvalidSize(style.size));
    }

    let mut origin = anchor;
    match align {
        HAlign::Left => {}
        HAlign::Center => origin.x -= text_width(s, style.font, style.size) / 2.0,
        HAlign::Right => origin.x -= text_width(s, style.font, style.size),
    }

    // Only the canvas and the margin the outline can reach from it get rasterized.
    let pad = style.outline.map(|(_, width)| (width / 2.0).ceil() as i32 + 1).unwrap_or(0);
    let (width, height) = img.dimensions();
    let clip = Rect{
        min: point(-pad, -pad),
        max: point(width as i32 + pad, height as i32 + pad),
    };

    let mask = rasterize_line(s, style.font, style.size, origin, clip)?;
    if let Some((color, width)) = style.outline {
        mask.dilate(width / 2.0)?.blend_onto(img, color, style.opacity);
    }
    mask.blend_onto(img, style.color, style.opacity);
    Ok(())
}


/// Compute the advance width of a line of text.
pub fn text_width(s: &str, font: &Font, size: f32) -> f32 {
    match *font {
        Font::Outline{ref font, ..} => {
            font.layout(s, Scale::uniform(size), point(0.0, 0.0))
                .last()
                .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0)
        }
        Font::Block => {
            let count = s.chars().count() as f32;
            let dot = size / EM_SIZE as f32;
            if count > 0.0 { count * GLYPH_ADVANCE as f32 * dot - dot } else { 0.0 }
        }
    }
}

/// Distance between the baseline and the top of the tallest glyphs.
pub fn ascent(font: &Font, size: f32) -> f32 {
    match *font {
        Font::Outline{ref font, ..} => font.v_metrics(Scale::uniform(size)).ascent,
        Font::Block => GLYPH_ROWS as f32 * size / EM_SIZE as f32,
    }
}

/// Rasterize the part of a line of text that falls within `clip`.
///
/// The first glyph starts at `origin.x` and sits on the baseline at `origin.y`.
pub fn rasterize_line(s: &str, font: &Font, size: f32, origin: Point<f32>,
                      clip: Rect<i32>) -> Result<Mask, TextError> {
    match *font {
        Font::Outline{ref font, ..} => {
            let glyphs: Vec<_> = font.layout(s, Scale::uniform(size), origin)
                .filter_map(|g| g.pixel_bounding_box()
                    .and_then(|bbox| intersect(bbox, clip))
                    .map(|visible| (g, visible)))
                .collect();
            let bounds = glyphs.iter()
                .map(|&(_, visible)| visible)
                .reduce(|a, b| Rect{
                    min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
                    max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
                });
            let bounds = match bounds {
                Some(b) => b,
                None => return Mask::new(origin.x as i32, origin.y as i32, 0, 0),
            };

            let mut mask = Mask::new(bounds.min.x, bounds.min.y,
                bounds.width() as u32, bounds.height() as u32)?;
            for &(ref glyph, _) in &glyphs {
                if let Some(bbox) = glyph.pixel_bounding_box() {
                    glyph.draw(|x, y, v| {
                        mask.put(bbox.min.x + x as i32, bbox.min.y + y as i32, v);
                    });
                }
            }
            Ok(mask)
        }
        Font::Block => {
            let dot = size / EM_SIZE as f32;
            let cell = GLYPH_ADVANCE as f32 * dot;
            let glyph_top = origin.y - GLYPH_ROWS as f32 * dot;

            let left = (origin.x.floor() as i32).max(clip.min.x);
            let right = ((origin.x + text_width(s, font, size)).ceil() as i32).min(clip.max.x);
            let top = (glyph_top.floor() as i32).max(clip.min.y);
            let bottom = (origin.y.ceil() as i32).min(clip.max.y);
            let mut mask = Mask::new(left, top,
                (right - left).max(0) as u32, (bottom - top).max(0) as u32)?;
            if mask.data.is_empty() {
                return Ok(mask);
            }

            let glyphs: Vec<_> = s.chars().map(block_font::resolve).collect();
            // A pixel is inked when its center falls into a lit dot.
            for y in top..bottom {
                let dy = y as f32 + 0.5 - glyph_top;
                if dy < 0.0 {
                    continue;
                }
                let row = (dy / dot) as u32;
                for x in left..right {
                    let dx = x as f32 + 0.5 - origin.x;
                    if dx < 0.0 {
                        continue;
                    }
                    let index = (dx / cell) as usize;
                    if let Some(glyph) = glyphs.get(index) {
                        let column = ((dx - index as f32 * cell) / dot) as u32;
                        if block_font::is_lit(glyph, column, row) {
                            mask.put(x, y, 1.0);
                        }
                    }
                }
            }
            Ok(mask)
        }
    }
}

fn intersect(a: Rect<i32>, b: Rect<i32>) -> Option<Rect<i32>> {
    let result = Rect{
        min: point(a.min.x.max(b.min.x), a.min.y.max(b.min.y)),
        max: point(a.max.x.min(b.max.x), a.max.y.min(b.max.y)),
    };
    if result.min.x < result.max.x && result.min.y < result.max.y { Some(result) } else { None }
}


/// Largest mask that will be allocated, in pixels.
const MAX_MASK_PIXELS: usize = 1 << 28;

/// Coverage of rendered text over a rectangular area of the canvas.
///
/// Coverage values are within [0, 1]; pixels outside of the area have none.
#[derive(Clone, PartialEq)]
pub struct Mask {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Mask {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Result<Self, TextError> {
        let len = (width as usize).checked_mul(height as usize)
            .filter(|&len| len <= MAX_MASK_PIXELS)
            .ok_or(TextError::TooLarge(width, height))?;
        Ok(Mask{left, top, width, height, data: vec![0.0; len]})
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (col, row) = (x as i64 - self.left as i64, y as i64 - self.top as i64);
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Coverage of the pixel at given canvas coordinates.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map(|i| self.data[i]).unwrap_or(0.0)
    }

    /// Add coverage to a pixel. Overlapping coverage doesn't accumulate.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, coverage: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = self.data[i].max(coverage.min(1.0));
        }
    }

    /// Bounding box of the pixels with any coverage (max is exclusive).
    pub fn ink_bounds(&self) -> Option<Rect<i32>> {
        let width = self.width as usize;
        self.data.iter().enumerate()
            .filter(|&(_, &v)| v > 0.0)
            .map(|(i, _)| (self.left + (i % width) as i32, self.top + (i / width) as i32))
            .fold(None, |acc: Option<Rect<i32>>, (x, y)| Some(match acc {
                None => Rect{min: point(x, y), max: point(x + 1, y + 1)},
                Some(r) => Rect{
                    min: point(r.min.x.min(x), r.min.y.min(y)),
                    max: point(r.max.x.max(x + 1), r.max.y.max(y + 1)),
                },
            }))
    }

    /// Grow the inked area outward by given radius (in pixels).
    ///
    /// Whole pixels of the radius alternate between square and cross shaped
    /// steps, which approximates a round brush. A fractional remainder
    /// is applied as partial coverage of one more step.
    pub fn dilate(&self, radius: f32) -> Result<Mask, TextError> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Ok(self.clone());
        }
        let whole = radius.floor() as u32;
        let fraction = radius - whole as f32;
        let pad = whole + if fraction > 0.0 { 1 } else { 0 };

        let mut result = self.padded(pad)?;
        for step in 0..whole {
            result = result.grown(step % 2 == 0);
        }
        if fraction > 0.0 {
            let grown = result.grown(whole % 2 == 0);
            for (v, g) in result.data.iter_mut().zip(grown.data) {
                *v += (g - *v) * fraction;
            }
        }
        Ok(result)
    }

    fn padded(&self, pad: u32) -> Result<Mask, TextError> {
        let too_large = || TextError::TooLarge(self.width, self.height);
        let grow = |n: u32| pad.checked_mul(2).and_then(|p| n.checked_add(p)).ok_or_else(too_large);
        let mut result = Mask::new(self.left.saturating_sub(pad as i32),
                                   self.top.saturating_sub(pad as i32),
                                   grow(self.width)?, grow(self.height)?)?;
        let (width, pad) = (self.width as usize, pad as usize);
        for row in 0..self.height as usize {
            let src = row * width;
            let dest = (row + pad) * result.width as usize + pad;
            result.data[dest..dest + width].copy_from_slice(&self.data[src..src + width]);
        }
        Ok(result)
    }

    /// One step of growth by a pixel, within the current bounds.
    fn grown(&self, square: bool) -> Mask {
        let (width, height) = (self.width as usize, self.height as usize);
        let mut data = self.data.clone();
        for row in 0..height {
            let rows = row.saturating_sub(1)..(row + 2).min(height);
            for col in 0..width {
                let mut value = self.data[row * width + col];
                for r in rows.clone() {
                    for c in col.saturating_sub(1)..(col + 2).min(width) {
                        if !square && r != row && c != col {
                            continue;
                        }
                        value = value.max(self.data[r * width + c]);
                    }
                }
                data[row * width + col] = value;
            }
        }
        Mask{data, ..*self}
    }

    /// Blend given color onto the image wherever the mask has coverage.
    ///
    /// Pixels without coverage are left untouched.
    pub fn blend_onto(&self, img: &mut RgbaImage, color: Color, opacity: f32) {
        let (img_width, img_height) = img.dimensions();
        let width = self.width as usize;
        for row in 0..self.height as usize {
            let y = self.top as i64 + row as i64;
            if y < 0 || y >= img_height as i64 {
                continue;
            }
            for col in 0..width {
                let x = self.left as i64 + col as i64;
                if x < 0 || x >= img_width as i64 {
                    continue;
                }
                let coverage = self.data[row * width + col];
                let alpha = (coverage * opacity * 255.0).round();
                if alpha < 1.0 {
                    continue;
                }
                img.get_pixel_mut(x as u32, y as u32).blend(&color.to_rgba(alpha.min(255.0) as u8));
            }
        }
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Mask{{{}x{} at ({}, {})}}", self.width, self.height, self.left, self.top)
    }
}


/// Error while rendering text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextError {
    /// Font size that cannot be rendered at.
    InvalidSize(f32),
    /// Text area too big to rasterize, as width & height in pixels.
    TooLarge(u32, u32),
}

impl Error for TextError {}

impl fmt::Display for TextError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TextError::InvalidSize(size) => write!(fmt, "invalid font size: {}px", size),
            TextError::TooLarge(width, height) =>
                write!(fmt, "text area of {}x{}px is too large to render", width, height),
        }
    }
}


#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use rusttype::{point, Rect};
    use spectral::prelude::*;

    use model::Color;
    use resources::Font;
    use super::{check, render_line, rasterize_line, text_width,
                HAlign, Mask, Style, TextError};

    const GRAY: Rgba<u8> = Rgba([0x80, 0x80, 0x80, 255]);

    fn everywhere() -> Rect<i32> {
        Rect{min: point(-1000, -1000), max: point(1000, 1000)}
    }

    fn dejavu() -> Font {
        let bytes = include_bytes!("../tests/data/DejaVuSans-Bold.ttf");
        Font::from_bytes("DejaVuSans-Bold", bytes.to_vec()).unwrap()
    }

    /// Horizontal middle of the pixels that differ from the background.
    fn ink_center(img: &RgbaImage, background: Rgba<u8>) -> f32 {
        let xs: Vec<u32> = img.enumerate_pixels()
            .filter(|&(_, _, p)| *p != background)
            .map(|(x, _, _)| x)
            .collect();
        let min = *xs.iter().min().unwrap() as f32;
        let max = *xs.iter().max().unwrap() as f32 + 1.0;
        (min + max) / 2.0
    }

    #[test]
    fn block_width() {
        assert_eq!(0.0, text_width("", &Font::Block, 40.0));
        // 5 px dots, each glyph 6 dots wide save for the trailing gap.
        assert_eq!(25.0, text_width("I", &Font::Block, 40.0));
        assert_eq!(55.0, text_width("HI", &Font::Block, 40.0));
    }

    #[test]
    fn block_glyph_sits_on_baseline() {
        let mask = rasterize_line("H", &Font::Block, 40.0, point(10.0, 50.0), everywhere()).unwrap();
        let bounds = mask.ink_bounds().unwrap();
        assert_eq!(point(10, 15), bounds.min);
        assert_eq!(point(35, 50), bounds.max);
    }

    #[test]
    fn blank_line_has_no_ink() {
        let mask = rasterize_line("   ", &Font::Block, 40.0, point(0.0, 50.0), everywhere()).unwrap();
        assert!(mask.ink_bounds().is_none());
    }

    #[test]
    fn dilate_whole_pixels() {
        let mut mask = Mask::new(0, 0, 1, 1).unwrap();
        mask.put(0, 0, 1.0);
        let grown = mask.dilate(2.0).unwrap();
        // Square step, then a cross step.
        assert_eq!(1.0, grown.get(2, 0));
        assert_eq!(1.0, grown.get(1, 1));
        assert_eq!(1.0, grown.get(2, 1));
        assert_eq!(0.0, grown.get(2, 2));
        assert_eq!(0.0, grown.get(3, 0));
    }

    #[test]
    fn dilate_fraction() {
        let mut mask = Mask::new(0, 0, 1, 1).unwrap();
        mask.put(0, 0, 1.0);
        let grown = mask.dilate(0.5).unwrap();
        assert_eq!(1.0, grown.get(0, 0));
        assert_eq!(0.5, grown.get(1, 1));
        assert_eq!(0.5, grown.get(-1, 0));
    }

    #[test]
    fn oversized_mask() {
        assert_that!(Mask::new(0, 0, u32::max_value(), u32::max_value()))
            .is_err().is_equal_to(TextError::TooLarge(u32::max_value(), u32::max_value()));
        assert_that!(Mask::new(0, 0, 0, u32::max_value())).is_ok();
    }

    #[test]
    fn rasterizing_is_clipped() {
        let clip = Rect{min: point(0, 0), max: point(10, 100)};
        let line = "A".repeat(2000);
        for font in vec![Font::Block, dejavu()] {
            let mask = rasterize_line(&line, &font, 400.0, point(-50_000.0, 60.0), clip).unwrap();
            assert!(mask.left >= 0 && mask.top >= 0);
            assert!(mask.width <= 10 && mask.height <= 100);
        }
    }

    #[test]
    fn long_line_on_narrow_tall_image() {
        let mut img = RgbaImage::from_pixel(10, 10_000, GRAY);
        let line = "A".repeat(1700);
        for font in vec![Font::Block, dejavu()] {
            let style = Style::new(&font, 2000.0, Color::white()).outline(Color::black(), 20.0);
            assert_that!(render_line(&mut img, &line, HAlign::Center, point(5.0, 1000.0), &style))
                .is_ok();
        }
    }

    #[test]
    fn centered_line() {
        let mut img = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));
        let font = Font::Block;
        let style = Style::new(&font, 40.0, Color::white());
        render_line(&mut img, "HIH", HAlign::Center, point(100.0, 60.0), &style).unwrap();
        assert_that!(ink_center(&img, Rgba([0, 0, 0, 255]))).is_close_to(100.0, 1.0);
    }

    #[test]
    fn outline_surrounds_fill() {
        let mut img = RgbaImage::from_pixel(100, 100, GRAY);
        let font = Font::Block;
        let style = Style::new(&font, 40.0, Color::white()).outline(Color::black(), 4.0);
        render_line(&mut img, "I", HAlign::Left, point(20.0, 60.0), &style).unwrap();

        // "I" has its top bar spanning x in [25, 40) and y in [25, 30).
        assert_eq!(&Rgba([255, 255, 255, 255]), img.get_pixel(27, 27));
        assert_eq!(&Rgba([0, 0, 0, 255]), img.get_pixel(27, 23));
        assert_eq!(&GRAY, img.get_pixel(27, 10));
    }

    #[test]
    fn truetype_width() {
        let font = dejavu();
        assert_eq!(0.0, text_width("", &font, 40.0));
        let one = text_width("H", &font, 40.0);
        assert_that!(one).is_greater_than(10.0);
        assert_that!(text_width("HH", &font, 40.0)).is_close_to(2.0 * one, 1.0);
        assert_that!(text_width("H", &font, 80.0)).is_close_to(2.0 * one, 1.0);
    }

    #[test]
    fn truetype_centered_line() {
        let mut img = RgbaImage::from_pixel(300, 100, GRAY);
        let font = dejavu();
        let style = Style::new(&font, 40.0, Color::white());
        render_line(&mut img, "HIH", HAlign::Center, point(150.0, 60.0), &style).unwrap();
        assert_that!(ink_center(&img, GRAY)).is_close_to(150.0, 2.0);
    }

    #[test]
    fn truetype_outline_surrounds_fill() {
        let mut img = RgbaImage::from_pixel(200, 100, GRAY);
        let font = dejavu();
        let style = Style::new(&font, 60.0, Color::white()).outline(Color::black(), 6.0);
        render_line(&mut img, "I", HAlign::Center, point(100.0, 80.0), &style).unwrap();

        // Middle row of the stem: fill inside, outline right next to it on both sides.
        let y = 60;
        let white: Vec<u32> = (0..200)
            .filter(|&x| img.get_pixel(x, y)[0] >= 250)
            .collect();
        assert!(!white.is_empty());
        let (left, right) = (white[0], *white.last().unwrap());
        assert_that!(img.get_pixel(left - 2, y)[0]).is_less_than_or_equal_to(5);
        assert_that!(img.get_pixel(right + 2, y)[0]).is_less_than_or_equal_to(5);
        assert_eq!(&GRAY, img.get_pixel(left - 10, y));
        assert_eq!(&GRAY, img.get_pixel(right + 10, y));
    }

    #[test]
    fn truetype_missing_glyph() {
        let mut img = RgbaImage::from_pixel(200, 100, GRAY);
        let font = dejavu();
        let text = "a\u{10FFFD}b";
        check(&font, text);
        let style = Style::new(&font, 40.0, Color::white());
        assert_that!(render_line(&mut img, text, HAlign::Center, point(100.0, 60.0), &style))
            .is_ok();
        assert!(img.pixels().any(|p| *p != GRAY));
    }

    #[test]
    fn invalid_size() {
        let mut img = RgbaImage::new(10, 10);
        let font = Font::Block;
        let style = Style::new(&font, 0.0, Color::white());
        assert_that!(render_line(&mut img, "X", HAlign::Left, point(0.0, 5.0), &style))
            .is_err().is_equal_to(TextError::InvalidSize(0.0));
    }
}
