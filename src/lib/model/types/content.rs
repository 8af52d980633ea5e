//! Module implementing the `CaptionContent` type.

use std::fmt;
use std::mem;

use unicode_normalization::UnicodeNormalization;


/// Which of the two captions is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Caption at the top of the image.
    Top,
    /// Caption at the bottom of the image.
    Bottom,
}


/// Text of the captions, as entered by the user.
///
/// The text is kept verbatim; it is only upper-cased and split into lines
/// at render time (see `CaptionContent::lines`).
#[derive(Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct CaptionContent {
    /// Text of the top caption.
    pub top_text: String,
    /// Text of the bottom caption.
    pub bottom_text: String,
}

impl CaptionContent {
    #[inline]
    pub fn new<T: Into<String>, B: Into<String>>(top_text: T, bottom_text: B) -> Self {
        CaptionContent{top_text: top_text.into(), bottom_text: bottom_text.into()}
    }

    /// Raw text of given caption.
    #[inline]
    pub fn text(&self, slot: Slot) -> &str {
        match slot {
            Slot::Top => &self.top_text,
            Slot::Bottom => &self.bottom_text,
        }
    }

    /// Whether neither caption would draw anything.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.lines(Slot::Top).is_empty() && self.lines(Slot::Bottom).is_empty()
    }

    /// Exchange the top and bottom texts.
    #[inline]
    pub fn swap(&mut self) {
        mem::swap(&mut self.top_text, &mut self.bottom_text);
    }

    /// Remove both texts.
    #[inline]
    pub fn clear(&mut self) {
        self.top_text.clear();
        self.bottom_text.clear();
    }
}

impl CaptionContent {
    /// Lines of given caption as they should be drawn.
    ///
    /// The text is normalized and upper-cased, then broken at explicit line breaks.
    /// A caption that is blank after trimming yields no lines at all.
    pub fn lines(&self, slot: Slot) -> Vec<String> {
        let text = self.text(slot);
        if text.trim().is_empty() {
            return vec![];
        }
        let text: String = text.nfc().collect();
        text.to_uppercase().lines().map(|l| l.trim_end().to_owned()).collect()
    }
}

impl fmt::Debug for CaptionContent {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "CaptionContent{{^{:?} _{:?}}}", self.top_text, self.bottom_text)
    }
}


#[cfg(test)]
mod tests {
    use super::{CaptionContent, Slot};

    #[test]
    fn lines_are_uppercased() {
        let content = CaptionContent::new("one does not\nsimply", "");
        assert_eq!(vec!["ONE DOES NOT", "SIMPLY"], content.lines(Slot::Top));
    }

    #[test]
    fn blank_text_has_no_lines() {
        let content = CaptionContent::new("   ", "\n\t");
        assert!(content.lines(Slot::Top).is_empty());
        assert!(content.lines(Slot::Bottom).is_empty());
        assert!(content.is_blank());
    }

    #[test]
    fn swap() {
        let mut content = CaptionContent::new("top", "bottom");
        content.swap();
        assert_eq!("bottom", content.text(Slot::Top));
        assert_eq!("top", content.text(Slot::Bottom));
    }

    #[test]
    fn lowercase_sharp_s_expands() {
        let content = CaptionContent::new("", "straße");
        assert_eq!(vec!["STRASSE"], content.lines(Slot::Bottom));
    }
}
