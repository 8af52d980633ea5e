//! Module implementing the `Color` type.

use std::fmt;

use image::Rgba;


/// Opaque RGB color of the caption text or its outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    #[inline]
    pub fn white() -> Self { Color(0xff, 0xff, 0xff) }
    #[inline]
    pub fn black() -> Self { Color(0, 0, 0) }

    /// Pixel of this color with given coverage as its alpha.
    #[inline]
    pub(crate) fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, alpha])
    }
}

impl From<Color> for Rgba<u8> {
    #[inline]
    fn from(color: Color) -> Rgba<u8> {
        color.to_rgba(0xff)
    }
}

/// Formats as the CSS hex notation, e.g. `#ff8000`.
impl fmt::Display for Color {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}


#[cfg(test)]
mod tests {
    use image::Rgba;
    use super::Color;

    #[test]
    fn display_is_hex() {
        assert_eq!("#ff8000", format!("{}", Color(0xff, 0x80, 0x00)));
        assert_eq!("#000000", format!("{}", Color::black()));
    }

    #[test]
    fn opaque_pixel() {
        assert_eq!(Rgba([0xff, 0xff, 0xff, 0xff]), Rgba::from(Color::white()));
        assert_eq!(Rgba([1, 2, 3, 4]), Color(1, 2, 3).to_rgba(4));
    }
}
