//! Deserializer for the Color type.

use std::collections::HashMap;
use std::error;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Visitor};

use super::super::Color;


const FIELDS: &[&str] = &["r", "g", "b"];
const EXPECTING_MSG: &str = "hex color string, color name, or array/map of RGB values";

lazy_static! {
    /// Color names accepted in addition to hex notation.
    static ref NAMED_COLORS: HashMap<&'static str, Color> = hashmap!{
        "black" => Color(0, 0, 0),
        "white" => Color(0xff, 0xff, 0xff),
        "red" => Color(0xff, 0, 0),
        "lime" => Color(0, 0xff, 0),
        "green" => Color(0, 0x80, 0),
        "blue" => Color(0, 0, 0xff),
        "yellow" => Color(0xff, 0xff, 0),
        "cyan" => Color(0, 0xff, 0xff),
        "magenta" => Color(0xff, 0, 0xff),
        "gray" => Color(0x80, 0x80, 0x80),
        "grey" => Color(0x80, 0x80, 0x80),
        "silver" => Color(0xc0, 0xc0, 0xc0),
        "orange" => Color(0xff, 0xa5, 0),
        "purple" => Color(0x80, 0, 0x80),
        "navy" => Color(0, 0, 0x80),
        "maroon" => Color(0x80, 0, 0),
    };
}


impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: de::Deserializer<'de>
    {
        deserializer.deserialize_any(ColorVisitor)
    }
}

struct ColorVisitor;
impl<'de> Visitor<'de> for ColorVisitor {
    type Value = Color;

    fn expecting(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(EXPECTING_MSG)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(|e| {
            debug!("Rejecting color `{}`: {}", v, e);
            E::custom(e)
        })
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where A: de::SeqAccess<'de>
    {
        let expected = &"3";
        match seq.size_hint() {
            Some(len) if len != FIELDS.len() => return Err(de::Error::invalid_length(len, expected)),
            _ => {}
        }

        let mut rgb = [0u8; 3];
        let mut count = 0;
        while let Some(value) = seq.next_element::<u8>()? {
            if count == rgb.len() {
                return Err(de::Error::invalid_length(count + 1, expected));
            }
            rgb[count] = value;
            count += 1;
        }
        if count != rgb.len() {
            return Err(de::Error::invalid_length(count, expected));
        }
        Ok(Color(rgb[0], rgb[1], rgb[2]))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where A: de::MapAccess<'de>
    {
        match map.size_hint() {
            Some(len) if len != FIELDS.len() => return Err(de::Error::invalid_length(len, &"3")),
            _ => {}
        }

        let mut rgb: [Option<u8>; 3] = [None; 3];
        while let Some(key) = map.next_key::<String>()? {
            let index = match key.trim().to_lowercase().as_str() {
                "r" | "red" => 0,
                "g" | "green" => 1,
                "b" | "blue" => 2,
                other => return Err(de::Error::unknown_field(other, FIELDS)),
            };
            if rgb[index].is_some() {
                return Err(de::Error::duplicate_field(FIELDS[index]));
            }
            rgb[index] = Some(map.next_value()?);
        }

        let channel = |i: usize| -> Result<u8, A::Error> {
            rgb[i].ok_or_else(|| de::Error::missing_field(FIELDS[i]))
        };
        Ok(Color(channel(0)?, channel(1)?, channel(2)?))
    }
}


impl FromStr for Color {
    type Err = ColorParseError;

    /// Parse a color name or hex notation.
    ///
    /// Besides the CSS `#rgb` and `#rrggbb` forms, `0xrrggbb` and `$rrggbb`
    /// are accepted too (but only with all six digits).
    fn from_str(v: &str) -> Result<Self, Self::Err> {
        let s = v.trim().to_lowercase();
        if let Some(&color) = NAMED_COLORS.get(s.as_str()) {
            return Ok(color);
        }

        let syntax_error = || ColorParseError::Syntax(v.to_owned());
        let (digits, css) = if let Some(d) = s.strip_prefix('#') {
            (d, true)
        } else if let Some(d) = s.strip_prefix("0x").or_else(|| s.strip_prefix('$')) {
            (d, false)
        } else {
            return Err(syntax_error());
        };
        // from_str_radix() would also accept a leading sign.
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(syntax_error());
        }

        let value = u32::from_str_radix(digits, 16).map_err(|_| syntax_error())?;
        let nibble = |shift: u32| ((value >> shift) & 0xf) as u8 * 0x11;
        match (digits.len(), css) {
            (6, _) => Ok(Color((value >> 16) as u8, (value >> 8) as u8, value as u8)),
            (3, true) => Ok(Color(nibble(8), nibble(4), nibble(0))),
            (4, true) | (8, true) => Err(ColorParseError::Alpha),
            _ => Err(syntax_error()),
        }
    }
}


/// Error that may occur while parsing a Color.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorParseError {
    /// Unrecognized color syntax or name.
    Syntax(String),
    /// The color erroneously includes an alpha channel value.
    Alpha,
}

impl error::Error for ColorParseError {}

impl fmt::Display for ColorParseError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ColorParseError::Syntax(ref s) => write!(fmt, "invalid color syntax: `{}`", s),
            ColorParseError::Alpha => write!(fmt, "color transparency not supported"),
        }
    }
}


#[cfg(test)]
mod tests {
    mod generic {
        use serde_test::{assert_de_tokens, assert_de_tokens_error, Token as T};
        use super::super::{Color, EXPECTING_MSG};

        #[test]
        fn must_be_valid_type() {
            assert_de_tokens_error::<Color>(
                &[T::Unit],
                &format!("invalid type: unit value, expected {}", EXPECTING_MSG));
            assert_de_tokens_error::<Color>(
                &[T::Bool(false)],
                &format!("invalid type: boolean `false`, expected {}", EXPECTING_MSG));
        }

        #[test]
        fn can_be_string() {
            assert_de_tokens(&Color(255, 0, 0), &[T::Str("red")]);
            assert_de_tokens(&Color(0x12, 0x34, 0x56), &[T::Str("#123456")]);
            assert_de_tokens_error::<Color>(
                &[T::Str("uwotm8")], "invalid color syntax: `uwotm8`");
        }

        #[test]
        fn can_be_rgb_sequence() {
            assert_de_tokens(&Color(1, 2, 3), &[
                T::Seq{len: Some(3)}, T::U8(1), T::U8(2), T::U8(3), T::SeqEnd]);
            assert_de_tokens(&Color(1, 2, 3), &[
                T::Seq{len: None}, T::U8(1), T::U8(2), T::U8(3), T::SeqEnd]);
            // Must be exactly 3 elements.
            assert_de_tokens_error::<Color>(&[T::Seq{len: Some(7)}], "invalid length 7, expected 3");
        }

        #[test]
        fn can_be_valid_map() {
            assert_de_tokens(&Color(1, 2, 3), &[
                T::Map{len: None},
                T::Str("r"), T::U8(1), T::Str("g"), T::U8(2), T::Str("b"), T::U8(3),
                T::MapEnd,
            ]);
            assert_de_tokens(&Color(1, 2, 3), &[
                T::Map{len: None},
                T::Str("red"), T::U8(1), T::Str("green"), T::U8(2), T::Str("blue"), T::U8(3),
                T::MapEnd,
            ]);
        }

        #[test]
        fn cannot_be_invalid_map() {
            assert_de_tokens_error::<Color>(
                &[T::Map{len: Some(0)}], "invalid length 0, expected 3");
            assert_de_tokens_error::<Color>(
                &[T::Map{len: None}, T::MapEnd], "missing field `r`");
            assert_de_tokens_error::<Color>(&[
                T::Map{len: None},
                T::Str("r"), T::U8(255),
                T::Str("b"), T::U8(0),
                T::MapEnd,
            ], "missing field `g`");
        }
    }

    mod from_str {
        use std::str::FromStr;
        use spectral::prelude::*;
        use super::super::{Color, ColorParseError};

        #[test]
        fn named_colors() {
            assert_that!(Color::from_str("black")).is_ok().is_equal_to(Color(0, 0, 0));
            assert_that!(Color::from_str("White")).is_ok().is_equal_to(Color(0xff, 0xff, 0xff));
            assert_that!(Color::from_str(" lime ")).is_ok().is_equal_to(Color(0, 0xff, 0));
            assert_that!(Color::from_str("green")).is_ok().is_equal_to(Color(0, 0x80, 0));
        }

        #[test]
        fn html_rgb() {
            assert_that!(Color::from_str("#0f0")).is_ok().is_equal_to(Color(0, 0xff, 0));
            assert_that!(Color::from_str("#f80")).is_ok().is_equal_to(Color(0xff, 0x88, 0));
            assert_that!(Color::from_str("#00FF00")).is_ok().is_equal_to(Color(0, 0xff, 0));
            assert_that!(Color::from_str("0xff0000")).is_ok().is_equal_to(Color(0xff, 0, 0));
            assert_that!(Color::from_str("$0000ff")).is_ok().is_equal_to(Color(0, 0, 0xff));
            // These are forbidden because it's unclear what they would mean.
            assert_that!(Color::from_str("0xf0f")).is_err();
            assert_that!(Color::from_str("$ff0")).is_err();
            // Multiple prefixes are NOT cleared.
            assert_that!(Color::from_str("$0x00ffff")).is_err();
            // We do need a prefix though (otherwise it's ambiguous if it's hex or name).
            assert_that!(Color::from_str("f0f0f0")).is_err();
            assert_that!(Color::from_str("#ggg")).is_err();
        }

        #[test]
        fn transparency_not_supported() {
            assert_that!(Color::from_str("#ffffff80"))
                .is_err().is_equal_to(ColorParseError::Alpha);
            assert_that!(Color::from_str("#fff8"))
                .is_err().is_equal_to(ColorParseError::Alpha);
        }
    }
}
