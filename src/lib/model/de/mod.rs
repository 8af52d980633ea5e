//! Deserializers for data model types.

mod color;
mod style;

pub use self::color::ColorParseError;
