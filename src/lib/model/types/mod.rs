//! Module defining the model types.

mod color;
mod content;
mod style;

pub use self::color::Color;
pub use self::content::{CaptionContent, Slot};
pub use self::style::{CaptionStyle, StylePatch, Error as StyleError};
