//! Module defining the data model of the captioner.

mod constants;
mod de;
mod types;


pub use self::constants::*;
pub use self::de::ColorParseError;
pub use self::types::*;
