//! Deserializer for the CaptionStyle type.

use serde::de::{self, Deserialize};

use super::super::{CaptionStyle, StylePatch};


/// A style is deserialized as a patch over the default style,
/// so that any omitted field keeps its default value.
impl<'de> Deserialize<'de> for CaptionStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: de::Deserializer<'de>
    {
        let patch = StylePatch::deserialize(deserializer)?;
        CaptionStyle::default().apply(&patch).map_err(|e| {
            warn!("Invalid caption style {:?}: {}", patch, e);
            de::Error::custom(e)
        })
    }
}
