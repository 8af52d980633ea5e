//! Module defining the state that a render is computed from.

use std::sync::Arc;

use model::{CaptionContent, CaptionStyle, StyleError, StylePatch};
use super::source::SourceImage;


/// Everything that the rendered canvas depends on.
///
/// State is treated as a value: changes produce a new state,
/// which makes rendering a pure function of it (see `render::render`).
#[derive(Clone, Debug, Default)]
pub struct CompositorState {
    source: Option<Arc<SourceImage>>,
    style: CaptionStyle,
    content: CaptionContent,
}

impl CompositorState {
    #[inline]
    pub fn new(style: CaptionStyle, content: CaptionContent) -> Self {
        CompositorState{source: None, style, content}
    }
}

impl CompositorState {
    /// The currently loaded image, if any.
    #[inline]
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref().map(|s| &**s)
    }

    #[inline]
    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    #[inline]
    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    #[inline]
    pub fn content(&self) -> &CaptionContent {
        &self.content
    }
}

impl CompositorState {
    /// State with given image replacing the current one.
    /// Style and caption text carry over.
    pub fn with_source(&self, source: SourceImage) -> Self {
        CompositorState{source: Some(Arc::new(source)), ..self.clone()}
    }

    /// State with no image loaded. Style and caption text carry over.
    pub fn without_source(&self) -> Self {
        CompositorState{source: None, ..self.clone()}
    }

    /// State with different caption text.
    pub fn with_content(&self, content: CaptionContent) -> Self {
        CompositorState{content, ..self.clone()}
    }

    /// State with the style changed according to given patch.
    ///
    /// Fails if the resulting style would be invalid.
    pub fn update_style(&self, patch: &StylePatch) -> Result<Self, StyleError> {
        let style = self.style.apply(patch)?;
        Ok(CompositorState{style, ..self.clone()})
    }
}


#[cfg(test)]
mod tests {
    use image::RgbaImage;
    use spectral::prelude::*;

    use caption::source::SourceImage;
    use model::{CaptionContent, StylePatch};
    use super::CompositorState;

    fn image() -> SourceImage {
        SourceImage::from_pixels("blank", RgbaImage::new(2, 2)).unwrap()
    }

    #[test]
    fn captions_survive_image_swap() {
        let state = CompositorState::default()
            .with_content(CaptionContent::new("top", "bottom"))
            .with_source(image());
        assert!(state.has_image());

        let cleared = state.without_source();
        assert!(!cleared.has_image());
        assert_eq!(state.content(), cleared.content());
    }

    #[test]
    fn update_style_is_pure() {
        let state = CompositorState::default();
        let updated = state.update_style(&StylePatch::new().font_size(12.0)).unwrap();
        assert_eq!(12.0, updated.style().font_size_percent);
        assert_eq!(8.0, state.style().font_size_percent);

        assert_that!(state.update_style(&StylePatch::new().font_size(100.0))).is_err();
    }
}
