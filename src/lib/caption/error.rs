//! Captioning error.

use std::error::Error;
use std::fmt;

use model::StyleError;
use util::text::TextError;


/// Boxed cause of an error, coming from a codec or the host environment.
pub type Cause = Box<dyn Error + Send + Sync>;


/// Operation of the compositor that the user can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Download,
    Copy,
    Share,
    Clear,
}

impl fmt::Display for Action {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Action::Download => "download",
            Action::Copy => "copy",
            Action::Share => "share",
            Action::Clear => "clear",
        };
        write!(fmt, "{}", name)
    }
}


/// Error that may occur while loading, captioning or exporting an image.
///
/// None of these is fatal for the `Compositor`: the state prior to
/// the failed operation is always preserved.
pub enum CaptionError {
    /// The uploaded file doesn't declare an image media type.
    InvalidInputType(String),
    /// Image data (of given source) couldn't be turned into a bitmap.
    DecodeFailure(String, Cause),
    /// The action requires an image to be loaded first.
    PreconditionFailed(Action),
    /// The clipboard cannot hold image data.
    ClipboardUnsupported,
    /// The rendered image couldn't be encoded or written out.
    ExportSerializationFailure(Cause),
    /// The host failed to accept the result of an action (e.g. clipboard write).
    Delivery(Action, Cause),
    /// Text couldn't be drawn on the canvas.
    Render(TextError),
    /// Style change with values out of their allowed ranges.
    InvalidStyle(StyleError),
}

impl CaptionError {
    #[inline]
    pub(crate) fn decode<S, E>(source: S, cause: E) -> Self
        where S: Into<String>, E: Into<Cause>
    {
        CaptionError::DecodeFailure(source.into(), cause.into())
    }

    #[inline]
    pub(crate) fn export<E: Into<Cause>>(cause: E) -> Self {
        CaptionError::ExportSerializationFailure(cause.into())
    }
}

impl From<StyleError> for CaptionError {
    fn from(input: StyleError) -> Self {
        CaptionError::InvalidStyle(input)
    }
}

impl From<TextError> for CaptionError {
    fn from(input: TextError) -> Self {
        CaptionError::Render(input)
    }
}

impl Error for CaptionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CaptionError::DecodeFailure(_, ref e) => Some(&**e),
            CaptionError::ExportSerializationFailure(ref e) => Some(&**e),
            CaptionError::Delivery(_, ref e) => Some(&**e),
            CaptionError::Render(ref e) => Some(e),
            CaptionError::InvalidStyle(ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Debug for CaptionError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CaptionError::InvalidInputType(ref t) =>
                write!(fmt, "CaptionError::InvalidInputType({:?})", t),
            CaptionError::DecodeFailure(ref s, ref e) =>
                write!(fmt, "CaptionError::DecodeFailure({:?}, {:?})", s, e),
            CaptionError::PreconditionFailed(a) =>
                write!(fmt, "CaptionError::PreconditionFailed({:?})", a),
            CaptionError::ClipboardUnsupported =>
                write!(fmt, "CaptionError::ClipboardUnsupported"),
            CaptionError::ExportSerializationFailure(ref e) =>
                write!(fmt, "CaptionError::ExportSerializationFailure({:?})", e),
            CaptionError::Delivery(a, ref e) =>
                write!(fmt, "CaptionError::Delivery({:?}, {:?})", a, e),
            CaptionError::Render(ref e) => write!(fmt, "CaptionError::Render({:?})", e),
            CaptionError::InvalidStyle(ref e) => write!(fmt, "CaptionError::InvalidStyle({:?})", e),
        }
    }
}

impl fmt::Display for CaptionError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CaptionError::InvalidInputType(ref t) =>
                write!(fmt, "not an image file (declared type: {})", t),
            CaptionError::DecodeFailure(ref s, ref e) =>
                write!(fmt, "cannot decode image from {}: {}", s, e),
            CaptionError::PreconditionFailed(a) =>
                write!(fmt, "cannot {}: no image loaded", a),
            CaptionError::ClipboardUnsupported =>
                write!(fmt, "clipboard doesn't support images"),
            CaptionError::ExportSerializationFailure(ref e) =>
                write!(fmt, "failed to export the final image: {}", e),
            CaptionError::Delivery(a, ref e) => write!(fmt, "failed to {} the image: {}", a, e),
            CaptionError::Render(ref e) => write!(fmt, "failed to render captions: {}", e),
            CaptionError::InvalidStyle(ref e) => write!(fmt, "invalid style: {}", e),
        }
    }
}
