//! User-facing notifications about outcomes of compositor operations.

use std::fmt;

use resources::TemplateError;
use super::error::{Action, CaptionError};


/// Kind of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    Success,
    Error,
    Info,
}

/// Status message shown to the user after an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    #[inline]
    pub fn success<M: Into<String>>(message: M) -> Self {
        Notification{level: Level::Success, message: message.into()}
    }

    #[inline]
    pub fn error<M: Into<String>>(message: M) -> Self {
        Notification{level: Level::Error, message: message.into()}
    }

    #[inline]
    pub fn info<M: Into<String>>(message: M) -> Self {
        Notification{level: Level::Info, message: message.into()}
    }
}

impl<'e> From<&'e CaptionError> for Notification {
    fn from(error: &'e CaptionError) -> Self {
        let message = match *error {
            CaptionError::InvalidInputType(_) => "Please select a valid image file".into(),
            CaptionError::DecodeFailure(_, ref cause) => {
                if cause.downcast_ref::<TemplateError>().is_some() {
                    "Template failed to load. Upload your own image instead.".into()
                } else {
                    "Failed to load image. Try a different file.".into()
                }
            }
            CaptionError::PreconditionFailed(action) => match action {
                Action::Download => "Upload an image first",
                Action::Copy => "Nothing to copy",
                Action::Share => "Create a meme first",
                Action::Clear => "No image to clear",
            }.into(),
            CaptionError::ClipboardUnsupported =>
                "Image copying not supported here. Use download instead.".into(),
            CaptionError::ExportSerializationFailure(_) =>
                "Failed to export the meme. Try a smaller image.".into(),
            CaptionError::Delivery(Action::Copy, _) =>
                "Failed to copy. Try downloading instead.".into(),
            CaptionError::Delivery(action, _) => format!("Failed to {} the meme", action),
            CaptionError::Render(_) => "Failed to draw the captions".into(),
            CaptionError::InvalidStyle(ref e) => format!("Invalid style: {}", e),
        };
        Notification::error(message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.level {
            Level::Success => "✔",
            Level::Error => "✘",
            Level::Info => "ℹ",
        };
        write!(fmt, "{} {}", prefix, self.message)
    }
}


/// Receiver of the notifications emitted by the compositor.
pub trait Notifier: Send {
    fn notify(&self, notification: &Notification);
}

impl<F> Notifier for F where F: Fn(&Notification) + Send {
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}


/// Notifier which merely logs the notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            Level::Success | Level::Info => info!("{}", notification.message),
            Level::Error => warn!("{}", notification.message),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::io;

    use caption::error::{Action, CaptionError};
    use resources::TemplateError;
    use super::{Level, Notification};

    #[test]
    fn error_messages() {
        let n = Notification::from(&CaptionError::InvalidInputType("text/plain".into()));
        assert_eq!(Level::Error, n.level);
        assert_eq!("Please select a valid image file", n.message);

        let n = Notification::from(&CaptionError::PreconditionFailed(Action::Download));
        assert_eq!("Upload an image first", n.message);

        let n = Notification::from(&CaptionError::ClipboardUnsupported);
        assert!(n.message.contains("Use download instead"));
    }

    #[test]
    fn decode_failure_messages() {
        let file = CaptionError::decode("cat.png", "bad header");
        assert_eq!("Failed to load image. Try a different file.",
            Notification::from(&file).message);

        let template = CaptionError::decode("drake",
            TemplateError::File(io::Error::new(io::ErrorKind::NotFound, "gone")));
        assert!(Notification::from(&template).message.starts_with("Template failed to load"));
    }
}
