//! Module implementing image captioning.

mod compositor;
mod error;
mod export;
mod notify;
mod output;
mod render;
mod source;
mod state;


pub use self::compositor::{Builder as CompositorBuilder,
                           BuildError as CompositorBuildError,
                           Config as CompositorConfig,
                           Compositor, LoadOutcome, LoadTicket, PendingLoad, SourceKind,
                           DEFAULT_FILE_NAME_PREFIX, DEFAULT_RECENT_CAPACITY,
                           DEFAULT_SHARE_LINK, DEFAULT_SHARE_TEXT, DEFAULT_TEXT_DEBOUNCE_MS};
pub use self::error::{Action, CaptionError, Cause};
pub use self::export::{file_name, share_url, Clipboard, DirectorySink, DownloadSink,
                       NoClipboard, RecentExport, ShareLauncher,
                       FILE_NAME_SUFFIX_LENGTH, SHARE_INTENT_URL};
pub use self::notify::{Level, LogNotifier, Notification, Notifier};
pub use self::output::{CaptionOutput, ExportFormat};
pub use self::render::{render, render_captioned, render_placeholder,
                       PLACEHOLDER_SIZE, PLACEHOLDER_TEXT,
                       WATERMARK_MARGIN_RATIO, WATERMARK_OPACITY, WATERMARK_SIZE_RATIO};
pub use self::source::{media_type_for, FileUpload, SourceImage};
pub use self::state::CompositorState;
