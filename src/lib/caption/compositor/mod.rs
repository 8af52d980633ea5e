//! Module which defines the caption compositor.

mod builder;
mod config;
mod load;

pub use self::builder::{Builder, Error as BuildError};
pub use self::config::{Config, DEFAULT_FILE_NAME_PREFIX, DEFAULT_RECENT_CAPACITY,
                       DEFAULT_SHARE_LINK, DEFAULT_SHARE_TEXT, DEFAULT_TEXT_DEBOUNCE_MS};
pub use self::load::{LoadOutcome, LoadTicket, PendingLoad, SourceKind};


use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;

use model::{CaptionContent, CaptionStyle, Slot, StylePatch};
use resources::{CachingLoader, Font, FontError, FontLoader, Loader,
                TemplateError, TemplateLoader};
use util::cache::ThreadSafeCache;
use util::debounce::Debouncer;
use super::error::{Action, CaptionError};
use super::export::{self, Clipboard, DownloadSink, RecentExport, ShareLauncher};
use super::notify::{LogNotifier, Notification, Notifier};
use super::output::{CaptionOutput, ExportFormat};
use super::render;
use super::source::{FileUpload, SourceImage};
use super::state::CompositorState;
use self::load::Tickets;


/// Meme captioning compositor.
///
/// It owns the current image, caption text & style, and keeps the canvas
/// (what the user sees) in sync with them. All the operations report their
/// outcome to the `Notifier`, exactly once, besides returning it.
///
/// Failed operations never change anything: the image, captions, style
/// and canvas stay exactly as they were before.
pub struct Compositor<Tl = TemplateLoader, Fl = FontLoader>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    state: CompositorState,
    canvas: RgbaImage,
    config: Config,

    template_loader: CachingLoader<Tl>,
    font_loader: CachingLoader<Fl>,
    fallback_font: Arc<Font>,
    missing_fonts: HashSet<String>,

    notifier: Box<dyn Notifier>,
    tickets: Tickets,
    debouncer: Debouncer,
    recent: VecDeque<RecentExport>,
}

/// Everything that the `Builder` prepares for a new `Compositor`.
struct Parts<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    config: Config,
    style: CaptionStyle,
    content: CaptionContent,
    template_loader: CachingLoader<Tl>,
    font_loader: CachingLoader<Fl>,
    notifier: Box<dyn Notifier>,
}

// Constructors.
impl Compositor<TemplateLoader, FontLoader> {
    /// Create a Compositor which loads templates & fonts from given directory paths,
    /// with the default configuration.
    ///
    /// For other ways of creating `Compositor`, see the `Builder`.
    pub fn new<Dt, Df>(template_directory: Dt, font_directory: Df) -> Self
        where Dt: AsRef<Path>, Df: AsRef<Path>
    {
        Compositor::from_parts(Parts{
            config: Config::default(),
            style: CaptionStyle::default(),
            content: CaptionContent::default(),
            template_loader: CachingLoader::new(
                TemplateLoader::new(template_directory), builder::DEFAULT_TEMPLATE_CAPACITY),
            font_loader: CachingLoader::new(
                FontLoader::new(font_directory), builder::DEFAULT_FONT_CAPACITY),
            notifier: Box::new(LogNotifier),
        })
    }
}
impl<Tl, Fl> Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    fn from_parts(parts: Parts<Tl, Fl>) -> Self {
        let Parts{config, style, content, template_loader, font_loader, notifier} = parts;
        let debouncer = Debouncer::new(config.text_debounce);
        let recent = VecDeque::with_capacity(config.recent_capacity);
        let mut compositor = Compositor{
            state: CompositorState::new(style, content),
            canvas: RgbaImage::new(0, 0),
            config,
            template_loader,
            font_loader,
            fallback_font: Arc::new(Font::Block),
            missing_fonts: HashSet::new(),
            notifier,
            tickets: Tickets::default(),
            debouncer,
            recent,
        };
        let family = compositor.state.style().font_family.clone();
        let font = compositor.resolve_font(&family);
        compositor.canvas = render::render_placeholder(&font);
        compositor
    }
}

// Accessors.
impl<Tl, Fl> Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    #[inline]
    pub fn state(&self) -> &CompositorState {
        &self.state
    }

    #[inline]
    pub fn source(&self) -> Option<&SourceImage> {
        self.state.source()
    }

    #[inline]
    pub fn has_image(&self) -> bool {
        self.state.has_image()
    }

    #[inline]
    pub fn style(&self) -> &CaptionStyle {
        self.state.style()
    }

    #[inline]
    pub fn content(&self) -> &CaptionContent {
        self.state.content()
    }

    /// The most recently rendered canvas.
    ///
    /// It may lag behind caption text changes made with `set_text_debounced`
    /// until the next `tick` that re-renders.
    #[inline]
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Latest downloads, newest first.
    #[inline]
    pub fn recent_exports(&self) -> &VecDeque<RecentExport> {
        &self.recent
    }

    /// Ticket of the image load in progress, if any.
    #[inline]
    pub fn pending_load(&self) -> Option<LoadTicket> {
        self.tickets.pending()
    }
}

// Loading images.
impl<Tl, Fl> Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Load an image file uploaded by the user.
    ///
    /// Files not declared as images are rejected before any decoding happens.
    pub fn load_file(&mut self, upload: FileUpload) -> Result<LoadOutcome, CaptionError> {
        debug!("Loading {:?}", upload);
        self.check_upload(&upload)?;
        let ticket = self.begin_load();
        let result = SourceImage::decode(upload.name, &upload.bytes);
        self.finish_load(ticket, SourceKind::File, result)
    }

    /// Load one of the preset templates.
    pub fn load_template(&mut self, name: &str) -> Result<LoadOutcome, CaptionError> {
        debug!("Loading template `{}`", name);
        let ticket = self.begin_load();
        let result = self.template_loader.load(name)
            .map_err(|e| CaptionError::decode(name, e))
            .and_then(|bytes| SourceImage::decode(name, &bytes));
        self.finish_load(ticket, SourceKind::Template, result)
    }

    /// Start decoding an uploaded image file in a background thread.
    ///
    /// The returned `PendingLoad` should be passed to `complete`.
    /// Any load started afterwards (as well as `clear`) supersedes this one.
    pub fn start_decode(&mut self, upload: FileUpload) -> Result<PendingLoad, CaptionError> {
        debug!("Starting background load of {:?}", upload);
        self.check_upload(&upload)?;
        let ticket = self.begin_load();
        let FileUpload{name, bytes, ..} = upload;
        PendingLoad::spawn(ticket, SourceKind::File, name, bytes)
            .map_err(|e| { self.tickets.finish(ticket); self.report(e) })
    }

    /// Start loading a preset template, decoding it in a background thread.
    pub fn start_template(&mut self, name: &str) -> Result<PendingLoad, CaptionError> {
        debug!("Starting background load of template `{}`", name);
        let ticket = self.begin_load();
        let result = self.template_loader.load(name)
            .map_err(|e| CaptionError::decode(name, e))
            .and_then(|bytes| PendingLoad::spawn(
                ticket, SourceKind::Template, name.to_owned(), (*bytes).clone()));
        result.map_err(|e| {
            self.tickets.finish(ticket);
            self.report_load_error(SourceKind::Template, e)
        })
    }

    /// Wait for a background decode and commit its image if it's still current.
    pub fn complete(&mut self, pending: PendingLoad) -> Result<LoadOutcome, CaptionError> {
        let (ticket, kind, result) = pending.wait();
        self.finish_load(ticket, kind, result)
    }

    /// Begin an image load, making every load still in progress stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.tickets.issue()
    }

    /// Finish an image load with its decode result.
    ///
    /// The image is only committed if the ticket is still current.
    /// Results of stale loads are discarded, whether they succeeded or not.
    pub fn finish_load(&mut self, ticket: LoadTicket, kind: SourceKind,
                       result: Result<SourceImage, CaptionError>) -> Result<LoadOutcome, CaptionError> {
        if !self.tickets.is_current(ticket) {
            debug!("Discarding result of stale load {}", ticket);
            return Ok(LoadOutcome::Superseded);
        }
        self.tickets.finish(ticket);

        let source = result.map_err(|e| self.report_load_error(kind, e))?;
        info!("Loaded image `{}` ({}x{})", source.name(), source.width(), source.height());
        let state = self.state.with_source(source);
        self.commit(state).map_err(|e| self.report(e))?;

        self.notify(Notification::success(match kind {
            SourceKind::File => "Image loaded successfully!",
            SourceKind::Template => "Template loaded!",
        }));
        Ok(LoadOutcome::Loaded)
    }

    /// Discard the current image, going back to the placeholder canvas.
    ///
    /// Caption text and style are kept. Loads in progress are abandoned.
    pub fn clear(&mut self) -> Result<(), CaptionError> {
        if !self.has_image() {
            return Err(self.report(CaptionError::PreconditionFailed(Action::Clear)));
        }
        let state = self.state.without_source();
        self.commit(state).map_err(|e| self.report(e))?;
        self.tickets.invalidate();
        self.notify(Notification::info("Image cleared"));
        Ok(())
    }

    fn check_upload(&self, upload: &FileUpload) -> Result<(), CaptionError> {
        if upload.is_image() {
            Ok(())
        } else {
            warn!("Rejecting `{}` of type {}", upload.name, upload.media_type);
            Err(self.report(CaptionError::InvalidInputType(upload.media_type.to_string())))
        }
    }

    fn report_load_error(&self, kind: SourceKind, error: CaptionError) -> CaptionError {
        let notification = match (kind, &error) {
            (SourceKind::Template, &CaptionError::DecodeFailure(..)) =>
                Notification::error("Template failed to load. Upload your own image instead."),
            _ => Notification::from(&error),
        };
        self.notify(notification);
        error
    }
}

// Captions & style.
impl<Tl, Fl> Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Change the text of a caption and re-render immediately.
    pub fn set_text<T: Into<String>>(&mut self, slot: Slot, text: T) -> Result<(), CaptionError> {
        let mut content = self.content().clone();
        match slot {
            Slot::Top => content.top_text = text.into(),
            Slot::Bottom => content.bottom_text = text.into(),
        }
        self.set_content(content)
    }

    /// Replace the text of both captions and re-render.
    pub fn set_content(&mut self, content: CaptionContent) -> Result<(), CaptionError> {
        let state = self.state.with_content(content);
        self.commit(state).map_err(|e| self.report(e))
    }

    /// Change the text of a caption, deferring the re-render
    /// until there were no further changes for a while (see `tick`).
    pub fn set_text_debounced<T: Into<String>>(&mut self, slot: Slot, text: T, now: Instant) {
        let mut content = self.content().clone();
        match slot {
            Slot::Top => content.top_text = text.into(),
            Slot::Bottom => content.bottom_text = text.into(),
        }
        self.state = self.state.with_content(content);
        self.debouncer.touch(now);
    }

    /// Re-render if debounced text changes are due.
    /// Returns whether the canvas was re-rendered.
    pub fn tick(&mut self, now: Instant) -> Result<bool, CaptionError> {
        if !self.debouncer.poll(now) {
            return Ok(false);
        }
        trace!("Debounced text changes are due");
        self.render().map(|_| true)
    }

    /// Empty both captions.
    pub fn clear_text(&mut self) -> Result<(), CaptionError> {
        let state = self.state.with_content(CaptionContent::default());
        self.commit(state).map_err(|e| self.report(e))?;
        self.notify(Notification::info("Text cleared"));
        Ok(())
    }

    /// Exchange the top & bottom captions.
    pub fn swap_text(&mut self) -> Result<(), CaptionError> {
        let mut content = self.content().clone();
        content.swap();
        let state = self.state.with_content(content);
        self.commit(state).map_err(|e| self.report(e))?;
        self.notify(Notification::info("Text swapped"));
        Ok(())
    }

    /// Modify the caption style and re-render.
    pub fn update_style(&mut self, patch: &StylePatch) -> Result<(), CaptionError> {
        trace!("Updating style with {:?}", patch);
        let state = self.state.update_style(patch)
            .map_err(|e| self.report(CaptionError::from(e)))?;
        self.commit(state).map_err(|e| self.report(e))
    }

    /// Move both captions back to their default positions.
    pub fn reset_positions(&mut self) -> Result<(), CaptionError> {
        self.update_style(&StylePatch::reset_positions())?;
        self.notify(Notification::info("Positions reset"));
        Ok(())
    }

    /// Re-render the canvas from the current state.
    pub fn render(&mut self) -> Result<&RgbaImage, CaptionError> {
        let state = self.state.clone();
        self.commit(state).map_err(|e| self.report(e))?;
        Ok(&self.canvas)
    }
}

// Exporting.
impl<Tl, Fl> Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Render the meme afresh and encode it in given format.
    pub fn export(&mut self, format: ExportFormat) -> Result<CaptionOutput, CaptionError> {
        self.export_for(Action::Download, format).map_err(|e| self.report(e))
    }

    /// Export the meme and hand it to the download sink.
    /// Returns the name of the downloaded file.
    pub fn download<S: DownloadSink + ?Sized>(&mut self, sink: &mut S) -> Result<String, CaptionError> {
        let format = self.config.export_format;
        let output = self.export_for(Action::Download, format).map_err(|e| self.report(e))?;

        let file_name = export::file_name(&self.config.file_name_prefix, format);
        debug!("Downloading meme as {}", file_name);
        sink.save(&file_name, &output)
            .map_err(|e| self.report(CaptionError::Delivery(Action::Download, e.into())))?;

        self.recent.push_front(RecentExport::new(file_name.clone(), output));
        self.recent.truncate(self.config.recent_capacity);
        self.notify(Notification::success("Meme downloaded!"));
        Ok(file_name)
    }

    /// Export the meme as PNG and put it on the clipboard.
    pub fn copy_to_clipboard<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C) -> Result<(), CaptionError> {
        if !self.has_image() {
            return Err(self.report(CaptionError::PreconditionFailed(Action::Copy)));
        }
        if !clipboard.supports_images() {
            return Err(self.report(CaptionError::ClipboardUnsupported));
        }
        let output = self.export_for(Action::Copy, ExportFormat::Png)
            .map_err(|e| self.report(e))?;
        clipboard.write_image(&self.canvas, &output)
            .map_err(|e| self.report(CaptionError::Delivery(Action::Copy, e)))?;
        self.notify(Notification::success("Meme copied to clipboard!"));
        Ok(())
    }

    /// Open the share intent for the meme.
    /// Returns the URL that was opened.
    ///
    /// Only the text & link are shared; the image itself has to be attached by the user.
    pub fn share<L: ShareLauncher + ?Sized>(&mut self, launcher: &mut L) -> Result<String, CaptionError> {
        self.prepare_export(Action::Share).map_err(|e| self.report(e))?;
        let url = export::share_url(&self.config.share_text, &self.config.share_link);
        debug!("Sharing via {}", url);
        launcher.open(&url)
            .map_err(|e| self.report(CaptionError::Delivery(Action::Share, e)))?;
        self.notify(Notification::info("Opening Twitter share dialog..."));
        Ok(url)
    }

    /// Re-render the canvas right before an export,
    /// so that the exported image always reflects the current state.
    fn prepare_export(&mut self, action: Action) -> Result<(), CaptionError> {
        if !self.has_image() {
            return Err(CaptionError::PreconditionFailed(action));
        }
        let state = self.state.clone();
        self.commit(state)
    }

    fn export_for(&mut self, action: Action, format: ExportFormat) -> Result<CaptionOutput, CaptionError> {
        self.prepare_export(action)?;
        CaptionOutput::encode(&self.canvas, format, self.style().jpeg_quality())
    }
}

// Managing resources.
impl<Tl, Fl> Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Preemptively load a template into compositor's cache.
    pub fn preload_template(&self, name: &str) -> Result<(), TemplateError> {
        if self.template_loader.is_caching() {
            self.template_loader.load(name)?;
        }
        Ok(())
    }

    /// Preemptively load a font into compositor's cache.
    pub fn preload_font(&self, name: &str) -> Result<(), FontError> {
        if self.font_loader.is_caching() {
            self.font_loader.load(name)?;
        }
        Ok(())
    }

    /// Return a reference to the internal template cache, if any.
    /// This can be used to examine cache statistics.
    #[inline]
    pub fn template_cache(&self) -> Option<&ThreadSafeCache<String, Vec<u8>>> {
        self.template_loader.cache()
    }

    /// Return a reference to the internal font cache, if any.
    #[inline]
    pub fn font_cache(&self) -> Option<&ThreadSafeCache<String, Font>> {
        self.font_loader.cache()
    }
}

// Utilities.
impl<Tl, Fl> Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Render given state and, if that succeeds, make it the current one.
    fn commit(&mut self, state: CompositorState) -> Result<(), CaptionError> {
        let font = self.resolve_font(&state.style().font_family);
        let canvas = render::render(&state, &font, &self.config.watermark_text)?;
        self.state = state;
        self.canvas = canvas;
        self.debouncer.cancel();
        Ok(())
    }

    /// Load the font of given family, falling back to the built-in one.
    fn resolve_font(&mut self, family: &str) -> Arc<Font> {
        if self.missing_fonts.contains(family) {
            return self.fallback_font.clone();
        }
        match self.font_loader.load(family) {
            Ok(font) => font,
            Err(e) => {
                if self.missing_fonts.insert(family.to_owned()) {
                    warn!("Font `{}` is unavailable ({}), using the built-in font instead",
                        family, e);
                }
                self.fallback_font.clone()
            }
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(&notification);
    }

    /// Notify the user about an error and pass it on.
    fn report(&self, error: CaptionError) -> CaptionError {
        debug!("Operation failed: {}", error);
        self.notify(Notification::from(&error));
        error
    }
}

impl<Tl, Fl> fmt::Debug for Compositor<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Compositor")
            .field("state", &self.state)
            .field("canvas", &self.canvas.dimensions())
            .field("config", &self.config)
            .field("template_loader", &self.template_loader)
            .field("font_loader", &self.font_loader)
            .field("tickets", &self.tickets)
            .field("debouncer", &self.debouncer)
            .field("recent", &self.recent)
            .finish()
    }
}
