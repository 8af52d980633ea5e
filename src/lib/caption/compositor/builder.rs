//! Module implementing the builder for `Compositor`.

use std::error;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use model::{CaptionContent, CaptionStyle, StyleError};
use resources::{CachingLoader, Font, FontError, FontLoader, Loader,
                TemplateError, TemplateLoader};
use super::super::notify::{LogNotifier, Notifier};
use super::super::output::ExportFormat;
use super::config::Config;
use super::Compositor;


pub(super) const DEFAULT_TEMPLATE_CAPACITY: usize = 16;
pub(super) const DEFAULT_FONT_CAPACITY: usize = 8;


/// Builder for `Compositor`.
#[must_use = "unused builder which must be used"]
pub struct Builder<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    errors: Vec<Error>,

    template_loader: Option<Tl>,
    template_caching: Caching,
    font_loader: Option<Fl>,
    font_caching: Caching,

    config: Config,
    style: CaptionStyle,
    content: CaptionContent,
    notifier: Option<Box<dyn Notifier>>,
}

/// How the resources of a loader are cached.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Caching {
    /// LRU cache of given capacity.
    Lru(usize),
    /// No caching (other than what the loader does on its own).
    Off,
}

impl Caching {
    fn build<L: Loader>(self, loader: L) -> CachingLoader<L> {
        match self {
            Caching::Lru(capacity) => CachingLoader::new(loader, capacity),
            Caching::Off => CachingLoader::uncached(loader),
        }
    }
}


impl Builder<TemplateLoader, FontLoader> {
    /// Create a new `Builder`.
    #[inline]
    pub fn new() -> Self {
        Builder{
            errors: vec![],
            template_loader: None,
            template_caching: Caching::Lru(DEFAULT_TEMPLATE_CAPACITY),
            font_loader: None,
            font_caching: Caching::Lru(DEFAULT_FONT_CAPACITY),
            config: Config::default(),
            style: CaptionStyle::default(),
            content: CaptionContent::default(),
            notifier: None,
        }
    }
}
impl Default for Builder<TemplateLoader, FontLoader> {
    fn default() -> Self {
        Self::new()
    }
}

// Loader setters.
impl<Fl> Builder<TemplateLoader, Fl>
    where Fl: Loader<Item=Font, Err=FontError>
{
    /// Set the directory where the templates will be loaded from.
    #[inline]
    pub fn template_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.template_loader = Some(TemplateLoader::new(directory)); self
    }
}
impl<Tl> Builder<Tl, FontLoader>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>
{
    /// Set the directory where the fonts will be loaded from.
    #[inline]
    pub fn font_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.font_loader = Some(FontLoader::new(directory)); self
    }
}
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Set a custom loader for templates.
    ///
    /// Templates loaded by it will still be cached in an LRU cache.
    /// See `raw_template_loader` if you want to provide your own caching.
    #[inline]
    pub fn template_loader<T>(self, loader: T) -> Builder<T, Fl>
        where T: Loader<Item=Vec<u8>, Err=TemplateError>
    {
        let caching = self.template_caching;
        self.with_template_loader(loader, caching)
    }

    /// Set a custom "raw" loader for templates.
    ///
    /// Templates loaded this way will not be cached (unless the loader itself
    /// implements some kind of caching).
    #[inline]
    pub fn raw_template_loader<T>(self, loader: T) -> Builder<T, Fl>
        where T: Loader<Item=Vec<u8>, Err=TemplateError>
    {
        self.with_template_loader(loader, Caching::Off)
    }

    /// Change the size of the template cache.
    #[inline]
    pub fn template_cache_size(mut self, size: usize) -> Self {
        match self.template_caching {
            Caching::Off => self.err(Error::LoaderSetupConflict("template")),
            Caching::Lru(_) => { self.template_caching = Caching::Lru(size); self }
        }
    }

    /// Set a custom loader for fonts.
    ///
    /// Fonts loaded by it will still be cached in an LRU cache.
    /// See `raw_font_loader` if you want to provide your own caching.
    #[inline]
    pub fn font_loader<F>(self, loader: F) -> Builder<Tl, F>
        where F: Loader<Item=Font, Err=FontError>
    {
        let caching = self.font_caching;
        self.with_font_loader(loader, caching)
    }

    /// Set a custom "raw" loader for fonts.
    #[inline]
    pub fn raw_font_loader<F>(self, loader: F) -> Builder<Tl, F>
        where F: Loader<Item=Font, Err=FontError>
    {
        self.with_font_loader(loader, Caching::Off)
    }

    /// Change the size of the font cache.
    #[inline]
    pub fn font_cache_size(mut self, size: usize) -> Self {
        match self.font_caching {
            Caching::Off => self.err(Error::LoaderSetupConflict("font")),
            Caching::Lru(_) => { self.font_caching = Caching::Lru(size); self }
        }
    }
}

// Configuration setters.
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Set the initial caption style.
    #[inline]
    pub fn style(mut self, style: CaptionStyle) -> Self {
        match style.validate() {
            Ok(()) => { self.style = style; self }
            Err(e) => self.err(Error::InvalidStyle(e)),
        }
    }

    /// Set the initial caption text.
    #[inline]
    pub fn content(mut self, content: CaptionContent) -> Self {
        self.content = content; self
    }

    /// Set the format of downloaded images.
    #[inline]
    pub fn export_format(mut self, format: ExportFormat) -> Self {
        self.config.export_format = format; self
    }

    /// Set the prefix of downloaded file names.
    pub fn file_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        let valid = !prefix.is_empty() && prefix.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            self.config.file_name_prefix = prefix; self
        } else {
            self.err(Error::InvalidConfig(format!("invalid file name prefix `{}`", prefix)))
        }
    }

    /// Set the text of the watermark.
    #[inline]
    pub fn watermark_text<S: Into<String>>(mut self, text: S) -> Self {
        self.config.watermark_text = text.into(); self
    }

    /// Set the text & link included in share intents.
    pub fn share<T: Into<String>, L: Into<String>>(mut self, text: T, link: L) -> Self {
        let link = link.into();
        if link.starts_with("https://") || link.starts_with("http://") {
            self.config.share_text = text.into();
            self.config.share_link = link;
            self
        } else {
            self.err(Error::InvalidConfig(format!("share link `{}` is not a web URL", link)))
        }
    }

    /// Set the delay of re-rendering after text edits.
    #[inline]
    pub fn text_debounce(mut self, delay: Duration) -> Self {
        self.config.text_debounce = delay; self
    }

    /// Set how many recent downloads are remembered.
    #[inline]
    pub fn recent_capacity(mut self, capacity: usize) -> Self {
        self.config.recent_capacity = capacity; self
    }

    /// Set the receiver of user notifications. By default, they are only logged.
    #[inline]
    pub fn notifier<N: Notifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Some(Box::new(notifier)); self
    }
}

// Validation & building.
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    /// Build the `Compositor`.
    pub fn build(self) -> Result<Compositor<Tl, Fl>, Error> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        let template_loader = self.template_loader.ok_or(Error::NoLoader("template"))?;
        let font_loader = self.font_loader.ok_or(Error::NoLoader("font"))?;
        let notifier = self.notifier.unwrap_or_else(|| Box::new(LogNotifier));

        Ok(Compositor::from_parts(super::Parts{
            config: self.config,
            style: self.style,
            content: self.content,
            template_loader: self.template_caching.build(template_loader),
            font_loader: self.font_caching.build(font_loader),
            notifier,
        }))
    }
}

// Utilities.
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    fn with_template_loader<T>(self, loader: T, caching: Caching) -> Builder<T, Fl>
        where T: Loader<Item=Vec<u8>, Err=TemplateError>
    {
        let mut errors = self.errors;
        if self.template_caching == Caching::Off && caching != Caching::Off {
            errors.push(Error::LoaderSetupConflict("template"));
        }
        Builder{
            errors,
            template_loader: Some(loader),
            template_caching: caching,
            font_loader: self.font_loader,
            font_caching: self.font_caching,
            config: self.config,
            style: self.style,
            content: self.content,
            notifier: self.notifier,
        }
    }

    fn with_font_loader<F>(self, loader: F, caching: Caching) -> Builder<Tl, F>
        where F: Loader<Item=Font, Err=FontError>
    {
        let mut errors = self.errors;
        if self.font_caching == Caching::Off && caching != Caching::Off {
            errors.push(Error::LoaderSetupConflict("font"));
        }
        Builder{
            errors,
            template_loader: self.template_loader,
            template_caching: self.template_caching,
            font_loader: Some(loader),
            font_caching: caching,
            config: self.config,
            style: self.style,
            content: self.content,
            notifier: self.notifier,
        }
    }

    fn err(mut self, error: Error) -> Self {
        self.errors.push(error); self
    }
}

impl<Tl, Fl> fmt::Debug for Builder<Tl, Fl>
    where Tl: Loader<Item=Vec<u8>, Err=TemplateError>, Fl: Loader<Item=Font, Err=FontError>
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Builder")
            .field("errors", &self.errors)
            .field("template_loader", &self.template_loader.as_ref().map(|_| "..."))
            .field("template_caching", &self.template_caching)
            .field("font_loader", &self.font_loader.as_ref().map(|_| "..."))
            .field("font_caching", &self.font_caching)
            .field("config", &self.config)
            .field("style", &self.style)
            .field("content", &self.content)
            .finish()
    }
}


/// Error that resulted from misconfiguration of the `Compositor` via its `Builder`.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// No loader set up for given kind of resource.
    NoLoader(&'static str),
    /// Conflicting loader configuration for given kind of resource.
    LoaderSetupConflict(&'static str),
    /// Initial caption style is invalid.
    InvalidStyle(StyleError),
    /// Other configuration value is invalid.
    InvalidConfig(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoLoader(r) => write!(fmt, "no {} loader configured", r),
            Error::LoaderSetupConflict(r) => write!(fmt,
                "invalid combination of configuration parameters for setting up {} loader", r),
            Error::InvalidStyle(ref e) => write!(fmt, "invalid initial style: {}", e),
            Error::InvalidConfig(ref msg) => write!(fmt, "{}", msg),
        }
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use tempfile::tempdir;

    use model::CaptionStyle;
    use super::{Builder, Error};

    #[test]
    fn requires_loaders() {
        let dir = tempdir().unwrap();
        assert_that!(Builder::new().font_directory(dir.path()).build().map(|_| ()))
            .is_err().is_equal_to(Error::NoLoader("template"));
        assert_that!(Builder::new().template_directory(dir.path()).build().map(|_| ()))
            .is_err().is_equal_to(Error::NoLoader("font"));
    }

    #[test]
    fn cache_size_conflicts_with_raw_loader() {
        let dir = tempdir().unwrap();
        let result = Builder::new()
            .font_directory(dir.path())
            .raw_template_loader(::resources::TemplateLoader::new(dir.path()))
            .template_cache_size(4)
            .build();
        assert_that!(result.map(|_| ()))
            .is_err().is_equal_to(Error::LoaderSetupConflict("template"));
    }

    #[test]
    fn rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let builder = || Builder::new().template_directory(dir.path()).font_directory(dir.path());

        assert_that!(builder().file_name_prefix("../evil").build().map(|_| ())).is_err();
        assert_that!(builder().share("hi", "javascript:alert(1)").build().map(|_| ())).is_err();

        let mut style = CaptionStyle::default();
        style.font_size_percent = 0.5;
        assert_that!(builder().style(style).build().map(|_| ())).is_err();

        assert_that!(builder().file_name_prefix("my-memes").build().map(|_| ())).is_ok();
    }
}
