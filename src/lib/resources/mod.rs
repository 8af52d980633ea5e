//! Module handling the resources used for captioning.

mod filesystem;
mod fonts;
mod templates;


pub use self::filesystem::{BytesLoader, PathLoader};
pub use self::fonts::{Font, FontError, FontLoader, FILE_EXTENSION as FONT_FILE_EXTENSION};
pub use self::templates::{TemplateError, TemplateInfo, TemplateLoader,
                          IMAGE_FILE_EXTENSIONS, TEMPLATES};


use std::fmt;
use std::sync::Arc;

use util::cache::ThreadSafeCache;


/// Loader of resources from some external source.
pub trait Loader {
    /// Type of resources that this loader can load.
    type Item;
    /// Error that may occur while loading the resource.
    type Err;

    /// Load a resource of given name.
    fn load(&self, name: &str) -> Result<Self::Item, Self::Err>;
}


/// Wrapper over a `Loader` that hands out shared resources,
/// optionally remembering the most recently used ones.
pub struct CachingLoader<L: Loader> {
    inner: L,
    cache: Option<ThreadSafeCache<String, L::Item>>,
}

impl<L: Loader> CachingLoader<L> {
    /// Wrap the loader with an LRU cache of given capacity.
    #[inline]
    pub fn new(inner: L, capacity: usize) -> Self {
        CachingLoader{inner, cache: Some(ThreadSafeCache::new(capacity))}
    }

    /// Wrap the loader without caching anything.
    /// Every `load` goes straight to the inner loader.
    #[inline]
    pub fn uncached(inner: L) -> Self {
        CachingLoader{inner, cache: None}
    }

    #[inline]
    pub fn cache(&self) -> Option<&ThreadSafeCache<String, L::Item>> {
        self.cache.as_ref()
    }

    #[inline]
    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }
}

impl<L: Loader> Loader for CachingLoader<L> {
    type Item = Arc<L::Item>;
    type Err = L::Err;

    fn load(&self, name: &str) -> Result<Self::Item, Self::Err> {
        let cache = match self.cache {
            Some(ref cache) => cache,
            None => return self.inner.load(name).map(Arc::new),
        };
        if let Some(item) = cache.get(name) {
            return Ok(item);
        }
        let item = self.inner.load(name)?;
        Ok(cache.put(name.to_owned(), item))
    }
}

impl<L: Loader> fmt::Debug for CachingLoader<L> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("CachingLoader")
            .field("cache", &self.cache)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use super::{CachingLoader, Loader};

    /// Loader which counts how many times it was actually asked for something.
    struct CountingLoader(Cell<usize>);
    impl Loader for CountingLoader {
        type Item = String;
        type Err = ();
        fn load(&self, name: &str) -> Result<String, ()> {
            self.0.set(self.0.get() + 1);
            Ok(name.to_uppercase())
        }
    }

    #[test]
    fn caches_loaded_items() {
        let loader = CachingLoader::new(CountingLoader(Cell::new(0)), 4);
        assert_eq!("IMPACT", *loader.load("impact").unwrap());
        assert_eq!("IMPACT", *loader.load("impact").unwrap());
        assert_eq!(1, loader.inner.0.get());
        assert_eq!(1, loader.cache().unwrap().stats().hits);
    }

    #[test]
    fn uncached_always_loads() {
        let loader = CachingLoader::uncached(CountingLoader(Cell::new(0)));
        loader.load("impact").unwrap();
        loader.load("impact").unwrap();
        assert_eq!(2, loader.inner.0.get());
        assert!(!loader.is_caching());
        assert!(loader.cache().is_none());
    }
}
