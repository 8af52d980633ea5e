//! Resource loaders that look things up in a directory.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob;

use super::Loader;


type Predicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Loader that resolves resource names to files in a directory.
///
/// A resource named `foo` is the single file `foo.*` in the directory
/// that also passes the loader's predicate.
#[derive(Clone)]
pub struct PathLoader {
    directory: PathBuf,
    predicate: Predicate,
}

impl PathLoader {
    #[inline]
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        Self::with_predicate(directory, |_| true)
    }

    /// Create a loader which only resolves to files
    /// with one of the given extensions (compared case-insensitively).
    pub fn for_extensions<D: AsRef<Path>, I, S>(directory: D, extensions: I) -> Self
        where I: IntoIterator<Item=S>, S: AsRef<str>
    {
        let extensions: Vec<String> = extensions.into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .collect();
        Self::with_predicate(directory, move |path| {
            path.extension().and_then(|e| e.to_str())
                .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext.trim())))
                .unwrap_or(false)
        })
    }

    pub fn with_predicate<D, P>(directory: D, predicate: P) -> Self
        where D: AsRef<Path>, P: Fn(&Path) -> bool + Send + Sync + 'static
    {
        PathLoader{
            directory: directory.as_ref().to_owned(),
            predicate: Arc::new(predicate),
        }
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// All files in the directory that could be the resource of given name.
    fn candidates(&self, name: &str) -> io::Result<Vec<PathBuf>> {
        let pattern = self.directory.join(format!("{}.*", glob::Pattern::escape(name)));
        let pattern = pattern.to_string_lossy();
        trace!("Looking up resource `{}` with pattern {}", name, pattern);

        let paths = glob::glob(&pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        Ok(paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable entry while resolving `{}`: {}", name, e);
                    None
                }
            })
            .filter(|p| p.is_file() && (self.predicate)(p))
            .collect())
    }
}

impl Loader for PathLoader {
    type Item = PathBuf;
    type Err = io::Error;

    fn load(&self, name: &str) -> Result<PathBuf, io::Error> {
        let mut candidates = self.candidates(name)?;
        match candidates.len() {
            1 => Ok(candidates.remove(0)),
            0 => Err(io::Error::new(io::ErrorKind::NotFound,
                format!("resource `{}` not found in {}", name, self.directory.display()))),
            n => Err(io::Error::new(io::ErrorKind::InvalidInput,
                format!("resource name `{}` is ambiguous: {} files match in {}",
                    name, n, self.directory.display()))),
        }
    }
}

impl fmt::Debug for PathLoader {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("PathLoader")
            .field("directory", &self.directory)
            .finish()
    }
}


/// Loader for the entire content of files resolved by a `PathLoader`.
#[derive(Clone, Debug)]
pub struct BytesLoader {
    paths: PathLoader,
}

impl BytesLoader {
    #[inline]
    pub fn new(paths: PathLoader) -> Self {
        BytesLoader{paths}
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        self.paths.directory()
    }
}

impl From<PathLoader> for BytesLoader {
    fn from(input: PathLoader) -> Self {
        Self::new(input)
    }
}

impl Loader for BytesLoader {
    type Item = Vec<u8>;
    type Err = io::Error;

    fn load(&self, name: &str) -> Result<Vec<u8>, io::Error> {
        let path = self.paths.load(name)?;
        let bytes = fs::read(&path)?;
        trace!("Read {} byte(s) of resource `{}` from {}", bytes.len(), name, path.display());
        Ok(bytes)
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::ErrorKind;

    use spectral::prelude::*;
    use tempfile::tempdir;

    use resources::Loader;
    use super::{BytesLoader, PathLoader};

    #[test]
    fn resolves_by_name_and_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("drake.png"), b"png").unwrap();
        fs::write(dir.path().join("drake.txt"), b"txt").unwrap();
        fs::write(dir.path().join("doge.JPG"), b"jpg").unwrap();

        let loader = BytesLoader::new(PathLoader::for_extensions(dir.path(), &["png", "jpg"]));
        assert_that!(loader.load("drake")).is_ok().is_equal_to(b"png".to_vec());
        assert_that!(loader.load("doge")).is_ok().is_equal_to(b"jpg".to_vec());
    }

    #[test]
    fn missing_resource() {
        let dir = tempdir().unwrap();
        let loader = PathLoader::new(dir.path());
        let err = loader.load("nope").unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn ambiguous_resource() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("surprised.png"), b"").unwrap();
        fs::write(dir.path().join("surprised.jpg"), b"").unwrap();
        let loader = PathLoader::new(dir.path());
        let err = loader.load("surprised").unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }
}
