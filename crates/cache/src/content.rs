use crate::error::{ErrorKind, Result};
use crate::{Fetch, HttpTransport, Transport};
use exn::ResultExt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

/// Stable identifier for a URL: the hyphenated, lowercase version-3 UUID of
/// the URL in the RFC 4122 URL namespace.
///
/// # Examples
///
/// ```
/// use snak_cache::identifier;
/// let id = identifier("https://example.com/archive.tar.gz");
/// assert_eq!(id.len(), 36);
/// assert_eq!(id, identifier("https://example.com/archive.tar.gz"));
/// assert_ne!(id, identifier("https://example.com/other.tar.gz"));
/// ```
pub fn identifier(url: &str) -> String {
    Uuid::new_v3(&Uuid::NAMESPACE_URL, url.as_bytes()).hyphenated().to_string()
}

/// An entry is fresh while it is strictly younger than `max_age`.
fn is_fresh(modified: OffsetDateTime, now: OffsetDateTime, max_age: Duration) -> bool {
    now - modified < max_age
}

/// Maps URLs to files under `<root>/cache`, downloading through `T` when the
/// cached copy is missing or stale.
///
/// Entries are never deleted here; a refetch overwrites in place by renaming a
/// fully written temporary file over the old one.
#[derive(Debug, Clone)]
pub struct ContentCache<T = HttpTransport> {
    root: PathBuf,
    transport: T,
}

impl<T: Transport> ContentCache<T> {
    /// Create a cache rooted at `root`. Nothing is created on disk until the
    /// first download.
    pub fn new(root: impl Into<PathBuf>, transport: T) -> Self {
        Self { root: root.into(), transport }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Location of the cached content for `url`, whether or not it exists.
    pub fn path_for(&self, url: &str) -> PathBuf {
        let id = identifier(url);
        self.root.join("cache").join(&id[0..2]).join(&id[2..4]).join(&id)
    }

    /// Open the cached content of `url`, downloading it first if there is no
    /// entry younger than `max_age`.
    ///
    /// # Errors
    ///
    /// Any network or filesystem failure is raised as
    /// [`ErrorKind::FetchFailed`], with the cause attached as a child.
    #[instrument(level = "debug", skip(self, max_age), fields(max_age = max_age.as_secs()))]
    pub fn fetch(&self, url: &str, max_age: Duration) -> Result<File> {
        self.fetch_inner(url, max_age).or_raise(|| ErrorKind::FetchFailed(url.to_string()))
    }

    fn fetch_inner(&self, url: &str, max_age: Duration) -> Result<File> {
        let path = self.path_for(url);
        if self.cached(&path, max_age)? {
            tracing::debug!(path = %path.display(), "Serving from cache");
        } else {
            tracing::info!("Downloading {url}...");
            self.download(url, &path)?;
        }
        File::open(&path).or_raise(|| ErrorKind::Io)
    }

    /// Returns `true` if `path` exists and is fresh.
    fn cached(&self, path: &Path, max_age: Duration) -> Result<bool> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
        };
        let modified: OffsetDateTime = metadata.modified().or_raise(|| ErrorKind::Io)?.into();
        Ok(is_fresh(modified, OffsetDateTime::now_utc(), max_age))
    }

    /// Stream the response into a temporary file next to `path`, then rename
    /// it into place. The temporary file is removed if anything fails.
    fn download(&self, url: &str, path: &Path) -> Result<()> {
        let Some(parent) = path.parent() else {
            exn::bail!(ErrorKind::Io);
        };
        fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        let mut response = self.transport.get(url)?;
        let mut temp = NamedTempFile::new_in(parent).or_raise(|| ErrorKind::Io)?;
        let size = io::copy(&mut response, temp.as_file_mut()).or_raise(|| ErrorKind::Io)?;
        temp.as_file().sync_all().or_raise(|| ErrorKind::Io)?;
        temp.persist(path).or_raise(|| ErrorKind::Io)?;
        tracing::debug!(size, path = %path.display(), "Cached download");
        Ok(())
    }
}

impl<T: Transport> Fetch for ContentCache<T> {
    fn fetch(&self, url: &str, max_age: Duration) -> Result<File> {
        ContentCache::fetch(self, url, max_age)
    }
}
