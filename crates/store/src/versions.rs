//! Installed interpreter builds.
//!
//! Each build lives in `<versions>/<install name>/`, laid out as the archive's
//! `python/` tree plus a `version.json` sidecar describing the release it came
//! from.

use crate::archive;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use snak_release::ReleaseVariant;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const METADATA_FILE: &str = "version.json";
const ARCHIVE_ROOT: &str = "python";

/// A build found in the version store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    /// Directory name, normally the variant's install name.
    pub name: String,
    pub path: PathBuf,
    pub variant: ReleaseVariant,
}

impl InstalledVersion {
    /// Read the build installed at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path.join(METADATA_FILE)).or_raise(|| ErrorKind::Metadata)?;
        let variant = serde_json::from_reader(BufReader::new(file)).or_raise(|| ErrorKind::Metadata)?;
        Ok(Self {
            name: path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default(),
            path: path.to_path_buf(),
            variant,
        })
    }

    pub fn interpreter(&self) -> PathBuf {
        self.path.join("bin").join("python")
    }
}

#[derive(Debug, Clone)]
pub struct VersionStore {
    versions: PathBuf,
    scratch: PathBuf,
}

impl VersionStore {
    /// A store installing into `versions`, unpacking archives under `scratch`.
    pub fn new(versions: impl Into<PathBuf>, scratch: impl Into<PathBuf>) -> Self {
        Self { versions: versions.into(), scratch: scratch.into() }
    }

    pub fn path(&self) -> &Path {
        &self.versions
    }

    pub fn install_path(&self, variant: &ReleaseVariant) -> PathBuf {
        self.versions.join(variant.install_name())
    }

    pub fn is_installed(&self, variant: &ReleaseVariant) -> bool {
        self.install_path(variant).is_dir()
    }

    /// Install the build contained in `archive` as `variant`.
    ///
    /// The archive is unpacked into a scratch directory first; the install
    /// directory only appears once unpacking succeeded, and is removed again
    /// if populating it fails. Creating it is exclusive: of two concurrent
    /// installs of the same build, one fails with [`ErrorKind::AlreadyExists`].
    #[instrument(level = "debug", skip_all, fields(version = %variant.version, install_name = %variant.install_name()))]
    pub fn install(&self, variant: &ReleaseVariant, archive: impl std::io::Read) -> Result<PathBuf> {
        let target = self.install_path(variant);
        if target.exists() {
            exn::bail!(ErrorKind::AlreadyExists(target.display().to_string()));
        }

        fs::create_dir_all(&self.scratch).or_raise(|| ErrorKind::Io)?;
        let scratch = tempfile::Builder::new().suffix(".download").tempdir_in(&self.scratch).or_raise(|| ErrorKind::Io)?;
        tracing::info!("Extracting...");
        archive::unpack(archive, scratch.path())?;
        let source = scratch.path().join(ARCHIVE_ROOT);
        if !source.is_dir() {
            exn::bail!(ErrorKind::InvalidArchive);
        }

        tracing::info!("Installing...");
        claim(&self.versions, &target)?;
        if let Err(e) = populate(&source, &target, variant) {
            if let Err(cleanup) = fs::remove_dir_all(&target) {
                tracing::warn!("Could not remove partial install {}: {cleanup}", target.display());
            }
            return Err(e);
        }
        tracing::info!("Installed Python {} to {}", variant.version, target.display());
        Ok(target)
    }

    /// Every complete build in the store, newest version first.
    ///
    /// Directories without an interpreter or readable metadata are skipped.
    pub fn installed(&self) -> Result<Vec<InstalledVersion>> {
        let entries = match fs::read_dir(&self.versions) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
        };
        let mut versions = Vec::new();
        for entry in entries {
            let path = entry.or_raise(|| ErrorKind::Io)?.path();
            if !path.join("bin").join("python").exists() {
                continue;
            }
            match InstalledVersion::load(&path) {
                Ok(version) => versions.push(version),
                Err(e) => tracing::debug!("Skipping {}: {}", path.display(), *e),
            }
        }
        versions.sort_by(|a, b| b.variant.version.cmp(&a.variant.version).then_with(|| a.name.cmp(&b.name)));
        Ok(versions)
    }
}

/// Create `target` inside `versions`, failing if it already exists.
///
/// Only the caller that created the directory may populate or remove it.
fn claim(versions: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(versions).or_raise(|| ErrorKind::Io)?;
    match fs::create_dir(target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            exn::bail!(ErrorKind::AlreadyExists(target.display().to_string()))
        },
        Err(e) => Err(e).or_raise(|| ErrorKind::Io),
    }
}

fn populate(source: &Path, target: &Path, variant: &ReleaseVariant) -> Result<()> {
    for entry in fs::read_dir(source).or_raise(|| ErrorKind::Io)? {
        let entry = entry.or_raise(|| ErrorKind::Io)?;
        move_entry(&entry.path(), &target.join(entry.file_name()))?;
    }
    write_metadata(target, variant)
}

/// Rename, falling back to copy-and-delete across filesystems.
fn move_entry(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_tree(from, to)?;
    let removed = match fs::symlink_metadata(from).or_raise(|| ErrorKind::Io)?.is_dir() {
        true => fs::remove_dir_all(from),
        false => fs::remove_file(from),
    };
    removed.or_raise(|| ErrorKind::Io)
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    let file_type = fs::symlink_metadata(from).or_raise(|| ErrorKind::Io)?.file_type();
    if file_type.is_symlink() {
        let link = fs::read_link(from).or_raise(|| ErrorKind::Io)?;
        std::os::unix::fs::symlink(link, to).or_raise(|| ErrorKind::Io)?;
    } else if file_type.is_dir() {
        fs::create_dir_all(to).or_raise(|| ErrorKind::Io)?;
        for entry in fs::read_dir(from).or_raise(|| ErrorKind::Io)? {
            let entry = entry.or_raise(|| ErrorKind::Io)?;
            copy_tree(&entry.path(), &to.join(entry.file_name()))?;
        }
    } else {
        fs::copy(from, to).or_raise(|| ErrorKind::Io)?;
    }
    Ok(())
}

fn write_metadata(target: &Path, variant: &ReleaseVariant) -> Result<()> {
    let file = fs::File::create(target.join(METADATA_FILE)).or_raise(|| ErrorKind::Io)?;
    let mut serializer =
        serde_json::Serializer::with_formatter(file, serde_json::ser::PrettyFormatter::with_indent(b" "));
    variant.serialize(&mut serializer).or_raise(|| ErrorKind::Metadata)
}
