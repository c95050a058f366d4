//! Tarball unpacking with compression sniffed from the stream itself.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use flate2::read::GzDecoder;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tar::Archive;
use tracing::instrument;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl Compression {
    /// Detect compression format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            return Compression::Gzip;
        }
        Compression::None
    }
}

/// Unpack a tar stream, gzip-compressed or not, into `dest`.
///
/// Entries that would land outside `dest` are skipped by the tar reader.
#[instrument(level = "debug", skip(reader, dest), fields(dest = %dest.display(), compression))]
pub fn unpack(reader: impl Read, dest: &Path) -> Result<()> {
    let mut reader = BufReader::new(reader);
    let compression = Compression::from_magic_bytes(reader.fill_buf().or_raise(|| ErrorKind::Io)?);
    tracing::Span::current().record("compression", tracing::field::debug(compression));
    match compression {
        Compression::Gzip => unpack_tar(GzDecoder::new(reader), dest),
        Compression::None => unpack_tar(reader, dest),
    }
}

fn unpack_tar(reader: impl Read, dest: &Path) -> Result<()> {
    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.unpack(dest).or_raise(|| ErrorKind::InvalidArchive)
}
