//! Store Error Types

use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The install or environment directory is already present.
    #[display("{_0} already exists")]
    AlreadyExists(#[error(not(source))] String),
    #[display("{_0} does not exist")]
    NotFound(#[error(not(source))] String),
    /// Environment names must be a single plain path component.
    #[display("invalid environment name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// The archive could not be unpacked, or doesn't contain a `python/` tree.
    #[display("invalid archive")]
    InvalidArchive,
    #[display("I/O error")]
    Io,
    /// A `version.json` sidecar is missing, unreadable or malformed.
    #[display("invalid version metadata")]
    Metadata,
    /// The external environment builder exited unsuccessfully.
    #[display("environment builder failed: {_0}")]
    Builder(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}
