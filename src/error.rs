//! Command Error Types
//!
//! Library errors are re-raised into [`ErrorKind`] with their error tree
//! intact, so the top-level message stays the library's own while `-v`
//! output shows every frame.

use derive_more::{Display, Error};
use snak_cache::error::{Error as CacheError, ErrorKind as CacheErrorKind};
use snak_config::error::{Error as ConfigError, ErrorKind as ConfigErrorKind};
use snak_release::error::{Error as ReleaseError, ErrorKind as ReleaseErrorKind};
use snak_store::error::{Error as StoreError, ErrorKind as StoreErrorKind};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("{_0}")]
    Cache(CacheErrorKind),
    #[display("{_0}")]
    Config(ConfigErrorKind),
    #[display("{_0}")]
    Release(ReleaseErrorKind),
    #[display("{_0}")]
    Store(StoreErrorKind),
    /// Nothing in the version store to build an environment from.
    #[display("no Python versions installed, install one with `snak versions install <version>`")]
    NoVersions,
    /// An installed version requested by name that isn't there, or isn't unique.
    #[display("{_0}")]
    Selection(#[error(not(source))] String),
    /// Reading the user's answer, or writing output, failed.
    #[display("terminal I/O error")]
    Terminal,
}

impl ErrorKind {
    #[track_caller]
    pub fn cache(err: CacheError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Cache(inner))
    }

    #[track_caller]
    pub fn config(err: ConfigError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Config(inner))
    }

    #[track_caller]
    pub fn release(err: ReleaseError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Release(inner))
    }

    #[track_caller]
    pub fn store(err: StoreError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Store(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Cache(kind) => kind.is_retryable(),
            Self::Config(kind) => kind.is_retryable(),
            Self::Release(kind) => kind.is_retryable(),
            Self::Store(kind) => kind.is_retryable(),
            Self::NoVersions | Self::Selection(_) | Self::Terminal => false,
        }
    }
}
