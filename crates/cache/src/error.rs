//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. A failed fetch is always reported as
//! [`ErrorKind::FetchFailed`], with the underlying cause as a child frame.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The URL could not be served from the cache nor downloaded into it.
    #[display("failed to fetch {_0}")]
    FetchFailed(#[error(not(source))] String),
    /// The HTTP client could not be built, or the request never completed.
    #[display("network error")]
    Network,
    /// The server answered with a non-success status code.
    #[display("unexpected HTTP status: {_0}")]
    Status(#[error(not(source))] u16),
    /// Reading or writing the cache directory failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing in this crate retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::Io => true,
            Self::Status(code) => *code >= 500 || *code == 429,
            Self::FetchFailed(_) => false,
        }
    }
}
