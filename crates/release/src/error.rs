//! Release Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A release resolution error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for release resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The manifest could not be fetched (see the child cache error).
    #[display("could not fetch release manifest")]
    Fetch,
    /// The manifest was fetched but is not the expected JSON document.
    #[display("invalid release manifest")]
    InvalidManifest,
    /// No build matched the filter criteria.
    #[display("no builds found matching {_0}")]
    NoMatch(#[error(not(source))] String),
    /// More than one build matched where exactly one was required.
    #[display("multiple builds found for version {version}: {}", urls.join(", "))]
    AmbiguousMatch {
        /// The requested version.
        version: String,
        /// Download URLs of every candidate, so the user can narrow the filters.
        urls: Vec<String>,
    },
    /// An asset name is not a build of the expected shape. Never leaves
    /// this crate: such assets are skipped during resolution.
    #[display("unrecognised asset: {_0}")]
    MalformedAsset(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Only the network can change its mind; narrowing filters is up to the user.
        matches!(self, Self::Fetch)
    }
}
