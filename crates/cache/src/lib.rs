//! Content-addressed download cache.
//!
//! Remote resources (the release manifest, interpreter archives) are fetched
//! through a [`ContentCache`], which maps each URL to a stable file on disk:
//!
//! ```text
//! <root>/cache/<id[0..2]>/<id[2..4]>/<id>
//! ```
//!
//! where `id` is the [`identifier`] of the URL. A cached file younger than the
//! caller-supplied maximum age is returned without touching the network;
//! anything older is downloaded again and renamed into place, so concurrent
//! readers never observe a half-written file.
//!
//! The network side is abstracted behind [`Transport`]. [`HttpTransport`] is
//! the real implementation; the `mock` feature exposes an in-memory
//! [`MockTransport`] for tests in other crates.

mod content;
pub mod error;
mod transport;

pub use crate::content::{ContentCache, identifier};
#[cfg(any(test, feature = "mock"))]
pub use crate::transport::MockTransport;
pub use crate::transport::{BoxRead, DEFAULT_CA_BUNDLE, HttpTransport, Transport};
use std::fs::File;
use std::time::Duration;

/// Freshness window used when the caller has no opinion: four hours.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(4 * 60 * 60);

/// Anything that can turn a URL into a readable local file.
///
/// This is the seam consumed by release resolution and installation, so
/// either can run against a [`ContentCache`] backed by any [`Transport`].
pub trait Fetch {
    /// Returns an open handle to the (possibly freshly downloaded) content
    /// of `url`. Content older than `max_age` must not be returned.
    fn fetch(&self, url: &str, max_age: Duration) -> error::Result<File>;
}
