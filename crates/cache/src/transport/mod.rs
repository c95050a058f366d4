//! Network transports used to populate the cache.

mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::http::{DEFAULT_CA_BUNDLE, HttpTransport};
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockTransport;
use crate::error::Result;
use std::io::Read;

/// A response body being streamed from the remote end.
pub type BoxRead = Box<dyn Read + Send + 'static>;

/// Performs a single `GET` against a URL.
///
/// Implementations must fail (rather than return a body) for non-success
/// responses, and must not retry on their own.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<BoxRead>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<BoxRead> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn get(&self, url: &str) -> Result<BoxRead> {
        (**self).get(url)
    }
}
