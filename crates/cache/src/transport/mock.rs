//! In-memory transport for testing.

use super::{BoxRead, Transport};
use crate::error::{ErrorKind, Result};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory transport for testing.
///
/// Serves canned bodies by exact URL and counts every request, so tests can
/// assert whether the cache went to the network. Unknown URLs answer with a
/// `404` status error.
///
/// # Examples
///
/// ```ignore
/// use snak_cache::{MockTransport, Transport};
///
/// let transport = MockTransport::with_responses([("https://example.com/a", b"hello")]);
/// assert!(transport.get("https://example.com/a").is_ok());
/// assert!(transport.get("https://example.com/b").is_err());
/// assert_eq!(transport.requests(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: RwLock<HashMap<String, Vec<u8>>>,
    requests: AtomicUsize,
}

impl MockTransport {
    pub fn with_responses(responses: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let responses = responses.into_iter().map(|(url, body)| (url.into(), body.into())).collect();
        Self {
            responses: RwLock::new(responses),
            requests: AtomicUsize::new(0),
        }
    }

    /// Replace (or add) the body served for `url`.
    pub fn set(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        // A poisoned lock means a test already panicked; keep panicking.
        self.responses.write().unwrap().insert(url.into(), body.into());
    }

    /// Number of requests made so far, successful or not.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<BoxRead> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.responses.read().unwrap().get(url) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone()))),
            None => exn::bail!(ErrorKind::Status(404)),
        }
    }
}
