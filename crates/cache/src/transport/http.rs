use super::{BoxRead, Transport};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reqwest::blocking::Client;
use std::path::Path;
use tracing::instrument;

/// System trust store checked before enabling certificate verification.
pub const DEFAULT_CA_BUNDLE: &str = "/etc/ssl/certs/ca-certificates.crt";
// The GitHub API rejects requests without a user agent.
const USER_AGENT: &str = concat!("snak/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTPS transport.
///
/// Certificate verification is only enabled when a system trust store is
/// present. Without one, the transport still works but verifies nothing:
/// it is a degraded mode for minimal containers, not a security control.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    verified: bool,
}
impl HttpTransport {
    /// Create a transport, checking [`DEFAULT_CA_BUNDLE`] for a trust store.
    pub fn new() -> Result<Self> {
        Self::with_trust_store(DEFAULT_CA_BUNDLE)
    }

    /// Create a transport, checking `bundle` for a trust store.
    ///
    /// The bundle path is resolved through symlinks first, since distributions
    /// commonly ship it as a link into another directory.
    pub fn with_trust_store(bundle: impl AsRef<Path>) -> Result<Self> {
        let bundle = bundle.as_ref();
        let verified = bundle.canonicalize().is_ok_and(|resolved| resolved.is_file());
        if !verified {
            tracing::warn!(
                bundle = %bundle.display(),
                "No system trust store found; TLS certificates will NOT be verified"
            );
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!verified)
            .build()
            .or_raise(|| ErrorKind::Network)?;
        Ok(Self { client, verified })
    }

    /// Whether TLS certificates are being verified.
    pub fn is_verified(&self) -> bool {
        self.verified
    }
}

impl Transport for HttpTransport {
    #[instrument(level = "debug", skip(self))]
    fn get(&self, url: &str) -> Result<BoxRead> {
        let response = self.client.get(url).send().or_raise(|| ErrorKind::Network)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        Ok(Box::new(response))
    }
}
