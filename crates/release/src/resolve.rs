//! Release resolution: manifest in, filtered and ordered builds out.

use crate::error::{ErrorKind, Result};
use crate::filter::Filters;
use crate::models::{Asset, Manifest, ReleaseVariant};
use crate::parse;
use exn::ResultExt;
use snak_cache::{DEFAULT_MAX_AGE, Fetch};
use std::io::BufReader;
use std::time::Duration;
use tracing::instrument;

/// Resolves the builds of the latest release that match a set of [`Filters`].
///
/// The manifest is fetched through `F` (normally a
/// [`ContentCache`](snak_cache::ContentCache)) and re-used for as long as it
/// is younger than the configured maximum age.
#[derive(Debug, Clone)]
pub struct Resolver<F> {
    manifest_url: String,
    fetcher: F,
    max_age: Duration,
}

impl<F: Fetch> Resolver<F> {
    pub fn new(manifest_url: impl Into<String>, fetcher: F) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            fetcher,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Override how old a cached manifest may be before it is fetched again.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch and decode the release manifest.
    pub fn manifest(&self) -> Result<Manifest> {
        self.manifest_with_max_age(self.max_age)
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.manifest_url))]
    fn manifest_with_max_age(&self, max_age: Duration) -> Result<Manifest> {
        let file = self.fetcher.fetch(&self.manifest_url, max_age).or_raise(|| ErrorKind::Fetch)?;
        serde_json::from_reader(BufReader::new(file)).or_raise(|| ErrorKind::InvalidManifest)
    }

    /// Every build in the manifest matching `filters`, oldest version first.
    ///
    /// An empty result is not an error here; see [`exact`] for operations
    /// that need exactly one build.
    pub fn resolve(&self, filters: &Filters) -> Result<Vec<ReleaseVariant>> {
        self.resolve_with_max_age(filters, self.max_age)
    }

    /// [`Resolver::resolve`], accepting a cached manifest up to `max_age` old.
    #[instrument(level = "debug", skip(self, filters), fields(%filters))]
    pub fn resolve_with_max_age(&self, filters: &Filters, max_age: Duration) -> Result<Vec<ReleaseVariant>> {
        let manifest = self.manifest_with_max_age(max_age)?;
        if let Some(tag) = &manifest.tag_name {
            tracing::debug!(tag, assets = manifest.assets.len(), "Loaded release manifest");
        }
        Ok(select(&manifest.assets, filters))
    }

    /// The single build of `version` matching `filters`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NoMatch`] if nothing matches,
    /// - [`ErrorKind::AmbiguousMatch`] if more than one build matches.
    pub fn resolve_exact(&self, filters: &Filters, version: &str) -> Result<ReleaseVariant> {
        let candidates = self.resolve(filters)?;
        if !candidates.iter().any(|variant| variant.version.to_string() == version) {
            exn::bail!(ErrorKind::NoMatch(format!("version={version} {filters}")));
        }
        exact(candidates, version)
    }
}

/// Parse every asset, keep those matching `filters`, and order the survivors
/// by version, oldest first. Assets that aren't builds are skipped.
pub fn select(assets: &[Asset], filters: &Filters) -> Vec<ReleaseVariant> {
    let matcher = filters.compile();
    let mut variants: Vec<ReleaseVariant> = assets
        .iter()
        .filter_map(|asset| match parse(&asset.name, &asset.browser_download_url) {
            Ok(variant) => Some(variant),
            Err(e) => {
                tracing::trace!("Skipping asset: {}", *e);
                None
            },
        })
        .filter(|variant| matcher.matches(variant))
        .collect();
    // Stable: builds of the same version keep manifest order.
    variants.sort_by(|a, b| a.version.cmp(&b.version));
    variants
}

/// Narrow `candidates` down to the single build of exactly `version`.
///
/// The resolver never breaks ties itself: if several builds remain, the
/// caller has to narrow its filters.
pub fn exact(candidates: impl IntoIterator<Item = ReleaseVariant>, version: &str) -> Result<ReleaseVariant> {
    let mut matching: Vec<ReleaseVariant> =
        candidates.into_iter().filter(|variant| variant.version.to_string() == version).collect();
    match matching.len() {
        0 => exn::bail!(ErrorKind::NoMatch(format!("version={version}"))),
        1 => Ok(matching.remove(0)),
        _ => exn::bail!(ErrorKind::AmbiguousMatch {
            version: version.to_string(),
            urls: matching.into_iter().map(|variant| variant.url).collect(),
        }),
    }
}
