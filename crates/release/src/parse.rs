//! Asset name parsing.
//!
//! Asset names are matched in two stages. The first stage splits
//! `cpython-<version>+<date>-<arch>-<vendor>-<os>-<tail>` into its fixed
//! fields. The tail is loosely delimited (both the libc tag and the variant
//! are hyphenated free text), so a second pattern decomposes it into
//! `[<libc>-]<variant>.tar.gz`. A name failing either stage is rejected.

use crate::consts::{ASSET_REGEX, NATIVE_LIBC, NOT_AVAILABLE, TAIL_REGEX};
use crate::error::{ErrorKind, Result};
use crate::models::{ReleaseVariant, VersionNumber};
use crate::normalize;
use exn::{OptionExt, ResultExt};
use regex::Captures;
use tracing::instrument;

/// Parse a release asset into a [`ReleaseVariant`].
///
/// # Errors
///
/// Returns [`ErrorKind::MalformedAsset`] for anything that isn't an
/// interpreter build archive (checksums, source tarballs, other formats).
/// Manifests are full of those; callers are expected to skip them.
///
/// # Examples
///
/// ```
/// use snak_release::parse;
///
/// let variant = parse(
///     "cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz",
///     "https://example.com/a.tar.gz",
/// ).unwrap();
/// assert_eq!(variant.version.to_string(), "3.12.1");
/// assert_eq!(variant.libc, "gnu");
/// assert_eq!(variant.variant, "pgo stripped");
/// assert!(variant.is_stripped());
///
/// assert!(parse("python-3.12.1-src.tar.gz", "https://example.com/b").is_err());
/// ```
#[instrument(level = "trace", skip(url))]
pub fn parse(name: &str, url: &str) -> Result<ReleaseVariant> {
    let malformed = || ErrorKind::MalformedAsset(name.to_string());
    let fields = ASSET_REGEX.captures(name).ok_or_raise(malformed)?;
    let tail = TAIL_REGEX.captures(field(&fields, "tail")).ok_or_raise(malformed)?;

    let libc = match tail.name("libc").map(|m| m.as_str()) {
        Some(token) => normalize::libc(token).unwrap_or(NATIVE_LIBC),
        None => NATIVE_LIBC,
    };
    Ok(ReleaseVariant {
        version: field(&fields, "version").parse::<VersionNumber>().or_raise(malformed)?,
        release_date: or_not_available(field(&fields, "date")),
        arch: or_not_available(normalize::arch(field(&fields, "arch"))),
        vendor: or_not_available(field(&fields, "vendor")),
        os: or_not_available(normalize::os(field(&fields, "os"))),
        libc: or_not_available(libc),
        variant: or_not_available(&field(&tail, "variant").replace('_', " ")),
        url: url.to_string(),
    })
}

fn field<'h>(captures: &Captures<'h>, name: &str) -> &'h str {
    captures.name(name).map_or("", |m| m.as_str())
}

fn or_not_available(value: &str) -> String {
    match value.is_empty() {
        true => NOT_AVAILABLE.to_string(),
        false => value.to_string(),
    }
}
