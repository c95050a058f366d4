//! Release resolution for standalone Python builds.
//!
//! Turns a release manifest (a JSON list of downloadable assets) into the
//! structured [`ReleaseVariant`]s that fit a platform:
//!
//! 1. the manifest is fetched through a [`Fetch`](snak_cache::Fetch)
//!    implementation, normally the on-disk [`ContentCache`](snak_cache::ContentCache),
//! 2. each asset name is [`parse`]d, silently dropping anything that isn't
//!    an interpreter build,
//! 3. survivors are matched against [`Filters`] after both sides went through
//!    the [`normalize`] synonym tables,
//! 4. results are ordered by version, oldest first.
//!
//! The [`install_name`] of a variant is the key under which it is installed.

mod consts;
pub mod error;
mod filter;
pub mod models;
pub mod normalize;
mod parse;
mod resolve;

pub use crate::consts::{NATIVE_LIBC, NOT_AVAILABLE};
pub use crate::filter::Filters;
pub use crate::models::{ReleaseVariant, VersionNumber};
pub use crate::parse::parse;
pub use crate::resolve::{Resolver, exact, select};

/// Canonical, filesystem-safe directory name of an installed build.
///
/// A pure function of the variant's fields; it is the primary key of an
/// installed version, so anything that locates builds on disk must derive
/// names through here.
///
/// # Examples
///
/// ```
/// let variant = snak_release::parse(
///     "cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz",
///     "https://example.com/a.tar.gz",
/// ).unwrap();
/// assert_eq!(
///     snak_release::install_name(&variant),
///     "3.12.1-x86_64-unknown-linux-gnu-pgo_stripped"
/// );
/// ```
pub fn install_name(variant: &ReleaseVariant) -> String {
    format!(
        "{}-{}-{}-{}-{}-{}",
        variant.version,
        variant.arch,
        variant.vendor,
        variant.os,
        variant.libc,
        variant.variant.replace(' ', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz",
        "3.12.1-x86_64-unknown-linux-gnu-pgo_stripped"
    )]
    #[case(
        "cpython-3.11.7+20240107-aarch64-apple-darwin-install_only.tar.gz",
        "3.11.7-aarch64-apple-darwin-native-install_only"
    )]
    #[case(
        "cpython-3.10.13+20231002-amd64-unknown-linux-glibc-lto.tar.gz",
        "3.10.13-x86_64-unknown-linux-gnu-lto"
    )]
    fn test_install_name(#[case] asset: &str, #[case] expected: &str) {
        let variant = parse(asset, "https://example.com").unwrap();
        assert_eq!(install_name(&variant), expected);
        assert_eq!(variant.install_name(), expected);
    }

    #[test]
    fn test_install_name_is_pure() {
        let variant = parse("cpython-3.12.1+20240101-x86_64-unknown-linux-musl-pgo_stripped.tar.gz", "u").unwrap();
        let copy = variant.clone();
        assert_eq!(install_name(&variant), install_name(&variant));
        assert_eq!(install_name(&variant), install_name(&copy));
    }

    #[test]
    fn test_install_name_ignores_provenance() {
        let a = parse("cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo.tar.gz", "https://a").unwrap();
        let b = parse("cpython-3.12.1+20240202-x86_64-unknown-linux-gnu-pgo.tar.gz", "https://b").unwrap();
        assert_eq!(install_name(&a), install_name(&b));
    }

    #[test]
    fn test_install_name_distinguishes_libc() {
        let gnu = parse("cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo.tar.gz", "u").unwrap();
        let musl = parse("cpython-3.12.1+20240101-x86_64-unknown-linux-musl-pgo.tar.gz", "u").unwrap();
        assert_ne!(install_name(&gnu), install_name(&musl));
    }

    #[test]
    fn test_variant_sidecar_format() {
        let variant = parse("cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz", "u").unwrap();
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["version"], "3.12.1");
        assert_eq!(json["date"], "20240101");
        assert_eq!(json["variant"], "pgo stripped");
        let decoded: ReleaseVariant = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, variant);
    }
}
