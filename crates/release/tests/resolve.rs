use snak_cache::{ContentCache, MockTransport};
use snak_release::error::ErrorKind;
use snak_release::{Filters, Resolver};
use std::time::Duration;

const MANIFEST_URL: &str = "https://api.example.com/releases/latest";

fn manifest(names: &[&str]) -> Vec<u8> {
    let assets: Vec<_> = names
        .iter()
        .map(|name| serde_json::json!({ "name": name, "browser_download_url": format!("https://dl.example.com/{name}") }))
        .collect();
    serde_json::to_vec(&serde_json::json!({ "tag_name": "20240101", "assets": assets })).unwrap()
}

fn resolver(body: Vec<u8>) -> (tempfile::TempDir, Resolver<ContentCache<MockTransport>>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let cache = ContentCache::new(temp_dir.path(), MockTransport::with_responses([(MANIFEST_URL, body)]));
    (temp_dir, Resolver::new(MANIFEST_URL, cache))
}

fn linux_gnu() -> Filters {
    Filters::host().with_arch(["x86_64"]).with_os(["linux"]).with_libc(["gnu"]).with_stripped(true)
}

#[test]
fn test_end_to_end_resolution() {
    let (_temp_dir, resolver) = resolver(manifest(&[
        "cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz",
        "cpython-3.12.1+20240101-aarch64-unknown-linux-gnu-pgo_stripped.tar.gz",
        "cpython-3.11.7+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz",
        "cpython-3.11.7+20240101-x86_64-unknown-linux-gnu-pgo.tar.gz",
        "SHA256SUMS",
    ]));
    let variants = resolver.resolve(&linux_gnu()).unwrap();
    let versions: Vec<String> = variants.iter().map(|v| v.version.to_string()).collect();
    assert_eq!(versions, ["3.11.7", "3.12.1"]);
    assert!(variants.iter().all(|v| v.arch == "x86_64" && v.is_stripped()));
    assert_eq!(
        variants[1].url,
        "https://dl.example.com/cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz"
    );
}

#[test]
fn test_manifest_is_cached_between_resolutions() {
    let (_temp_dir, resolver) =
        resolver(manifest(&["cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz"]));
    resolver.resolve(&linux_gnu()).unwrap();
    resolver.resolve(&linux_gnu().with_libc(["musl"])).unwrap();
    assert_eq!(resolver.fetcher().transport().requests(), 1);
}

#[test]
fn test_zero_max_age_always_refetches() {
    let (_temp_dir, resolver) =
        resolver(manifest(&["cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz"]));
    let resolver = resolver.with_max_age(Duration::ZERO);
    resolver.resolve(&linux_gnu()).unwrap();
    resolver.resolve(&linux_gnu()).unwrap();
    assert_eq!(resolver.fetcher().transport().requests(), 2);
}

#[test]
fn test_per_call_max_age() {
    let (_temp_dir, resolver) =
        resolver(manifest(&["cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz"]));
    resolver.resolve(&linux_gnu()).unwrap();
    resolver.resolve_with_max_age(&linux_gnu(), Duration::ZERO).unwrap();
    resolver.resolve_with_max_age(&linux_gnu(), Duration::from_secs(3600)).unwrap();
    assert_eq!(resolver.fetcher().transport().requests(), 2);
}

#[test]
fn test_filter_aliases() {
    let (_temp_dir, resolver) = resolver(manifest(&[
        "cpython-3.12.1+20240101-aarch64-unknown-linux-gnu-pgo_stripped.tar.gz",
        "cpython-3.12.1+20240101-aarch64-unknown-linux-musl-pgo_stripped.tar.gz",
    ]));
    let filters = linux_gnu().with_arch(["arm64"]).with_libc(["glibc"]);
    let variants = resolver.resolve(&filters).unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0].arch, "aarch64");
    assert_eq!(variants[0].libc, "gnu");
}

#[test]
fn test_resolve_exact_ambiguous() {
    let (_temp_dir, resolver) = resolver(manifest(&[
        "cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz",
        "cpython-3.12.1+20240101-x86_64-pc-linux-gnu-pgo_stripped.tar.gz",
    ]));
    let err = resolver.resolve_exact(&linux_gnu(), "3.12.1").unwrap_err();
    assert!(matches!(&*err, ErrorKind::AmbiguousMatch { urls, .. } if urls.len() == 2));
}

#[test]
fn test_resolve_exact_no_match_names_criteria() {
    let (_temp_dir, resolver) =
        resolver(manifest(&["cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz"]));
    let err = resolver.resolve_exact(&linux_gnu(), "3.13.0").unwrap_err();
    match &*err {
        ErrorKind::NoMatch(criteria) => {
            assert!(criteria.contains("3.13.0"));
            assert!(criteria.contains("arch=x86_64"));
        },
        other => panic!("expected NoMatch, got {other:?}"),
    }
}

#[test]
fn test_invalid_manifest() {
    let (_temp_dir, resolver) = resolver(b"<html>rate limited</html>".to_vec());
    let err = resolver.resolve(&linux_gnu()).unwrap_err();
    assert_eq!(*err, ErrorKind::InvalidManifest);
}

#[test]
fn test_unreachable_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    let resolver = Resolver::new(MANIFEST_URL, ContentCache::new(temp_dir.path(), MockTransport::default()));
    let err = resolver.resolve(&linux_gnu()).unwrap_err();
    assert_eq!(*err, ErrorKind::Fetch);
}
