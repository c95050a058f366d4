//! Synonym tables for platform tokens.
//!
//! Asset names, the running platform and user input all spell the same
//! platform in different ways (`amd64` vs `x86_64`, `glibc` vs `gnu`). Every
//! token goes through these tables before being compared. Tokens missing from
//! a table pass through unchanged, and are compared literally.

use std::collections::HashMap;
use std::sync::LazyLock;

static ARCHITECTURES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("x86_64", "x86_64"),
        ("amd64", "x86_64"),
        ("arm64", "aarch64"),
        ("aarch64", "aarch64"),
    ])
});

static OPERATING_SYSTEMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("linux", "linux"),
        ("darwin", "darwin"),
        // Rust's name for it (`std::env::consts::OS`).
        ("macos", "darwin"),
    ])
});

/// `None` means "no particular libc", i.e. the platform's own.
static LIBCS: LazyLock<HashMap<&'static str, Option<&'static str>>> = LazyLock::new(|| {
    HashMap::from([
        ("glibc", Some("gnu")),
        ("", None),
        ("native", None),
    ])
});

/// Canonical architecture name.
///
/// ```
/// use snak_release::normalize;
/// assert_eq!(normalize::arch("amd64"), "x86_64");
/// assert_eq!(normalize::arch("armv7"), "armv7");
/// ```
pub fn arch(token: &str) -> &str {
    ARCHITECTURES.get(token).copied().unwrap_or(token)
}

/// Canonical operating system name.
pub fn os(token: &str) -> &str {
    OPERATING_SYSTEMS.get(token).copied().unwrap_or(token)
}

/// Canonical libc name, or `None` for the platform's native libc.
///
/// ```
/// use snak_release::normalize;
/// assert_eq!(normalize::libc("glibc"), Some("gnu"));
/// assert_eq!(normalize::libc("native"), None);
/// assert_eq!(normalize::libc("musl"), Some("musl"));
/// ```
pub fn libc(token: &str) -> Option<&str> {
    match LIBCS.get(token) {
        Some(mapped) => *mapped,
        None => Some(token),
    }
}
