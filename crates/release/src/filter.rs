//! Platform filter criteria.

use crate::models::ReleaseVariant;
use crate::normalize;
use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Which builds a caller is interested in.
///
/// Sets hold raw, user-facing tokens (`arm64`, `glibc`, `native`); they are
/// normalized through the same tables as parsed assets before comparison.
/// There is no "don't care" for strip status: `stripped` must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub arch: BTreeSet<String>,
    pub os: BTreeSet<String>,
    pub libc: BTreeSet<String>,
    pub stripped: bool,
}

impl Filters {
    /// Criteria describing the running platform, preferring stripped builds.
    pub fn host() -> Self {
        Self {
            arch: BTreeSet::from([std::env::consts::ARCH.to_string()]),
            os: BTreeSet::from([std::env::consts::OS.to_string()]),
            libc: BTreeSet::from([host_libc().to_string()]),
            stripped: true,
        }
    }

    pub fn with_arch(mut self, arch: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.arch = arch.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_os(mut self, os: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.os = os.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_libc(mut self, libc: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.libc = libc.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stripped(mut self, stripped: bool) -> Self {
        self.stripped = stripped;
        self
    }

    /// Normalize every token once, ready for matching many variants.
    pub(crate) fn compile(&self) -> Matcher {
        let libc: HashSet<Option<String>> =
            self.libc.iter().map(|token| normalize::libc(token).map(str::to_string)).collect();
        // Only a set made up entirely of "native" spellings lifts the constraint.
        let libc = match libc.len() == 1 && libc.contains(&None) {
            true => None,
            false => Some(libc),
        };
        Matcher {
            arch: self.arch.iter().map(|token| normalize::arch(token).to_string()).collect(),
            os: self.os.iter().map(|token| normalize::os(token).to_string()).collect(),
            libc,
            stripped: self.stripped,
        }
    }
}

impl Display for Filters {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let join = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(",");
        write!(
            f,
            "arch={} os={} libc={} stripped={}",
            join(&self.arch),
            join(&self.os),
            join(&self.libc),
            self.stripped
        )
    }
}

/// The C library the running binary was built against, spelled the way
/// the rest of the platform tooling spells it.
fn host_libc() -> &'static str {
    if cfg!(target_env = "gnu") {
        "glibc"
    } else if cfg!(target_env = "musl") {
        "musl"
    } else {
        ""
    }
}

/// Normalized form of [`Filters`].
#[derive(Debug)]
pub(crate) struct Matcher {
    arch: HashSet<String>,
    os: HashSet<String>,
    /// `None` when any libc is acceptable.
    libc: Option<HashSet<Option<String>>>,
    stripped: bool,
}

impl Matcher {
    pub(crate) fn matches(&self, variant: &ReleaseVariant) -> bool {
        if !self.arch.contains(&variant.arch) || !self.os.contains(&variant.os) {
            return false;
        }
        if let Some(libc) = &self.libc
            && !libc.contains(&normalize::libc(&variant.libc).map(str::to_string))
        {
            return false;
        }
        variant.is_stripped() == self.stripped
    }
}
