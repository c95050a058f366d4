//! On-disk stores for snak.
//!
//! - [`VersionStore`]: interpreter builds, unpacked from release archives,
//!   each with a `version.json` describing the [`ReleaseVariant`](snak_release::ReleaseVariant)
//!   it was installed from.
//! - [`EnvStore`]: virtual environments created from those builds.
//!
//! Both stores assume a Unix layout (`bin/python`, symlinked interpreters)
//! and only build on Unix targets.

pub mod archive;
mod envs;
pub mod error;
mod versions;

pub use crate::envs::{EnvStore, Environment, Listing, VersionUsage};
pub use crate::versions::{InstalledVersion, METADATA_FILE, VersionStore};
