use super::VersionNumber;
use crate::consts::STRIPPED;
use serde::{Deserialize, Serialize};

/// One installable interpreter build, as resolved from a release asset.
///
/// Every platform field has been through the [`normalize`](crate::normalize)
/// tables; fields that could not be determined hold
/// [`NOT_AVAILABLE`](crate::NOT_AVAILABLE). Values are never mutated after
/// parsing. The same record is written as the `version.json` sidecar of an
/// installed build, so the serialized field names are part of the on-disk
/// format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseVariant {
    #[serde(with = "version_string")]
    pub version: VersionNumber,
    /// Opaque build tag from the asset name (provenance only).
    #[serde(rename = "date")]
    pub release_date: String,
    pub arch: String,
    pub vendor: String,
    pub os: String,
    pub libc: String,
    /// Human-readable build flavour, e.g. `"pgo stripped"` or `"install only"`.
    pub variant: String,
    pub url: String,
}

impl ReleaseVariant {
    /// Whether debug symbols have been stripped from this build.
    pub fn is_stripped(&self) -> bool {
        self.variant.contains(STRIPPED)
    }

    /// Canonical directory name of this build once installed.
    ///
    /// See [`install_name`](crate::install_name).
    pub fn install_name(&self) -> String {
        crate::install_name(self)
    }
}

mod version_string {
    use super::VersionNumber;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(version: &VersionNumber, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(version)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<VersionNumber, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| D::Error::custom(format!("invalid version number: {raw}")))
    }
}
