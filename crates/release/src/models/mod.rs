mod manifest;
mod variant;
mod version;

pub use self::manifest::{Asset, Manifest};
pub use self::variant::ReleaseVariant;
pub use self::version::VersionNumber;
