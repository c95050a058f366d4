//! Layered configuration for snak.
//!
//! Values are merged from, lowest precedence first:
//!
//! 1. built-in defaults, which differ between root and unprivileged users,
//! 2. the TOML configuration file,
//! 3. `SNAK_`-prefixed environment variables, nested with `__`
//!    (`SNAK_PATHS__CACHE=/tmp/cache`).
//!
//! ```toml
//! [releases]
//! url = "https://api.github.com/repos/astral-sh/python-build-standalone/releases/latest"
//!
//! [paths]
//! cache = "~/.cache/snak"
//! versions = "/opt/python/versions"
//! ```

pub mod error;
mod file;

pub use crate::file::{ConfigFile, KEYS};

use crate::error::{ErrorKind, Result};
use directories::BaseDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "SNAK_";
pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/astral-sh/python-build-standalone/releases/latest";

const APP: &str = "snak";
const SYSTEM_CONFIG: &str = "/etc/snak.toml";
const SYSTEM_CACHE: &str = "/var/cache/snak";
const SYSTEM_BASE: &str = "/opt/python";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub releases: Releases,
    pub paths: Paths,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Releases {
    /// Release manifest listing the downloadable builds.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paths {
    /// Root of the download cache.
    pub cache: PathBuf,
    /// Where virtual environments are created.
    pub venvs: PathBuf,
    /// Where interpreter builds are installed.
    pub versions: PathBuf,
}

impl Config {
    /// Defaults for the effective user.
    pub fn defaults() -> Result<Self> {
        if is_root() {
            return Ok(Self::system());
        }
        let dirs = BaseDirs::new().ok_or_raise(|| ErrorKind::NoHomeDirectory)?;
        Ok(Self::user(dirs.cache_dir(), dirs.data_dir()))
    }

    /// System-wide defaults used when running as root.
    pub fn system() -> Self {
        Self::with_locations(Path::new(SYSTEM_CACHE), Path::new(SYSTEM_BASE))
    }

    /// Per-user defaults rooted in the user's cache and data directories.
    pub fn user(cache_dir: &Path, data_dir: &Path) -> Self {
        Self::with_locations(&cache_dir.join(APP), &data_dir.join(APP))
    }

    fn with_locations(cache: &Path, base: &Path) -> Self {
        Self {
            releases: Releases { url: DEFAULT_RELEASES_URL.to_string() },
            paths: Paths {
                cache: cache.to_path_buf(),
                venvs: base.join("envs"),
                versions: base.join("versions"),
            },
        }
    }

    /// Load the configuration for the effective user from `path`.
    ///
    /// A missing file is not an error: defaults and environment still apply.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(Self::defaults()?, path)
    }

    /// Like [`Config::load`], on top of explicit defaults.
    pub fn load_with(defaults: Config, path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading configuration");
        let config: Config = Figment::from(Serialized::defaults(defaults))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        Ok(config.expanded())
    }

    fn expanded(self) -> Self {
        Self {
            releases: self.releases,
            paths: Paths {
                cache: expand_home(&self.paths.cache),
                venvs: expand_home(&self.paths.venvs),
                versions: expand_home(&self.paths.versions),
            },
        }
    }

    /// Every option as `(section, key, value)`, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, &'static str, String)> {
        vec![
            ("releases", "url", self.releases.url.clone()),
            ("paths", "cache", self.paths.cache.display().to_string()),
            ("paths", "venvs", self.paths.venvs.display().to_string()),
            ("paths", "versions", self.paths.versions.display().to_string()),
        ]
    }
}

/// Location of the configuration file for the effective user.
pub fn default_config_path() -> Result<PathBuf> {
    if is_root() {
        return Ok(PathBuf::from(SYSTEM_CONFIG));
    }
    let dirs = BaseDirs::new().ok_or_raise(|| ErrorKind::NoHomeDirectory)?;
    Ok(dirs.data_dir().join(APP).join("config.toml"))
}

fn is_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

/// Replace a leading `~` component with the home directory.
///
/// Paths without one, or when no home directory is known, are returned as is.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
