//! Virtual environments built from installed interpreters.

use crate::error::{ErrorKind, Result};
use crate::versions::InstalledVersion;
use exn::ResultExt;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use tracing::instrument;

/// Packages refreshed in every environment before user packages are installed.
const BOOTSTRAP_PACKAGES: [&str; 2] = ["pip", "certifi"];

/// A virtual environment and the installed build it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub path: PathBuf,
    pub base: InstalledVersion,
}

/// An installed build and how many environments use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionUsage {
    pub version: InstalledVersion,
    pub environments: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub environments: Vec<Environment>,
    pub versions: Vec<VersionUsage>,
}

#[derive(Debug, Clone)]
pub struct EnvStore {
    venvs: PathBuf,
}

impl EnvStore {
    pub fn new(venvs: impl Into<PathBuf>) -> Self {
        Self { venvs: venvs.into() }
    }

    pub fn path(&self) -> &Path {
        &self.venvs
    }

    /// Location of the environment `name`, which must be a plain directory name.
    pub fn env_path(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.venvs.join(name)),
            _ => exn::bail!(ErrorKind::InvalidName(name.to_string())),
        }
    }

    fn existing(&self, name: &str) -> Result<PathBuf> {
        let path = self.env_path(name)?;
        if !path.exists() {
            exn::bail!(ErrorKind::NotFound(path.display().to_string()));
        }
        Ok(path)
    }

    /// Create environment `name` with `interpreter`, then install `packages`.
    #[instrument(level = "debug", skip(self, interpreter, packages), fields(interpreter = %interpreter.display()))]
    pub fn create(&self, name: &str, interpreter: &Path, packages: &[String]) -> Result<PathBuf> {
        let target = self.env_path(name)?;
        if target.exists() {
            exn::bail!(ErrorKind::AlreadyExists(target.display().to_string()));
        }
        fs::create_dir_all(&self.venvs).or_raise(|| ErrorKind::Io)?;

        run(Command::new(interpreter).args([OsStr::new("-m"), OsStr::new("venv"), target.as_os_str()]))?;
        tracing::info!("Created environment {name}: {}", target.display());

        if !packages.is_empty() {
            let pip = target.join("bin").join("pip");
            run(Command::new(&pip).args(["install", "-U"]).args(BOOTSTRAP_PACKAGES))?;
            run(Command::new(&pip).args(["install", "-U"]).args(packages))?;
            tracing::info!("Installed packages {}", packages.join(", "));
        }
        Ok(target)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&self, name: &str) -> Result<()> {
        let target = self.existing(name)?;
        fs::remove_dir_all(&target).or_raise(|| ErrorKind::Io)?;
        tracing::info!("Removed environment {name}: {}", target.display());
        Ok(())
    }

    /// The shell command activating `name`, for the shell at `shell`.
    ///
    /// Only the shell's file name matters: `fish` and `csh` have their own
    /// scripts, everything else gets the POSIX one.
    pub fn activation(&self, name: &str, shell: &Path) -> Result<String> {
        let target = self.existing(name)?;
        let script = match shell.file_name().and_then(OsStr::to_str) {
            Some("fish") => "activate.fish",
            Some("csh") => "activate.csh",
            _ => "activate",
        };
        Ok(format!("source {}", target.join("bin").join(script).display()))
    }

    /// Every environment created from one of `versions`, and the number of
    /// environments using each version.
    ///
    /// An environment belongs to the installed build its `bin/python`
    /// resolves into; environments whose interpreter doesn't lead back to a
    /// build with metadata are left out.
    pub fn list(&self, versions: Vec<InstalledVersion>) -> Result<Listing> {
        let entries = match fs::read_dir(&self.venvs) {
            Ok(entries) => Some(entries),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
        };
        let mut environments = Vec::new();
        for entry in entries.into_iter().flatten() {
            let path = entry.or_raise(|| ErrorKind::Io)?.path();
            let Some(base) = base_install(&path) else {
                continue;
            };
            match InstalledVersion::load(&base) {
                Ok(base) => environments.push(Environment {
                    name: path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default(),
                    path,
                    base,
                }),
                Err(e) => tracing::debug!("Skipping environment {}: {}", path.display(), *e),
            }
        }
        environments.sort_by(|a, b| {
            b.base.variant.version.cmp(&a.base.variant.version).then_with(|| a.name.cmp(&b.name))
        });

        let versions = versions
            .into_iter()
            .map(|version| {
                let root = fs::canonicalize(&version.path).unwrap_or_else(|_| version.path.clone());
                let count = environments.iter().filter(|env| env.base.path == root).count();
                VersionUsage { version, environments: count }
            })
            .collect();
        Ok(Listing { environments, versions })
    }
}

/// Root of the installed build an environment's interpreter resolves into.
fn base_install(env: &Path) -> Option<PathBuf> {
    let interpreter = fs::canonicalize(env.join("bin").join("python")).ok()?;
    Some(interpreter.parent()?.parent()?.to_path_buf())
}

fn run(command: &mut Command) -> Result<()> {
    tracing::debug!(?command, "Running");
    let status = command.status().or_raise(|| ErrorKind::Builder(format!("{:?}", command.get_program())))?;
    if !status.success() {
        exn::bail!(ErrorKind::Builder(status.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fake_install(versions: &Path, asset: &str) -> InstalledVersion {
        let variant = snak_release::parse(asset, "https://example.com").unwrap();
        let path = versions.join(variant.install_name());
        fs::create_dir_all(path.join("bin")).unwrap();
        fs::write(path.join("bin/python3"), "").unwrap();
        std::os::unix::fs::symlink("python3", path.join("bin/python")).unwrap();
        fs::write(path.join("version.json"), serde_json::to_string(&variant).unwrap()).unwrap();
        InstalledVersion::load(&path).unwrap()
    }

    fn fake_env(store: &EnvStore, name: &str, base: &InstalledVersion) {
        let bin = store.path().join(name).join("bin");
        fs::create_dir_all(&bin).unwrap();
        std::os::unix::fs::symlink(base.interpreter(), bin.join("python")).unwrap();
        for script in ["activate", "activate.fish", "activate.csh"] {
            fs::write(bin.join(script), "").unwrap();
        }
    }

    #[rstest]
    #[case("/usr/bin/fish", "activate.fish")]
    #[case("/bin/csh", "activate.csh")]
    #[case("/bin/bash", "activate")]
    #[case("/usr/bin/zsh", "activate")]
    #[case("", "activate")]
    fn test_activation(#[case] shell: &str, #[case] script: &str) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(temp_dir.path());
        fs::create_dir_all(temp_dir.path().join("web")).unwrap();
        let line = store.activation("web", Path::new(shell)).unwrap();
        assert_eq!(line, format!("source {}", temp_dir.path().join("web/bin").join(script).display()));
    }

    #[test]
    fn test_activation_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = EnvStore::new(temp_dir.path()).activation("ghost", Path::new("/bin/sh")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("../outside")]
    #[case("nested/env")]
    #[case("/absolute")]
    fn test_invalid_names(#[case] name: &str) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(temp_dir.path());
        assert_eq!(*store.env_path(name).unwrap_err(), ErrorKind::InvalidName(name.to_string()));
        assert!(store.remove(name).is_err());
    }

    #[test]
    fn test_remove() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(temp_dir.path());
        fs::create_dir_all(temp_dir.path().join("web/lib/site-packages")).unwrap();
        store.remove("web").unwrap();
        assert!(!temp_dir.path().join("web").exists());
        let err = store.remove("web").unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_create_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(temp_dir.path());
        fs::create_dir_all(temp_dir.path().join("web")).unwrap();
        let err = store.create("web", Path::new("/nonexistent/python"), &[]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
    }

    #[test]
    fn test_create_missing_interpreter() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = EnvStore::new(temp_dir.path());
        let err = store.create("web", &temp_dir.path().join("no-python"), &[]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Builder(_)));
    }

    #[test]
    fn test_list_with_usage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let versions = temp_dir.path().join("versions");
        let old = fake_install(&versions, "cpython-3.11.7+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz");
        let new = fake_install(&versions, "cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz");
        let unused = fake_install(&versions, "cpython-3.10.13+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz");

        let store = EnvStore::new(temp_dir.path().join("envs"));
        fake_env(&store, "api", &new);
        fake_env(&store, "web", &new);
        fake_env(&store, "legacy", &old);
        // Interpreter that no longer exists.
        fs::create_dir_all(store.path().join("dangling/bin")).unwrap();
        std::os::unix::fs::symlink("/nonexistent/python", store.path().join("dangling/bin/python")).unwrap();

        let listing = store.list(vec![new.clone(), old.clone(), unused.clone()]).unwrap();
        let names: Vec<&str> = listing.environments.iter().map(|env| env.name.as_str()).collect();
        assert_eq!(names, ["api", "web", "legacy"]);
        assert_eq!(listing.environments[2].base.variant, old.variant);

        let usage: Vec<(String, usize)> = listing
            .versions
            .iter()
            .map(|usage| (usage.version.variant.version.to_string(), usage.environments))
            .collect();
        assert_eq!(usage, [("3.12.1".to_string(), 2), ("3.11.7".to_string(), 1), ("3.10.13".to_string(), 0)]);
    }

    #[test]
    fn test_list_without_envs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let listing = EnvStore::new(temp_dir.path().join("envs")).list(Vec::new()).unwrap();
        assert_eq!(listing, Listing::default());
    }
}
