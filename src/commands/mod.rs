//! Subcommand implementations.

mod config;
mod env;
mod versions;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use crate::table::Style;
use snak_cache::{ContentCache, HttpTransport};
use snak_config::Config;
use snak_release::Resolver;
use snak_store::{EnvStore, VersionStore};
use std::path::PathBuf;

/// Loaded configuration, and the components built from it.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub style: Style,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => snak_config::default_config_path().map_err(ErrorKind::config)?,
        };
        let config = Config::load(&config_path).map_err(ErrorKind::config)?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(Self { config, config_path, style: Style::detect() })
    }

    pub fn resolver(&self) -> Result<Resolver<ContentCache>> {
        let transport = HttpTransport::new().map_err(ErrorKind::cache)?;
        let cache = ContentCache::new(&self.config.paths.cache, transport);
        Ok(Resolver::new(&self.config.releases.url, cache))
    }

    /// Archives are unpacked under the cache directory, next to the downloads.
    pub fn versions(&self) -> VersionStore {
        VersionStore::new(&self.config.paths.versions, &self.config.paths.cache)
    }

    pub fn envs(&self) -> EnvStore {
        EnvStore::new(&self.config.paths.venvs)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.config)?;
    match cli.command {
        Command::Versions(command) => versions::run(&ctx, command),
        Command::Env(command) => env::run(&ctx, command),
        Command::Config(command) => config::run(&ctx, command),
    }
}
