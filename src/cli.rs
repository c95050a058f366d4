use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Manage standalone Python builds and the virtual environments created from them.
#[derive(Debug, Parser)]
#[command(name = "snak", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file [default: per-user, or /etc/snak.toml as root]
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Python version management
    #[command(subcommand)]
    Versions(VersionsCommand),
    /// Virtual environment management
    #[command(subcommand)]
    Env(EnvCommand),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum VersionsCommand {
    /// List all available Python versions
    List(ListArgs),
    /// Install a Python version
    Install(InstallArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Show builds with debug symbols instead of stripped ones
    #[arg(long)]
    pub non_stripped: bool,
    /// Architectures to show
    #[arg(long, num_args = 1.., default_value = std::env::consts::ARCH)]
    pub arch: Vec<String>,
    /// C libraries to show; `native` alone shows every build
    #[arg(long, num_args = 1.., default_values = ["native", "gnu", "musl"])]
    pub libc: Vec<String>,
}

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Install a build with debug symbols instead of a stripped one
    #[arg(long)]
    pub non_stripped: bool,
    /// Architecture to install
    #[arg(long, default_value = std::env::consts::ARCH)]
    pub arch: String,
    /// C library to install [default: the one snak was built against]
    #[arg(long)]
    pub libc: Option<String>,
    /// Version to install, e.g. 3.12.1
    #[arg(value_name = "VERSION")]
    pub python_version: String,
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// List all environments and installed versions
    List,
    /// Create a new virtual environment
    Create(CreateArgs),
    /// Remove a virtual environment
    Remove {
        /// Name of the environment to remove
        env: String,
    },
    /// Print the command activating an environment, for use with `eval`
    Activate {
        /// Name of the environment to activate
        env: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Name of the environment to create
    pub name: String,
    /// Packages to install after creation
    #[arg(short, long, num_args = 1..)]
    pub packages: Vec<String>,
    /// Installed version (or install name) to use instead of asking
    #[arg(long, value_name = "VERSION")]
    pub python: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show configuration
    Show,
    /// Set or unset a configuration option; an empty value restores the default
    Set {
        /// Configuration section
        section: String,
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}
