use super::Context;
use crate::cli::{CreateArgs, EnvCommand};
use crate::error::{ErrorKind, Result};
use crate::table::Style;
use comfy_table::Table;
use exn::ResultExt;
use snak_store::error::ErrorKind as StoreErrorKind;
use snak_store::{InstalledVersion, Listing};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

const DEFAULT_SHELL: &str = "/bin/bash";

pub fn run(ctx: &Context, command: EnvCommand) -> Result<()> {
    match command {
        EnvCommand::List => list(ctx),
        EnvCommand::Create(args) => create(ctx, args),
        EnvCommand::Remove { env } => ctx.envs().remove(&env).map_err(ErrorKind::store),
        EnvCommand::Activate { env } => activate(ctx, &env),
    }
}

fn list(ctx: &Context) -> Result<()> {
    let versions = ctx.versions().installed().map_err(ErrorKind::store)?;
    let listing = ctx.envs().list(versions).map_err(ErrorKind::store)?;
    println!("{}", listing_table(ctx.style, &listing));
    Ok(())
}

/// Each installed version, followed by the environments built from it.
fn listing_table(style: Style, listing: &Listing) -> Table {
    let mut table = style.table(["#", "Python version", "venv", "Used", "Name"]);
    let mut rows: Vec<[String; 4]> = Vec::new();
    for usage in &listing.versions {
        let version = &usage.version;
        rows.push([
            version.variant.version.to_string(),
            style.mark(false).to_string(),
            usage.environments.to_string(),
            version.name.clone(),
        ]);
        for env in listing.environments.iter().filter(|env| env.base.name == version.name) {
            rows.push([version.variant.version.to_string(), style.mark(true).to_string(), String::new(), env.name.clone()]);
        }
    }
    // Environments built from an interpreter outside the version store.
    for env in &listing.environments {
        if !listing.versions.iter().any(|usage| usage.version.name == env.base.name) {
            rows.push([env.base.variant.version.to_string(), style.mark(true).to_string(), String::new(), env.name.clone()]);
        }
    }
    for (index, row) in rows.into_iter().enumerate() {
        let mut cells = vec![(index + 1).to_string()];
        cells.extend(row);
        table.add_row(cells);
    }
    table
}

fn create(ctx: &Context, args: CreateArgs) -> Result<()> {
    let envs = ctx.envs();
    let target = envs.env_path(&args.name).map_err(ErrorKind::store)?;
    if target.exists() {
        exn::bail!(ErrorKind::Store(StoreErrorKind::AlreadyExists(target.display().to_string())));
    }
    let versions = ctx.versions().installed().map_err(ErrorKind::store)?;
    if versions.is_empty() {
        exn::bail!(ErrorKind::NoVersions);
    }
    let version = match &args.python {
        Some(wanted) => find(&versions, wanted)?,
        None => prompt(ctx.style, &versions, &mut io::stdin().lock(), &mut io::stdout())?,
    };
    envs.create(&args.name, &version.interpreter(), &args.packages).map_err(ErrorKind::store)?;
    Ok(())
}

/// An installed version by install name, or by version number if only one build has it.
fn find<'a>(versions: &'a [InstalledVersion], wanted: &str) -> Result<&'a InstalledVersion> {
    if let Some(version) = versions.iter().find(|version| version.name == wanted) {
        return Ok(version);
    }
    let matching: Vec<&InstalledVersion> =
        versions.iter().filter(|version| version.variant.version.to_string() == wanted).collect();
    match matching.as_slice() {
        [version] => Ok(*version),
        [] => exn::bail!(ErrorKind::Selection(format!("Python {wanted} is not installed"))),
        _ => {
            let names: Vec<&str> = matching.iter().map(|version| version.name.as_str()).collect();
            exn::bail!(ErrorKind::Selection(format!("several builds of Python {wanted} installed: {}", names.join(", "))))
        },
    }
}

/// Ask which installed version to use until a valid number is given.
fn prompt<'a>(
    style: Style,
    versions: &'a [InstalledVersion],
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<&'a InstalledVersion> {
    let mut table = style.table(["#", "Python version", "Name"]);
    for (index, version) in versions.iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), version.variant.version.to_string(), version.name.clone()]);
    }
    writeln!(output, "{table}").or_raise(|| ErrorKind::Terminal)?;
    let mut question = "Select Python version number: ";
    loop {
        write!(output, "{question}").or_raise(|| ErrorKind::Terminal)?;
        output.flush().or_raise(|| ErrorKind::Terminal)?;
        let mut answer = String::new();
        if input.read_line(&mut answer).or_raise(|| ErrorKind::Terminal)? == 0 {
            exn::bail!(ErrorKind::Selection("no Python version selected".to_string()));
        }
        let selected = answer.trim().parse::<usize>().ok().and_then(|number| number.checked_sub(1));
        if let Some(version) = selected.and_then(|index| versions.get(index)) {
            return Ok(version);
        }
        question = "Invalid version number, select again: ";
    }
}

fn activate(ctx: &Context, env: &str) -> Result<()> {
    let line = ctx.envs().activation(env, &shell()).map_err(ErrorKind::store)?;
    if io::stdout().is_terminal() {
        tracing::warn!("For activating environment in current shell use eval expression");
    } else {
        tracing::info!("Activated environment {env}");
    }
    println!("{line}");
    Ok(())
}

/// The user's login shell, with symlinks resolved (`/bin/sh` may well be `dash`).
fn shell() -> PathBuf {
    let shell = std::env::var_os("SHELL").map_or_else(|| PathBuf::from(DEFAULT_SHELL), PathBuf::from);
    std::fs::canonicalize(&shell).unwrap_or(shell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use snak_store::{Environment, VersionUsage};
    use std::io::Cursor;
    use std::path::Path;

    fn installed(asset: &str) -> InstalledVersion {
        let variant = snak_release::parse(asset, "https://example.com").unwrap();
        let name = variant.install_name();
        InstalledVersion { path: Path::new("/opt/python/versions").join(&name), name, variant }
    }

    fn versions() -> Vec<InstalledVersion> {
        vec![
            installed("cpython-3.12.1+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz"),
            installed("cpython-3.12.1+20240101-x86_64-unknown-linux-musl-pgo_stripped.tar.gz"),
            installed("cpython-3.11.7+20240101-x86_64-unknown-linux-gnu-pgo_stripped.tar.gz"),
        ]
    }

    #[rstest]
    #[case("1\n", 0)]
    #[case("  3 \n", 2)]
    #[case("0\nabc\n4\n\n2\n", 1)]
    fn test_prompt(#[case] answers: &str, #[case] expected: usize) {
        let versions = versions();
        let mut output = Vec::new();
        let selected = prompt(Style { unicode: false }, &versions, &mut Cursor::new(answers), &mut output).unwrap();
        assert_eq!(selected, &versions[expected]);

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("3.11.7"));
        assert!(output.contains("Select Python version number: "));
    }

    #[test]
    fn test_prompt_retries_are_announced() {
        let versions = versions();
        let mut output = Vec::new();
        prompt(Style { unicode: false }, &versions, &mut Cursor::new("9\n1\n"), &mut output).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("Invalid version number, select again: "));
    }

    #[test]
    fn test_prompt_end_of_input() {
        let versions = versions();
        let err = prompt(Style { unicode: false }, &versions, &mut Cursor::new("7\n"), &mut Vec::new()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Selection(_)));
    }

    #[test]
    fn test_find() {
        let versions = versions();
        assert_eq!(find(&versions, "3.11.7").unwrap(), &versions[2]);
        assert_eq!(find(&versions, "3.12.1-x86_64-unknown-linux-musl-pgo_stripped").unwrap(), &versions[1]);
        assert!(matches!(&*find(&versions, "3.12.1").unwrap_err(), ErrorKind::Selection(message) if message.contains("several")));
        assert!(matches!(&*find(&versions, "3.13.0").unwrap_err(), ErrorKind::Selection(_)));
    }

    #[test]
    fn test_listing_table() {
        let versions = versions();
        let env = |name: &str, base: &InstalledVersion| Environment {
            name: name.to_string(),
            path: Path::new("/opt/python/envs").join(name),
            base: base.clone(),
        };
        let listing = Listing {
            environments: vec![env("api", &versions[0]), env("legacy", &versions[2])],
            versions: vec![
                VersionUsage { version: versions[0].clone(), environments: 1 },
                VersionUsage { version: versions[2].clone(), environments: 1 },
            ],
        };
        let table = listing_table(Style { unicode: false }, &listing);
        let names: Vec<String> = table
            .lines()
            .filter_map(|line| line.split_whitespace().last().map(str::to_string))
            .filter(|name| name == "api" || name == "legacy" || name.starts_with("3."))
            .collect();
        assert_eq!(
            names,
            [
                "3.12.1-x86_64-unknown-linux-gnu-pgo_stripped",
                "api",
                "3.11.7-x86_64-unknown-linux-gnu-pgo_stripped",
                "legacy"
            ]
        );
    }
}
