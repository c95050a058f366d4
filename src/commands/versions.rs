use super::Context;
use crate::cli::{InstallArgs, ListArgs, VersionsCommand};
use crate::error::{ErrorKind, Result};
use crate::table::Style;
use comfy_table::Table;
use snak_cache::{DEFAULT_MAX_AGE, Fetch};
use snak_release::{Filters, ReleaseVariant, Resolver};
use snak_store::VersionStore;
use snak_store::error::ErrorKind as StoreErrorKind;
use std::path::PathBuf;

pub fn run(ctx: &Context, command: VersionsCommand) -> Result<()> {
    match command {
        VersionsCommand::List(args) => list(ctx, args),
        VersionsCommand::Install(args) => install(ctx, args),
    }
}

fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let filters = Filters::host().with_arch(args.arch).with_libc(args.libc).with_stripped(!args.non_stripped);
    let variants = ctx.resolver()?.resolve(&filters).map_err(ErrorKind::release)?;
    if variants.is_empty() {
        tracing::warn!("No builds found matching {filters}");
        return Ok(());
    }
    let store = ctx.versions();
    println!("{}", versions_table(ctx.style, &variants, |variant| store.is_installed(variant)));
    Ok(())
}

fn versions_table(style: Style, variants: &[ReleaseVariant], is_installed: impl Fn(&ReleaseVariant) -> bool) -> Table {
    let mut table = style.table(["#", "Version", "Arch", "OS", "Platform", "Libc", "Stripped", "Installed"]);
    for (index, variant) in variants.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            variant.version.to_string(),
            variant.arch.clone(),
            variant.os.clone(),
            variant.vendor.clone(),
            variant.libc.clone(),
            style.mark(variant.is_stripped()).to_string(),
            style.mark(is_installed(variant)).to_string(),
        ]);
    }
    table
}

fn install(ctx: &Context, args: InstallArgs) -> Result<()> {
    let mut filters = Filters::host().with_arch([args.arch]).with_stripped(!args.non_stripped);
    if let Some(libc) = args.libc {
        filters = filters.with_libc([libc]);
    }
    install_build(&ctx.resolver()?, &ctx.versions(), &filters, &args.python_version)?;
    Ok(())
}

/// Resolve exactly one build of `version`, download it and install it into `store`.
fn install_build<F: Fetch>(
    resolver: &Resolver<F>,
    store: &VersionStore,
    filters: &Filters,
    version: &str,
) -> Result<PathBuf> {
    let variant = resolver.resolve_exact(filters, version).map_err(ErrorKind::release)?;
    if store.is_installed(&variant) {
        let path = store.install_path(&variant);
        exn::bail!(ErrorKind::Store(StoreErrorKind::AlreadyExists(path.display().to_string())));
    }
    let archive = resolver.fetcher().fetch(&variant.url, DEFAULT_MAX_AGE).map_err(ErrorKind::cache)?;
    store.install(&variant, archive).map_err(ErrorKind::store)
}
