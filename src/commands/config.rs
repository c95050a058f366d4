use super::Context;
use crate::cli::ConfigCommand;
use crate::error::{ErrorKind, Result};
use snak_config::ConfigFile;

pub fn run(ctx: &Context, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let mut table = ctx.style.table(["Section", "Key", "Value"]);
            for (section, key, value) in ctx.config.entries() {
                table.add_row(vec![section.to_string(), key.to_string(), value]);
            }
            tracing::debug!("Configuration file: {}", ctx.config_path.display());
            println!("{table}");
            Ok(())
        },
        ConfigCommand::Set { section, key, value } => {
            let mut file = ConfigFile::open(&ctx.config_path).map_err(ErrorKind::config)?;
            file.set(&section, &key, &value).map_err(ErrorKind::config)?;
            file.save().map_err(ErrorKind::config)?;
            match value.is_empty() {
                true => tracing::info!("Unset {section}.{key}"),
                false => tracing::info!("Set {section}.{key} = {value}"),
            }
            Ok(())
        },
    }
}
