//! In-place editing of the configuration file.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Every `(section, key)` the configuration understands.
pub const KEYS: [(&str, &str); 4] = [("releases", "url"), ("paths", "cache"), ("paths", "venvs"), ("paths", "versions")];

/// The on-disk TOML document, edited without disturbing unrelated content.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    table: Table,
}

impl ConfigFile {
    /// Read the file at `path`; a missing file is an empty document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(content) => content.parse::<Table>().or_raise(|| ErrorKind::Load)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Table::new(),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Load),
        };
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.table.get(section)?.get(key)?.as_str()
    }

    /// Set `section.key`, or unset it when `value` is empty.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        if !KEYS.contains(&(section, key)) {
            exn::bail!(ErrorKind::UnknownKey(format!("{section}.{key}")));
        }
        if value.is_empty() {
            return self.unset(section, key);
        }
        let entry = self.table.entry(section).or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        if let Some(table) = entry.as_table_mut() {
            table.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(())
    }

    /// Remove `section.key`, falling back to its default.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnknownKey`] if the file doesn't set it.
    pub fn unset(&mut self, section: &str, key: &str) -> Result<()> {
        let Some(table) = self.table.get_mut(section).and_then(Value::as_table_mut) else {
            exn::bail!(ErrorKind::UnknownKey(format!("{section}.{key}")));
        };
        if table.remove(key).is_none() {
            exn::bail!(ErrorKind::UnknownKey(format!("{section}.{key}")));
        }
        if table.is_empty() {
            self.table.remove(section);
        }
        Ok(())
    }

    /// Atomically write the document back to its path.
    pub fn save(&self) -> Result<()> {
        let save = || ErrorKind::Save(self.path.display().to_string());
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).or_raise(save)?;
        let content = toml::to_string(&self.table).or_raise(save)?;
        let mut file = tempfile::NamedTempFile::new_in(parent).or_raise(save)?;
        file.write_all(content.as_bytes()).or_raise(save)?;
        file.persist(&self.path).or_raise(save)?;
        tracing::debug!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }
}
