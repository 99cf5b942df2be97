//! The configuration document that collected answers land in.
//!
//! A [`Configurator`] manages a flat TOML file of sections, each a map of
//! key -> value:
//!
//! ```toml
//! [personal]
//! name = "Ada Lovelace"
//!
//! [app]
//! mode = "advanced"
//! ```
//!
//! Section and key names are case-insensitive; they are lowercased once at
//! the boundary (on load and on every accessor call). The original
//! dynamic-accessor surface maps to the typed `get`/`set` pair here.

use crate::assets::expand_tilde;
use crate::prefs::PrefSet;
use crate::{Error, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use toml::value::{Table, Value};

/// A file-backed, section/key-structured configuration document.
pub struct Configurator {
    path: PathBuf,
    data: Table,
    /// The application's current version, set by the caller for
    /// [`Configurator::compare_version`].
    pub current_version: Option<String>,
    /// The version at which the configuration format last changed.
    pub last_version: Option<String>,
}

impl Configurator {
    /// Open a configuration document, merging the file's contents when it
    /// exists. A missing file yields an empty document; a malformed one is a
    /// fatal parse error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_tilde(&path.as_ref().to_string_lossy());
        let mut data = Table::new();

        if path.is_file() {
            let raw = fs::read_to_string(&path)?;
            let parsed: Table = toml::from_str(&raw)?;
            data = normalize_keys(parsed);
        }

        Ok(Self {
            path,
            data,
            current_version: None,
            last_version: None,
        })
    }

    /// The file this document loads from and saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw document contents.
    pub fn data(&self) -> &Table {
        &self.data
    }

    /// Add a new empty section. Fails if the section already exists.
    pub fn add_section(&mut self, name: &str) -> Result<()> {
        let name = name.to_lowercase();
        if self.data.contains_key(&name) {
            return Err(Error::SectionExists(name));
        }
        self.data.insert(name, Value::Table(Table::new()));
        Ok(())
    }

    /// Remove a section. Fails if the section does not exist.
    pub fn delete_section(&mut self, name: &str) -> Result<()> {
        let name = name.to_lowercase();
        if self.data.remove(&name).is_none() {
            return Err(Error::SectionNotFound(name));
        }
        Ok(())
    }

    /// Whether a section exists.
    pub fn has_section(&self, name: &str) -> bool {
        self.data.contains_key(&name.to_lowercase())
    }

    /// Read a value.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.data
            .get(&section.to_lowercase())?
            .as_table()?
            .get(&key.to_lowercase())
    }

    /// Read a value as a string slice.
    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key)?.as_str()
    }

    /// Write a value, creating the section if needed. A non-table value
    /// squatting on the section name is replaced by a fresh section.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let section = section.to_lowercase();
        let entry = self
            .data
            .entry(section)
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        if let Some(table) = entry.as_table_mut() {
            table.insert(key.to_lowercase(), value.into());
        }
    }

    /// Record every answered preference: ensure its section exists, then
    /// write `config_key -> answer`.
    pub fn ingest(&mut self, prefs: &PrefSet) -> Result<()> {
        for pref in prefs.answered() {
            if !self.has_section(&pref.config_section) {
                self.add_section(&pref.config_section)?;
            }
            if let Some(answer) = &pref.answer {
                self.set(&pref.config_section, &pref.config_key, answer.as_str());
            }
        }
        Ok(())
    }

    /// Copy the backing file to `<path>-<unix-timestamp>` alongside the
    /// original, returning the backup path.
    pub fn backup(&self) -> Result<PathBuf> {
        if !self.path.is_file() {
            return Err(Error::Configuration(format!(
                "Cannot back up missing file: {}",
                self.path.display()
            )));
        }
        let backup_path = PathBuf::from(format!(
            "{}-{}",
            self.path.display(),
            Utc::now().timestamp()
        ));
        fs::copy(&self.path, &backup_path)?;
        Ok(backup_path)
    }

    /// Compare the tracked versions. Returns `(current, last)` when the
    /// current version is absent or behind the version at which the
    /// configuration format last changed, signaling that the caller should
    /// run its upgrade path. Returns `None` when no last version is tracked
    /// or nothing needs upgrading.
    pub fn compare_version(&self) -> Option<(String, String)> {
        let last = self.last_version.as_deref()?;
        match self.current_version.as_deref() {
            None => Some((String::new(), last.to_string())),
            Some(current) => {
                if version_behind(current, last)? {
                    Some((current.to_string(), last.to_string()))
                } else {
                    None
                }
            }
        }
    }

    /// Clear the in-memory document.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Serialize the document back to its file as pretty TOML.
    pub fn save(&self) -> Result<()> {
        let rendered = toml::to_string_pretty(&self.data)?;
        fs::write(&self.path, rendered)?;
        Ok(())
    }
}

/// Lowercase every section and key name, recursively through nested tables.
fn normalize_keys(table: Table) -> Table {
    table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Table(inner) => Value::Table(normalize_keys(inner)),
                other => other,
            };
            (key.to_lowercase(), value)
        })
        .collect()
}

/// Parse a dotted-numeric version. `None` when any component is non-numeric.
fn version_tuple(version: &str) -> Option<Vec<u64>> {
    version
        .trim()
        .split('.')
        .map(|component| component.parse::<u64>().ok())
        .collect()
}

/// Whether `current` sorts before `last`, with missing components as zero.
/// `None` when either side is not a dotted-numeric version.
fn version_behind(current: &str, last: &str) -> Option<bool> {
    let mut a = version_tuple(current)?;
    let mut b = version_tuple(last)?;
    let len = a.len().max(b.len());
    a.resize(len, 0);
    b.resize(len, 0);
    Some(a < b)
}
