//! Command implementations for the Helmsman CLI.
//!
//! This module contains the business logic for each CLI command. Commands
//! return summary structs that render either as JSON or as human-readable
//! text; the binary decides which based on the `--json` flag.

use crate::assets::{AssetRegistry, AssetResolver};
use crate::config::Configurator;
use crate::prefs::PrefSet;
use crate::terminal::Terminal;
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult: Serialize {
    /// Format for human-readable output.
    fn to_human(&self) -> String;

    /// Serialize to JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Outcome of one `hm ask` run.
#[derive(Debug, Serialize)]
pub struct AskSummary {
    pub prompts_path: String,
    pub config_path: String,
    pub answered: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
}

impl CommandResult for AskSummary {
    fn to_human(&self) -> String {
        let mut out = format!(
            "Recorded {} answer(s) from {} into {}",
            self.answered, self.prompts_path, self.config_path
        );
        if self.skipped > 0 {
            out.push_str(&format!(" ({} prompt(s) skipped)", self.skipped));
        }
        if let Some(backup) = &self.backup_path {
            out.push_str(&format!("\nPrevious configuration backed up to {}", backup));
        }
        out
    }
}

/// Run a wizard: deliver the prompts, ingest the answers, save the config.
///
/// The registry carries any custom assets the embedding application has
/// registered; the stock CLI passes an empty one, leaving the built-ins.
pub fn ask(
    prompts_path: &Path,
    config_path: &Path,
    backup: bool,
    registry: &AssetRegistry,
    terminal: &mut dyn Terminal,
) -> Result<AskSummary> {
    let resolver = AssetResolver::new(registry);

    let mut prefs = PrefSet::from_file(prompts_path)?;
    prefs.ask(&resolver, terminal)?;

    let mut config = Configurator::open(config_path)?;
    let backup_path = if backup && config.path().is_file() {
        Some(config.backup()?)
    } else {
        None
    };
    config.ingest(&prefs)?;
    config.save()?;
    terminal.success(&format!(
        "Configuration saved to {}",
        config.path().display()
    ));

    let answered = prefs.answered().count();
    Ok(AskSummary {
        prompts_path: prompts_path.display().to_string(),
        config_path: config.path().display().to_string(),
        answered,
        skipped: prefs.prefs().len() - answered,
        backup_path: backup_path.map(|p| p.display().to_string()),
    })
}

/// A rendered view of the configuration document (or one section of it).
#[derive(Debug, Serialize)]
pub struct ConfigListing {
    pub config_path: String,
    pub data: toml::value::Table,
}

impl CommandResult for ConfigListing {
    fn to_human(&self) -> String {
        toml::to_string_pretty(&self.data).unwrap_or_else(|_| String::new())
    }
}

/// Print the configuration document, optionally restricted to one section.
pub fn config_list(config_path: &Path, section: Option<&str>) -> Result<ConfigListing> {
    let config = Configurator::open(config_path)?;
    let data = match section {
        Some(name) => {
            let name = name.to_lowercase();
            let value = config
                .data()
                .get(&name)
                .ok_or_else(|| Error::SectionNotFound(name.clone()))?;
            let mut table = toml::value::Table::new();
            table.insert(name, value.clone());
            table
        }
        None => config.data().clone(),
    };
    Ok(ConfigListing {
        config_path: config.path().display().to_string(),
        data,
    })
}

/// One value read from the configuration document.
#[derive(Debug, Serialize)]
pub struct ConfigValue {
    pub section: String,
    pub key: String,
    pub value: toml::Value,
}

impl CommandResult for ConfigValue {
    fn to_human(&self) -> String {
        match self.value.as_str() {
            Some(s) => s.to_string(),
            None => self.value.to_string(),
        }
    }
}

/// Read one value.
pub fn config_get(config_path: &Path, section: &str, key: &str) -> Result<ConfigValue> {
    let config = Configurator::open(config_path)?;
    let value = config
        .get(section, key)
        .ok_or_else(|| Error::NotFound(format!("{}.{}", section, key)))?
        .clone();
    Ok(ConfigValue {
        section: section.to_lowercase(),
        key: key.to_lowercase(),
        value,
    })
}

/// Write one value and save the document.
pub fn config_set(config_path: &Path, section: &str, key: &str, value: &str) -> Result<ConfigValue> {
    let mut config = Configurator::open(config_path)?;
    config.set(section, key, value);
    config.save()?;
    Ok(ConfigValue {
        section: section.to_lowercase(),
        key: key.to_lowercase(),
        value: toml::Value::String(value.to_string()),
    })
}

/// Outcome of a configuration backup.
#[derive(Debug, Serialize)]
pub struct BackupSummary {
    pub config_path: String,
    pub backup_path: String,
}

impl CommandResult for BackupSummary {
    fn to_human(&self) -> String {
        format!("Backed up {} to {}", self.config_path, self.backup_path)
    }
}

/// Copy the configuration file to a timestamped backup alongside it.
pub fn config_backup(config_path: &Path) -> Result<BackupSummary> {
    let config = Configurator::open(config_path)?;
    let backup_path = config.backup()?;
    Ok(BackupSummary {
        config_path: config.path().display().to_string(),
        backup_path: backup_path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::testing::ScriptedTerminal;
    use std::io::Write;

    fn write_prompts(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("prompts.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[[prompts]]
prompt = "Name?"
config_section = "personal"
config_key = "name"
validators = ["non_nil"]

[[prompts]]
prompt = "Mode?"
options = ["basic", "advanced"]
default = "basic"
config_section = "app"
config_key = "mode"

[[prompts]]
prompt = "Depth?"
config_section = "app"
config_key = "depth"
requirements = [{{ key = "mode", value = "advanced" }}]
"#
        )
        .unwrap();
        path
    }

    #[test]
    fn test_ask_records_answers_and_reports_skips() {
        let dir = tempfile::tempdir().unwrap();
        let prompts_path = write_prompts(dir.path());
        let config_path = dir.path().join("config.toml");

        let registry = AssetRegistry::new();
        let mut term = ScriptedTerminal::new(["Ada", "basic"]);

        let summary = ask(&prompts_path, &config_path, false, &registry, &mut term).unwrap();
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.skipped, 1);
        assert!(summary.backup_path.is_none());
        assert_eq!(term.successes.len(), 1);

        let config = Configurator::open(&config_path).unwrap();
        assert_eq!(config.get_str("personal", "name"), Some("Ada"));
        assert_eq!(config.get_str("app", "mode"), Some("basic"));
        assert_eq!(config.get("app", "depth"), None);
    }

    #[test]
    fn test_ask_with_backup_preserves_previous_config() {
        let dir = tempfile::tempdir().unwrap();
        let prompts_path = write_prompts(dir.path());
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[app]\nmode = \"old\"\n").unwrap();

        let registry = AssetRegistry::new();
        let mut term = ScriptedTerminal::new(["Ada", "advanced", "deep"]);

        let summary = ask(&prompts_path, &config_path, true, &registry, &mut term).unwrap();
        assert_eq!(summary.answered, 3);
        let backup_path = summary.backup_path.expect("backup path reported");
        let backed_up = std::fs::read_to_string(backup_path).unwrap();
        assert!(backed_up.contains("old"));

        let config = Configurator::open(&config_path).unwrap();
        assert_eq!(config.get_str("app", "mode"), Some("advanced"));
        assert_eq!(config.get_str("app", "depth"), Some("deep"));
    }

    #[test]
    fn test_ask_missing_prompts_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let registry = AssetRegistry::new();
        let mut term = ScriptedTerminal::default();

        let result = ask(
            &dir.path().join("missing.toml"),
            &dir.path().join("config.toml"),
            false,
            &registry,
            &mut term,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_config_get_set_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        config_set(&config_path, "App", "Mode", "advanced").unwrap();
        let value = config_get(&config_path, "app", "mode").unwrap();
        assert_eq!(value.value.as_str(), Some("advanced"));
        assert_eq!(value.to_human(), "advanced");

        let missing = config_get(&config_path, "app", "ghost");
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_config_list_whole_and_sectioned() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        config_set(&config_path, "app", "mode", "basic").unwrap();
        config_set(&config_path, "personal", "name", "Ada").unwrap();

        let all = config_list(&config_path, None).unwrap();
        assert!(all.data.contains_key("app"));
        assert!(all.data.contains_key("personal"));

        let one = config_list(&config_path, Some("app")).unwrap();
        assert!(one.data.contains_key("app"));
        assert!(!one.data.contains_key("personal"));

        let missing = config_list(&config_path, Some("ghost"));
        assert!(matches!(missing, Err(Error::SectionNotFound(_))));
    }

    #[test]
    fn test_config_backup_command() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        config_set(&config_path, "app", "mode", "basic").unwrap();

        let summary = config_backup(&config_path).unwrap();
        assert!(std::path::Path::new(&summary.backup_path).is_file());
    }

    #[test]
    fn test_summaries_serialize_to_json() {
        let summary = AskSummary {
            prompts_path: "prompts.toml".to_string(),
            config_path: "config.toml".to_string(),
            answered: 2,
            skipped: 1,
            backup_path: None,
        };
        let json = summary.to_json();
        assert!(json.contains("\"answered\": 2"));
        assert!(!json.contains("backup_path"));
    }
}
