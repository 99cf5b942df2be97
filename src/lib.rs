//! Helmsman - a prompt-driven setup wizard engine for command-line tools.
//!
//! This library provides the core functionality for the `hm` CLI tool:
//! loading a declarative prompts document, walking the user through it in
//! dependency order with per-answer validation and transformation, and
//! persisting the collected answers into a TOML configuration document.
//!
//! The typical embedding:
//!
//! ```no_run
//! use helmsman::assets::{AssetRegistry, AssetResolver};
//! use helmsman::config::Configurator;
//! use helmsman::prefs::PrefSet;
//! use helmsman::terminal::ConsoleTerminal;
//!
//! fn main() -> helmsman::Result<()> {
//!     let registry = AssetRegistry::new();
//!     let resolver = AssetResolver::new(&registry);
//!     let mut terminal = ConsoleTerminal::stdio();
//!
//!     let mut prefs = PrefSet::from_file("prompts.toml")?;
//!     prefs.ask(&resolver, &mut terminal)?;
//!
//!     let mut config = Configurator::open("config.toml")?;
//!     config.ingest(&prefs)?;
//!     config.save()
//! }
//! ```

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod prefs;
pub mod terminal;

/// Library-level error type for Helmsman operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Section already exists: {0}")]
    SectionExists(String),

    #[error("Cannot delete nonexistent section: {0}")]
    SectionNotFound(String),

    #[error("Value not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Helmsman operations.
pub type Result<T> = std::result::Result<T, Error>;
