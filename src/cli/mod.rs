//! CLI argument definitions for Helmsman.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Long version string: crate version plus build metadata from build.rs.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HM_GIT_COMMIT"),
    " ",
    env!("HM_BUILD_TIMESTAMP"),
    ")"
);

/// Helmsman - a prompt-driven setup wizard for command-line tools.
///
/// Run `hm ask --prompts <file>` to walk through a prompts document and
/// record the answers in a configuration file.
#[derive(Parser, Debug)]
#[command(name = "hm")]
#[command(author, version, long_version = LONG_VERSION)]
#[command(about = "A prompt-driven setup wizard for command-line tools", long_about = None)]
pub struct Cli {
    /// Path to the configuration file answers are written to.
    /// Can also be set via the HM_CONFIG environment variable.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "HM_CONFIG",
        default_value = "config.toml"
    )]
    pub config_path: PathBuf,

    /// Output command summaries as JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored terminal output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a wizard: deliver the prompts and record the answers
    ///
    /// Prompts without requirements are asked first, in declared order;
    /// requirement-gated prompts follow, skipped silently when their
    /// conditions are unmet.
    Ask {
        /// Path to the TOML prompts document
        #[arg(short, long)]
        prompts: PathBuf,

        /// Back up the configuration file before writing
        #[arg(long)]
        backup: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration document
    List {
        /// Restrict output to one section
        #[arg(long)]
        section: Option<String>,
    },

    /// Read one value
    Get {
        /// Section name (case-insensitive)
        section: String,
        /// Key name (case-insensitive)
        key: String,
    },

    /// Write one value
    Set {
        /// Section name (case-insensitive)
        section: String,
        /// Key name (case-insensitive)
        key: String,
        /// Value to store
        value: String,
    },

    /// Copy the configuration file to a timestamped backup
    Backup,
}
