//! Helmsman CLI - a prompt-driven setup wizard for command-line tools.

use clap::Parser;
use helmsman::assets::AssetRegistry;
use helmsman::cli::{Cli, Commands, ConfigCommands};
use helmsman::commands::{self, CommandResult};
use helmsman::terminal::ConsoleTerminal;
use std::process;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            eprintln!(r#"{{"error": "{}"}}"#, e);
        } else {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> helmsman::Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Ask { prompts, backup } => {
            let registry = AssetRegistry::new();
            let mut terminal = ConsoleTerminal::stdio();
            if cli.no_color {
                terminal = terminal.with_color(false);
            }
            let summary =
                commands::ask(&prompts, &cli.config_path, backup, &registry, &mut terminal)?;
            output(&summary, json);
        }
        Commands::Config { command } => match command {
            ConfigCommands::List { section } => {
                let listing = commands::config_list(&cli.config_path, section.as_deref())?;
                output(&listing, json);
            }
            ConfigCommands::Get { section, key } => {
                let value = commands::config_get(&cli.config_path, &section, &key)?;
                output(&value, json);
            }
            ConfigCommands::Set {
                section,
                key,
                value,
            } => {
                let written = commands::config_set(&cli.config_path, &section, &key, &value)?;
                output(&written, json);
            }
            ConfigCommands::Backup => {
                let summary = commands::config_backup(&cli.config_path)?;
                output(&summary, json);
            }
        },
    }
    Ok(())
}

/// Print a command result to stdout in the requested format.
fn output<T: CommandResult>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}
