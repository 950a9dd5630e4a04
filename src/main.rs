//! Setpoint - typed, validated settings for interactive tools
//!
//! Demo binary owning a small registry of its own settings. Every invocation
//! loads the property file, applies one verb, and persists the registry back
//! with merge enabled, so concurrent edits from other processes survive.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use setpoint::commands::{self, SetOutcome};
use setpoint::logging::{init_logging, LogConfig};
use setpoint::property::{PropertyHolder, PropertyRegistry};
use setpoint::store::ConfigurationContainer;
use setpoint::Result;

/// Setpoint command-line interface
#[derive(Parser)]
#[command(name = "setpoint")]
#[command(about = "Typed, validated settings with a merge-safe durable store")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct SetpointCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Property file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set a property; with no arguments list all, with one show help
    Set {
        /// Property name followed by the value
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Reset a property to its default value
    Reset {
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Show completion candidates for a partial property value
    Complete {
        /// Property name
        name: String,
        /// Partial value
        #[arg(default_value = "")]
        partial: String,
    },

    /// Print the property file path
    Path,
}

/// The demo tool's own settings.
fn default_registry() -> PropertyRegistry {
    let mut registry = PropertyRegistry::new();
    registry.register(
        "color",
        PropertyHolder::boolean(true, "colored terminal output")
            .with_long_help("Whether listings use ANSI colors. Accepts 0/off/false and 1/on/true."),
    );
    registry.register(
        "format",
        PropertyHolder::enumerated(
            ["table", "vertical", "csv"],
            "table",
            "how listings are rendered",
        )
        .with_long_help("Rendering style for listings; an unambiguous prefix is enough."),
    );
    registry.register(
        "prompt",
        PropertyHolder::string("setpoint> ", "interactive prompt text"),
    );
    registry.register(
        "history",
        PropertyHolder::boolean(true, "record command history"),
    );
    registry
}

fn config_path(cli: &SetpointCli) -> Result<PathBuf> {
    if let Some(path) = &cli.config {
        return Ok(path.clone());
    }
    let base = dirs::config_dir().context("could not determine the user config directory")?;
    Ok(base.join("setpoint").join("setpoint.properties"))
}

fn run(cli: SetpointCli) -> Result<i32> {
    let path = config_path(&cli)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    debug!(path = %path.display(), "using property file");

    let mut registry = default_registry();
    let mut container = ConfigurationContainer::new(&path);
    registry.load_from(&mut container);

    let code = match &cli.command {
        Commands::Set { args } => match commands::set_command(&mut registry, &args.join(" ")) {
            Ok(SetOutcome::Listing(rows)) => {
                for row in rows {
                    println!("{:<12} {:<16} {}", row.name, row.value, row.description);
                }
                0
            }
            Ok(SetOutcome::Help(help)) => {
                println!("{} = {} (default: {})", help.name, help.value, help.default);
                println!("{}", help.help);
                0
            }
            Ok(SetOutcome::Applied { name, value }) => {
                println!("{name} = {value}");
                0
            }
            Err(err) => {
                eprintln!("{err}");
                1
            }
        },
        Commands::Reset { args } => match commands::reset_command(&mut registry, &args.join(" ")) {
            Ok(value) => {
                println!("{value}");
                0
            }
            Err(err) => {
                eprintln!("{err}");
                1
            }
        },
        Commands::Complete { name, partial } => match registry.get(name) {
            Some(holder) => {
                for candidate in holder.complete_value(partial).unwrap_or_default() {
                    println!("{candidate}");
                }
                0
            }
            None => {
                eprintln!("unknown property '{name}'");
                1
            }
        },
        Commands::Path => {
            println!("{}", path.display());
            0
        }
    };

    registry.store_to(&mut container, "setpoint settings");
    Ok(code)
}

fn main() {
    let cli = SetpointCli::parse();

    let log_config = if cli.verbose {
        LogConfig::from_env().verbose()
    } else {
        LogConfig::from_env()
    };
    if let Err(err) = init_logging(&log_config) {
        eprintln!("failed to initialize logging: {err}");
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("setpoint: {err:#}");
            std::process::exit(1);
        }
    }
}
