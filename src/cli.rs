//! CLI interface for Waybill.
//!
//! Each subcommand is non-interactive: arguments in, text out.
//!
//! - `waybill cargo new|list`: register and browse shipments.
//! - `waybill track add|update|show`: record waypoints and view the timeline.
//! - `waybill statuses`: the status tags and how they are displayed.
//!
//! Commands that take `--cargo` accept a full UUID, the exact waybill
//! reference, or an unambiguous id prefix.

mod cargo;
mod format;
mod track;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::storage::Storage;

use cargo::CargoCommand;
use track::TrackCommand;

/// Waybill: cargo tracking from the command line.
#[derive(Debug, Parser)]
#[command(name = "waybill", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Operator recording the change. Falls back to `WAYBILL_OPERATOR`,
    /// then `default-operator` in the config file.
    #[arg(long = "as", global = true)]
    operator: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: tracking a shipment
  1. waybill cargo new 176-12345675 --customer "Acme Imports" --origin NBO --destination LHR
  2. waybill --as night-shift track add --cargo 176-12345675 --location Nairobi --status checked-in
  3. waybill track add --cargo 176-12345675 --location Doha --status in-transit --status on-hold
  4. waybill track show --cargo 176-12345675 --expand 2
  5. waybill track update --cargo 176-12345675 2 --status in-transit --status arrived"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register and list cargo.
    Cargo {
        #[command(subcommand)]
        command: CargoCommand,
    },

    /// Record tracking waypoints and show a cargo's timeline.
    Track {
        #[command(subcommand)]
        command: TrackCommand,
    },

    /// List every status tag with its colour, icon, and label.
    Statuses,
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Cargo { command } => cargo::run(config, storage, command),
        Command::Track { command } => track::run(config, storage, cli.operator.as_deref(), command),
        Command::Statuses => {
            print!("{}", format::format_status_legend());
            Ok(())
        }
    }
}
