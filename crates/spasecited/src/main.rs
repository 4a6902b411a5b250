//! Command line interface for SPASE → DataCite DOI registration.
//!
//! This crate provides the `spasecite` CLI on top of the `spasecite`
//! library. It supports:
//! - Converting SPASE XML records into DataCite JSON on disk
//! - Uploading converted records as draft, registered, or findable DOIs
//! - Deleting draft DOIs along with their stored JSON
//! - Fetching registered records back from DataCite
//!
//! # Usage
//!
//! ```bash
//! # Convert a local SPASE record into dois/<ResourceID path>.json
//! spasecite convert NumericalData/ACE/MAG/L2/PT16S.xml --prefix 10.48322
//!
//! # Upload the converted record as a draft to the sandbox API
//! spasecite publish dois/NASA/NumericalData/ACE/MAG/L2/PT16S.json --test
//!
//! # Delete a draft that should not have been minted
//! spasecite delete 10.48322/xxxx-yyyy spase://NASA/NumericalData/ACE/MAG/L2/PT16S --test
//!
//! # Inspect what DataCite has on file
//! spasecite get 10.48322/xxxx-yyyy
//! ```
//!
//! Credentials come from interactive prompts or the `DATACITE_USERNAME` and
//! `DATACITE_PASSWORD` environment variables. The `-v` flag raises logging
//! verbosity through the usual levels.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use clap::{builder::ArgAction, Parser, Subcommand, ValueEnum};
use console::style;
use spasecite::{
  datacite::{
    client::{Credentials, DataCiteClient},
    map::{map_resource, validate, MapOptions},
    DoiEvent,
  },
  spase::{PersonDirectory, SpaseResource},
  store,
};
use tracing::trace;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing.
#[derive(Parser)]
#[command(author, version, about = "Convert SPASE records and register DOIs with DataCite")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail.
  #[arg(
    short,
    long,
    action = ArgAction::Count,
    global = true,
    help = "Increase logging verbosity"
  )]
  verbose: u8,

  /// The subcommand to execute.
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing).
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level.
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Entry point for the spasecite CLI.
///
/// Parses arguments, sets up logging, and dispatches to the requested
/// command. Errors are printed with the styled error prefix and exit with a
/// non-zero status so scripts can detect failed conversions.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let result = match cli.command.clone() {
    Commands::Convert { input, out, prefix, persons } =>
      convert(&cli, input, out, prefix, persons).await,
    Commands::Publish { record, event, test } => publish(&cli, record, event, test).await,
    Commands::Delete { doi, resource_id, out, test } =>
      delete(&cli, doi, resource_id, out, test).await,
    Commands::Get { doi, test } => get(&cli, doi, test).await,
  };

  if let Err(e) = result {
    eprintln!("{} {e}", style(ERROR_PREFIX).red());
    std::process::exit(1);
  }
}
