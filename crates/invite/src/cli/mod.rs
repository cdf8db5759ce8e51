//! Command-line interface for the `invited` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, DeleteCommand, ListCommand, ServeCommand, StatusCommand};

use crate::logging::Verbosity;

/// invited - RSVP endpoint for an invitation site
///
/// Serves the `/rsvp` resource and gives the host direct access to the
/// configured store.
#[derive(Debug, Parser)]
#[command(name = "invited")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP endpoint
    Serve(ServeCommand),

    /// List stored RSVPs, newest first (not available with the memory backend)
    List(ListCommand),

    /// Delete one RSVP (not available with the memory backend)
    Delete(DeleteCommand),

    /// Show backend and response counts (not available with the memory backend)
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        verbosity(self.quiet, self.verbose)
    }
}

/// Map `-q` / `-v` counts to a [`Verbosity`].
#[must_use]
pub fn verbosity(quiet: bool, verbose: u8) -> Verbosity {
    if quiet {
        Verbosity::Quiet
    } else {
        match verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }
}
