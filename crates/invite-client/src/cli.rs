//! Command-line interface for the `rsvpctl` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use invite::logging::Verbosity;
use invite::Attending;
use std::path::PathBuf;
use uuid::Uuid;

/// rsvpctl - talk to an invite RSVP endpoint
#[derive(Debug, Parser)]
#[command(name = "rsvpctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the endpoint host, overriding `client.base_url`
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never fall back to the local file
    #[arg(long, global = true)]
    pub no_fallback: bool,

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
    /// List RSVPs, newest first
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Submit an RSVP
    Submit(SubmitCommand),

    /// Delete one RSVP
    Delete(DeleteCommand),
}

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Guest name
    #[arg(short, long)]
    pub name: String,

    /// Whether the guest is coming
    #[arg(short, long, value_enum)]
    pub attending: AttendingArg,
}

/// Delete command arguments. Exactly one of `INDEX` or `--id` is required.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Position in the newest-first listing (0 is the newest)
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    pub index: Option<i64>,

    /// Stable id of the RSVP
    #[arg(long)]
    pub id: Option<Uuid>,
}

/// Attendance argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttendingArg {
    /// Coming
    Yes,
    /// Not coming
    No,
}

impl From<AttendingArg> for Attending {
    fn from(arg: AttendingArg) -> Self {
        match arg {
            AttendingArg::Yes => Self::Yes,
            AttendingArg::No => Self::No,
        }
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        invite::cli::verbosity(self.quiet, self.verbose)
    }
}
