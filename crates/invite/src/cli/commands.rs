//! CLI command definitions.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use uuid::Uuid;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on, overriding `server.bind_addr`
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
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

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
