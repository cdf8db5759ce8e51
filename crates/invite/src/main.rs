//! `invited` - RSVP endpoint and admin CLI
//!
//! Serves the RSVP resource over HTTP and lets the host inspect or prune
//! the configured store directly.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use invite::cli::{Cli, Command, ConfigCommand, DeleteCommand};
use invite::{init_logging, open_shared_store, server, Config, Rsvp};

const REDACTED: &str = "********";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&["invite", "invited"], cli.verbosity());

    match cli.command {
        Command::Serve(cmd) => server::serve(&load(cli.config)?, cmd.bind).await?,
        Command::List(cmd) => handle_list(&load(cli.config)?, cmd.json).await?,
        Command::Delete(cmd) => handle_delete(&load(cli.config)?, &cmd).await?,
        Command::Status(cmd) => handle_status(&load(cli.config)?, cmd.json).await?,
        Command::Config(cmd) => handle_config(cli.config, cmd)?,
    }
    Ok(())
}

fn load(path: Option<PathBuf>) -> Result<Config> {
    Config::load_from(path).context("failed to load configuration")
}

async fn handle_list(config: &Config, json: bool) -> Result<()> {
    let store = open_shared_store(config)?;
    let records = store.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No RSVPs yet.");
        return Ok(());
    }

    for (index, rsvp) in records.iter().enumerate() {
        print_row(index, rsvp);
    }
    Ok(())
}

fn print_row(index: usize, rsvp: &Rsvp) {
    println!(
        "{index:>3}  {:<3}  {}  {}  ({})",
        rsvp.attending.label(),
        rsvp.submitted_at.format("%Y-%m-%d %H:%M"),
        rsvp.name,
        rsvp.id
    );
}

async fn handle_delete(config: &Config, cmd: &DeleteCommand) -> Result<()> {
    let store = open_shared_store(config)?;

    let removed = match (cmd.id, cmd.index) {
        (Some(id), _) => store.remove(id).await?,
        (None, Some(index)) => store.remove_at(index).await?,
        (None, None) => anyhow::bail!("either an index or --id is required"),
    };

    println!("RSVP for {} deleted successfully", removed.name);
    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> Result<()> {
    let store = open_shared_store(config)?;
    let stats = store.stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("invited status");
    println!("--------------");
    println!("Backend:       {}", stats.backend);
    println!("Responses:     {}", stats.total);
    println!("Attending:     {}", stats.attending);
    println!("Declined:      {}", stats.declined);
    if let Some(newest) = stats.newest {
        println!("Newest:        {}", newest.to_rfc3339());
    }
    if let Some(oldest) = stats.oldest {
        println!("Oldest:        {}", oldest.to_rfc3339());
    }
    Ok(())
}

fn handle_config(path: Option<PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let mut config = Config::load_from(path)?;
            if config.storage.supabase.service_key.is_some() {
                config.storage.supabase.service_key = Some(REDACTED.to_string());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.or(path).unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("Environment:          {:?}", config.environment);
    println!();
    println!("[Server]");
    println!("  Bind address:       {}", config.server.bind_addr);
    println!();
    println!("[Storage]");
    println!("  Backend:            {}", config.storage.backend);
    println!("  File path:          {}", config.file_path().display());
    println!("  Database path:      {}", config.database_path().display());
    println!(
        "  Supabase URL:       {}",
        config.storage.supabase.url.as_deref().unwrap_or("(unset)")
    );
    println!("  Supabase table:     {}", config.storage.supabase.table);
    println!();
    println!("[Notify]");
    println!("  Enabled:            {}", config.notify.enabled);
    println!("  Recipient:          {}", config.notify.recipient);
    println!("  Event name:         {}", config.notify.event_name);
    println!();
    println!("[Client]");
    println!("  Base URL:           {}", config.client.base_url);
    println!("  Offline fallback:   {}", config.fallback_enabled());
    println!("  Fallback path:      {}", config.fallback_path().display());
}
