//! `rsvpctl` - submit, list and delete RSVPs over HTTP

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;

use invite::{init_logging, Config, Rsvp};
use invite_client::cli::{Cli, Command, DeleteCommand};
use invite_client::{Outcome, RsvpClient, Source};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&["invite_client", "rsvpctl"], cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(url) = &cli.url {
        config.client.base_url.clone_from(url);
    }
    if cli.no_fallback {
        config.client.offline_fallback = false;
    }

    let client = RsvpClient::from_config(&config)?;

    match cli.command {
        Command::List { json } => {
            let outcome = client.get_responses()?;
            note_source(&client, &outcome);
            print_list(&outcome.value, json)?;
        }
        Command::Submit(cmd) => {
            let outcome = client.submit_rsvp(&cmd.name, cmd.attending.into())?;
            note_source(&client, &outcome);
            println!("{} ({})", outcome.value.message, outcome.value.response.id);
        }
        Command::Delete(cmd) => {
            let outcome = delete(&client, &cmd)?;
            note_source(&client, &outcome);
            println!("{}", outcome.value);
        }
    }
    Ok(())
}

fn delete(client: &RsvpClient, cmd: &DeleteCommand) -> Result<Outcome<String>> {
    let outcome = match (cmd.id, cmd.index) {
        (Some(id), _) => client.delete_rsvp_by_id(id)?,
        (None, Some(index)) => client.delete_rsvp(index)?,
        (None, None) => anyhow::bail!("either an index or --id is required"),
    };
    Ok(outcome)
}

fn note_source<T>(client: &RsvpClient, outcome: &Outcome<T>) {
    if outcome.source == Source::Fallback {
        if let Some(store) = client.fallback() {
            eprintln!(
                "note: {} is unreachable; used local file {}",
                client.endpoint(),
                store.path().display()
            );
        }
    }
}

fn print_list(records: &[Rsvp], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No RSVPs yet.");
        return Ok(());
    }

    for (index, rsvp) in records.iter().enumerate() {
        println!(
            "{index:>3}  {:<3}  {}  {}  ({})",
            rsvp.attending.label(),
            rsvp.submitted_at.format("%Y-%m-%d %H:%M"),
            rsvp.name,
            rsvp.id
        );
    }
    Ok(())
}
