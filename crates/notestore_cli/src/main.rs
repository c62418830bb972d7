//! `notestore` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and `NOTESTORE_*` environment variables.
//! - Open the shared connection pool once and run one command against it.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use commands::CommandError;
use log::info;
use notestore_core::db::open_pool;
use notestore_core::{NoteStore, NoteStoreError, PooledNoteRepository, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CommandError> {
    if let Command::Ping = cli.command {
        println!("notestore_core ping={}", notestore_core::ping());
        println!("notestore_core version={}", notestore_core::core_version());
        return Ok(());
    }

    let mut config = StoreConfig::from_env().map_err(|err| CommandError::Usage(err.to_string()))?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }
    if let Some(log_dir) = config.log_dir.as_ref() {
        notestore_core::init_logging(&config.log_level, log_dir).map_err(CommandError::Usage)?;
    }

    let owner = cli
        .owner
        .filter(|owner| !owner.trim().is_empty())
        .ok_or_else(|| CommandError::Usage("--owner (or NOTESTORE_OWNER) is required".to_string()))?;

    let pool = open_pool(&config.db_path, config.pool_size).map_err(|err| {
        CommandError::Store(NoteStoreError::Storage(err.into()))
    })?;
    let repo = PooledNoteRepository::try_new(pool).map_err(NoteStoreError::Storage)?;
    let store = NoteStore::new(repo);
    info!(
        "event=cli_command module=cli status=start db_path={}",
        config.db_path.display()
    );

    match cli.command {
        Command::Ping => Ok(()),
        Command::Add(args) => commands::add(&store, &owner, args),
        Command::List => commands::list(&store, &owner),
        Command::Show(args) => commands::show(&store, &owner, args),
        Command::Edit(args) => commands::edit(&store, &owner, args),
        Command::Delete(args) => commands::delete(&store, &owner, args),
    }
}
