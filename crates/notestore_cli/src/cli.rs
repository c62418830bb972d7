//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// notestore - owner-scoped text notes backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "notestore", version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (defaults to NOTESTORE_DB_PATH, then ./notestore.sqlite3)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verified identity of the caller
    #[arg(long, global = true, env = "NOTESTORE_OWNER")]
    pub owner: Option<String>,

    /// Absolute directory for rolling log files (defaults to NOTESTORE_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print core health and version
    Ping,

    /// Create a note owned by the caller
    Add(AddArgs),

    /// List the caller's notes
    #[command(name = "ls")]
    List,

    /// Show one of the caller's notes
    Show(IdArgs),

    /// Replace title, body and tags of one of the caller's notes
    Edit(EditArgs),

    /// Delete one of the caller's notes
    #[command(name = "rm")]
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Note title (defaults to "untitled")
    #[arg(long)]
    pub title: Option<String>,

    /// Note body
    #[arg(long)]
    pub body: String,

    /// Tag to attach; repeat for several tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Note id
    pub id: String,
}

/// Every field is required by the store; omitted flags are rejected.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Note id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub body: Option<String>,

    /// Replacement tag; repeat for several tags, stored exactly as given
    #[arg(long = "tag", conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Replace the tags with an empty list
    #[arg(long)]
    pub clear_tags: bool,
}
