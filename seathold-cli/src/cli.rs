//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CommitCommand, CompletionsCommand, HeartbeatCommand, HoldCommand, InitCommand, ListCommand,
    ReservationsCommand, SweepCommand, WatchCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for holding, renewing, and committing seats.
#[derive(Parser)]
#[command(name = "seathold")]
#[command(version, about = "Hold, renew, and commit seats", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "SEATHOLD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "SEATHOLD_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Client token that owns holds
    #[arg(long, value_name = "TOKEN", global = true, env = "SEATHOLD_CLIENT_TOKEN")]
    pub token: Option<String>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "SEATHOLD_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and seed seats
    Init(InitCommand),

    /// List seats
    List(ListCommand),

    /// Hold a seat
    Hold(HoldCommand),

    /// Extend a hold
    Heartbeat(HeartbeatCommand),

    /// Commit a held seat
    Commit(CommitCommand),

    /// Release lapsed holds
    Sweep(SweepCommand),

    /// Stream seat changes
    Watch(WatchCommand),

    /// List committed reservations
    Reservations(ReservationsCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
