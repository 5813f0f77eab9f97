//! Main entry point for the seathold CLI.
//!
//! This is the command-line interface for the seathold seat store.
//! It provides commands for contended seat access:
//! - `hold`: Hold a seat for the caller's token
//! - `heartbeat`: Extend a hold
//! - `commit`: Commit a held seat with contact details
//! - `list`: List seats as seen by the caller
//! - `watch`: Stream seat changes

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    seathold::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        token: cli.token,
        disable_autoinit: cli.disable_autoinit,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Hold(cmd) => cmd.execute(&global),
        cli::Command::Heartbeat(cmd) => cmd.execute(&global),
        cli::Command::Commit(cmd) => cmd.execute(&global),
        cli::Command::Sweep(cmd) => cmd.execute(&global),
        cli::Command::Watch(cmd) => cmd.execute(&global),
        cli::Command::Reservations(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            match serde_json::to_string(&e.response()) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("Error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}
