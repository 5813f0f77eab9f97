//! Build script for seathold-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("seathold")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hold, renew, and commit seats")
        .long_about(
            "Command-line tool for contended seat holds with expiry, commits, and live updates",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("SEATHOLD_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("SEATHOLD_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .help("Client token that owns holds")
                .value_name("TOKEN")
                .global(true)
                .env("SEATHOLD_CLIENT_TOKEN"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("SEATHOLD_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and seed seats")
                .long_about("Create the database, seed the seat grid, and optionally a config file"),
            Command::new("list")
                .about("List seats")
                .long_about("Display every seat with its status as seen by the caller's token"),
            Command::new("hold")
                .about("Hold a seat")
                .long_about("Place a time-limited hold on a seat for the caller's token"),
            Command::new("heartbeat")
                .about("Extend a hold")
                .long_about("Extend the caller's hold without shortening its remaining time"),
            Command::new("commit")
                .about("Commit a held seat")
                .long_about("Turn the caller's hold into a reservation with contact details"),
            Command::new("sweep")
                .about("Release lapsed holds")
                .long_about("Return every seat whose hold has expired to available"),
            Command::new("watch")
                .about("Stream seat changes")
                .long_about("Print a snapshot then every seat change as JSON lines"),
            Command::new("reservations")
                .about("List committed reservations")
                .long_about("Display the reservation ledger in various formats"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("seathold.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
