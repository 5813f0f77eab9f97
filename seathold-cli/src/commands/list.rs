//! List command implementation.
//!
//! This module implements the `list` command, which displays every seat as
//! seen by the caller's token.

use crate::error::CliError;
use crate::utils::{
    build_service, format_timestamp, load_configuration, open_database, print_json, GlobalOptions,
};
use clap::{Args, ValueEnum};
use seathold::SeatView;
use std::io::Write;

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 5] = ["id", "label", "status", "hold_expires_at", "mine"];

/// List seats.
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "SEATHOLD_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let service = build_service(&config);

        let seats = service.list_seats(&db, global.token.as_deref())?;

        match self.format {
            OutputFormat::Table => format_as_table(&seats),
            OutputFormat::Json => print_json(&seats),
        }
    }
}

/// Format seats as a human-readable table.
fn format_as_table(seats: &[SeatView]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for seat in seats {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}",
            seat.id,
            seat.label,
            seat.status,
            seat.hold_expires_at
                .map_or_else(|| "-".to_string(), format_timestamp),
            if seat.held_by_me { "yes" } else { "-" },
        )?;
    }

    Ok(())
}
