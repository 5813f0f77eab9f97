//! Reservations command implementation.
//!
//! This module implements the `reservations` command, which displays the
//! ledger of committed seats in various formats (table, JSON, CSV, TSV).

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use clap::{Args, ValueEnum};
use seathold::{Database, Reservation};
use std::io::Write;

/// Column headers for delimited output.
const COLUMN_HEADERS: [&str; 5] = ["id", "seat_id", "name", "phone", "reserved_at"];

/// List committed reservations.
#[derive(Args)]
pub struct ReservationsCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: LedgerFormat,
}

/// Output format for the reservations command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LedgerFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl ReservationsCommand {
    /// Execute the reservations command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let reservations = Database::list_reservations(db.connection())?;

        match self.format {
            LedgerFormat::Table => format_as_table(&reservations),
            LedgerFormat::Json => crate::utils::print_json(&reservations),
            LedgerFormat::Csv => format_as_delimited(&reservations, b','),
            LedgerFormat::Tsv => format_as_delimited(&reservations, b'\t'),
        }
    }
}

fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for res in reservations {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}",
            res.id(),
            res.seat_id(),
            res.name(),
            res.phone(),
            format_timestamp(res.reserved_at()),
        )?;
    }

    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

fn format_as_delimited(reservations: &[Reservation], delimiter: u8) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(handle);

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;

    for res in reservations {
        writer
            .write_record(&[
                res.id().to_string(),
                res.seat_id().to_string(),
                res.name().to_string(),
                res.phone().to_string(),
                res.reserved_at().to_rfc3339(),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;

    Ok(())
}
