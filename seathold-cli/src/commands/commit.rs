//! Commit command implementation.

use crate::error::CliError;
use crate::utils::{build_service, load_configuration, open_database, print_json, GlobalOptions};
use clap::Args;
use seathold::operations::CommitRequest;

/// Commit the caller's held seat.
#[derive(Args)]
pub struct CommitCommand {
    /// Seat to commit
    #[arg(value_name = "SEAT_ID")]
    pub seat_id: i64,

    /// Contact name (1-50 characters)
    #[arg(long)]
    pub name: String,

    /// Contact phone (3-20 characters)
    #[arg(long)]
    pub phone: String,
}

impl CommitCommand {
    /// Execute the commit command, printing the reservation summary as JSON.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let token = global.require_token()?;
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let service = build_service(&config);

        let request = CommitRequest::new(self.name, self.phone);
        let summary = service.commit(&mut db, self.seat_id, token, &request)?;
        print_json(&summary)
    }
}
