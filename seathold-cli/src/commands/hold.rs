//! Hold command implementation.

use crate::error::CliError;
use crate::utils::{build_service, load_configuration, open_database, print_json, GlobalOptions};
use clap::Args;

/// Hold a seat for the caller's token.
#[derive(Args)]
pub struct HoldCommand {
    /// Seat to hold
    #[arg(value_name = "SEAT_ID")]
    pub seat_id: i64,
}

impl HoldCommand {
    /// Execute the hold command, printing the seat view as JSON.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let token = global.require_token()?;
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let service = build_service(&config);

        let view = service.hold(&mut db, self.seat_id, token)?;
        print_json(&view)
    }
}
