//! Heartbeat command implementation.

use crate::error::CliError;
use crate::utils::{build_service, load_configuration, open_database, print_json, GlobalOptions};
use clap::Args;

/// Extend the caller's hold on a seat.
#[derive(Args)]
pub struct HeartbeatCommand {
    /// Seat whose hold to extend
    #[arg(value_name = "SEAT_ID")]
    pub seat_id: i64,
}

impl HeartbeatCommand {
    /// Execute the heartbeat command, printing the seat view as JSON.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let token = global.require_token()?;
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let service = build_service(&config);

        let view = service.heartbeat(&mut db, self.seat_id, token)?;
        print_json(&view)
    }
}
