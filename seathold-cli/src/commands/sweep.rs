//! Sweep command implementation.

use crate::error::CliError;
use crate::utils::{build_service, load_configuration, open_database, GlobalOptions};
use clap::Args;

/// Release every hold past its expiry.
#[derive(Args)]
pub struct SweepCommand {}

impl SweepCommand {
    /// Execute the sweep command, printing the number of released seats.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let service = build_service(&config);

        let released = service.sweep_expired(&mut db)?;
        println!("{released}");
        Ok(())
    }
}
