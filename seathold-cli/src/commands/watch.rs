//! Watch command implementation.
//!
//! Streams seat changes as JSON lines: an initial snapshot, then every change
//! seen in the database, including changes made by other processes, plus
//! periodic keepalive pings.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::CliError;
use crate::utils::{build_service, load_configuration, open_database, GlobalOptions};
use clap::Args;
use seathold::{ChangeFeed, Database, SeatEvent, Subscription};

/// Stream seat changes.
#[derive(Args)]
pub struct WatchCommand {
    /// How often to poll the database for changes, in milliseconds
    #[arg(long, value_name = "MILLIS", default_value_t = 500)]
    pub interval_ms: u64,

    /// Exit after printing this many events
    #[arg(long, value_name = "N")]
    pub max_events: Option<usize>,
}

impl WatchCommand {
    /// Execute the watch command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.interval_ms == 0 {
            return Err(CliError::InvalidArguments(
                "--interval-ms must be positive".into(),
            ));
        }

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let service = build_service(&config);
        let notifier = service.notifier();
        let keepalive = notifier.options().keepalive;

        // Primed before the snapshot, so a change in between is repeated, not lost.
        let mut feed = ChangeFeed::new();
        feed.prime(&Database::get_all_seats(db.connection())?);
        let mut subscription = service.subscribe_updates(&db, global.token.clone())?;

        let mut printed = 0;
        let mut last_ping = Instant::now();
        let interval = Duration::from_millis(self.interval_ms);

        loop {
            while let Ok(event) = subscription.try_recv() {
                emit(&subscription, &event)?;
                printed += 1;
                if self.max_events.is_some_and(|max| printed >= max) {
                    return Ok(());
                }
            }

            if notifier.subscriber_count() == 0 {
                // Pruned while we were away; start over from a fresh snapshot.
                subscription = service.subscribe_updates(&db, global.token.clone())?;
                continue;
            }

            thread::sleep(interval);

            for seat in feed.poll(db.connection())? {
                notifier.broadcast(&SeatEvent::SeatUpdate(seat));
            }
            if last_ping.elapsed() >= keepalive {
                notifier.ping();
                last_ping = Instant::now();
            }
        }
    }
}

fn emit(subscription: &Subscription, event: &SeatEvent) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, &subscription.render(event))?;
    writeln!(handle)?;
    handle.flush()?;
    Ok(())
}
