//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the data directory and seed seats
//! - `list`: List seats as seen by the caller
//! - `hold`: Hold a seat
//! - `heartbeat`: Extend a hold
//! - `commit`: Commit a held seat
//! - `sweep`: Release lapsed holds
//! - `watch`: Stream seat changes
//! - `reservations`: List committed reservations
//! - `completions`: Generate shell completion scripts

pub mod commit;
pub mod completions;
pub mod heartbeat;
pub mod hold;
pub mod init;
pub mod list;
pub mod reservations;
pub mod sweep;
pub mod watch;

pub use commit::CommitCommand;
pub use completions::CompletionsCommand;
pub use heartbeat::HeartbeatCommand;
pub use hold::HoldCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use reservations::ReservationsCommand;
pub use sweep::SweepCommand;
pub use watch::WatchCommand;
