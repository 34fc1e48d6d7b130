//! Scripted fake MPD daemon for tests.
//!
//! `FakeDaemon` listens on a loopback port and answers commands from a
//! `Script`, recording every command it receives and how each connection
//! ended. `scenarios` holds ready-made scripts and response builders.

mod daemon;
mod scenarios;

pub use daemon::{DaemonLog, FakeDaemon, Script};
pub use scenarios::{output_block, song_block, stats_response};
