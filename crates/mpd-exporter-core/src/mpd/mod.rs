//! Minimal blocking client for the MPD control protocol.
//!
//! Only the handful of commands the exporter needs are implemented:
//! `password`, `stats`, `status`, `outputs` and `listallinfo`. Responses are
//! returned as raw key/value records; turning them into numbers is the
//! collector's job.
//!
//! ```text
//! client                         mpd
//!   │  ───── TCP connect ─────▶   │
//!   │  ◀──── OK MPD 0.23.5 ─────  │
//!   │  ───── password "…" ────▶   │   (only when configured)
//!   │  ◀──── OK ────────────────  │
//!   │  ───── stats ───────────▶   │
//!   │  ◀──── key: value … OK ───  │
//!   │  ───── close ───────────▶   │   (on drop)
//! ```

mod client;
mod config;
mod response;

pub use client::MpdClient;
pub use config::ConnectionConfig;
pub use response::{Ack, Attrs, quote};
