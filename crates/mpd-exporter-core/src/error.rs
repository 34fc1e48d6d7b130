//! Errors raised while scraping an MPD instance.
//!
//! Every variant is non-fatal to the process: the collector logs it and the
//! scrape in progress stops with whatever samples it has produced so far.

use std::io;

use thiserror::Error;

use crate::mpd::Ack;

/// Failure of a single protocol exchange with the daemon.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The daemon answered with an `ACK` line.
    #[error("{0}")]
    Ack(Ack),

    /// A response line that is neither `key: value`, `OK` nor `ACK`.
    #[error("malformed response line '{0}'")]
    Malformed(String),

    /// The connection was closed before the response was terminated.
    #[error("connection closed before end of response")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Error type for MPD collection.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The daemon could not be reached, greeted or authenticated.
    #[error("MPD at {addr}: {reason}")]
    Connection { addr: String, reason: String },

    /// A command failed or returned a malformed response.
    #[error("MPD command '{command}' failed: {source}")]
    Query {
        command: String,
        #[source]
        source: ProtocolError,
    },

    /// A textual field did not match the expected numeric or timestamp format.
    #[error("parsing {field} '{value}': {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl CollectError {
    pub(crate) fn connection(addr: &str, reason: impl ToString) -> Self {
        CollectError::Connection {
            addr: addr.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(field: &'static str, value: &str, reason: impl ToString) -> Self {
        CollectError::Parse {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
