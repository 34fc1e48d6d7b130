//! Response framing helpers: `key: value` pairs, `ACK` lines and records.

use std::collections::HashMap;
use std::fmt;

/// One record of a response (a song, an output, the stats block, ...).
///
/// Keys are case-sensitive exactly as the daemon sends them. A key repeated
/// within one record keeps its last value.
pub type Attrs = HashMap<String, String>;

/// A parsed `ACK [code@index] {command} message` error reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub code: u32,
    /// Position of the failing command inside a command list.
    pub index: u32,
    pub command: String,
    pub message: String,
}

impl Ack {
    /// Parses an `ACK` line. Returns `None` if the line is not a well-formed ACK.
    pub fn parse(line: &str) -> Option<Ack> {
        let rest = line.strip_prefix("ACK [")?;
        let (code_index, rest) = rest.split_once(']')?;
        let (code, index) = code_index.split_once('@')?;
        let rest = rest.trim_start().strip_prefix('{')?;
        let (command, message) = rest.split_once('}')?;

        Some(Ack {
            code: code.parse().ok()?,
            index: index.parse().ok()?,
            command: command.to_string(),
            message: message.trim().to_string(),
        })
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ACK [{}@{}] {{{}}} {}",
            self.code, self.index, self.command, self.message
        )
    }
}

/// Quotes a command argument: wraps it in `"` and backslash-escapes `"` and `\`.
pub fn quote(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Splits a response line at the first `": "`.
pub(crate) fn split_pair(line: &str) -> Option<(&str, &str)> {
    line.split_once(": ")
}

/// Folds a flat response into a single record.
pub(crate) fn into_attrs(pairs: Vec<(String, String)>) -> Attrs {
    pairs.into_iter().collect()
}

/// Splits a flat response into records.
///
/// A key in `start` opens a new record (and belongs to it). A key in `stop`
/// closes the current record and is dropped. Pairs outside any record are
/// ignored.
pub(crate) fn into_records(
    pairs: Vec<(String, String)>,
    start: &[&str],
    stop: &[&str],
) -> Vec<Attrs> {
    let mut records = Vec::new();
    let mut current: Option<Attrs> = None;

    for (key, value) in pairs {
        if start.contains(&key.as_str()) {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(Attrs::new());
        } else if stop.contains(&key.as_str()) {
            if let Some(record) = current.take() {
                records.push(record);
            }
            continue;
        }

        if let Some(record) = current.as_mut() {
            record.insert(key, value);
        }
    }

    if let Some(record) = current {
        records.push(record);
    }
    records
}
