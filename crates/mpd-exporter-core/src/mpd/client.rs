//! Blocking MPD connection.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use tracing::{debug, trace};

use super::config::ConnectionConfig;
use super::response::{Ack, Attrs, into_attrs, into_records, quote, split_pair};
use crate::error::{CollectError, ProtocolError};

/// Prefix of the greeting line sent by the daemon on connect.
const GREETING_PREFIX: &str = "OK MPD ";

/// An open, greeted (and authenticated, if configured) connection.
///
/// The connection is closed when the client is dropped: `close` is sent on a
/// best-effort basis and the socket is shut down.
pub struct MpdClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    protocol_version: String,
}

impl MpdClient {
    /// Connects to the daemon, reads the greeting and authenticates.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, CollectError> {
        let addr = config.addr();
        let stream = open_stream(config).map_err(|e| CollectError::connection(addr, e))?;
        stream
            .set_read_timeout(config.timeout())
            .and_then(|_| stream.set_write_timeout(config.timeout()))
            .map_err(|e| CollectError::connection(addr, e))?;

        let writer = stream
            .try_clone()
            .map_err(|e| CollectError::connection(addr, e))?;
        let mut client = Self {
            reader: BufReader::new(stream),
            writer,
            protocol_version: String::new(),
        };

        let greeting = client
            .read_line()
            .map_err(|e| CollectError::connection(addr, e))?;
        client.protocol_version = greeting
            .strip_prefix(GREETING_PREFIX)
            .ok_or_else(|| {
                CollectError::connection(addr, format!("unexpected greeting '{}'", greeting))
            })?
            .to_string();
        debug!(host = addr, protocol = %client.protocol_version, "MPD greeting received");

        if let Some(password) = config.password() {
            match client.exchange(&format!("password {}", quote(password))) {
                Ok(_) => debug!(host = addr, "authenticated"),
                Err(ProtocolError::Ack(ack)) => {
                    return Err(CollectError::connection(
                        addr,
                        format!("authentication failed: {}", ack.message),
                    ));
                }
                Err(e) => return Err(CollectError::connection(addr, e)),
            }
        }

        Ok(client)
    }

    /// Protocol version announced in the greeting, e.g. `0.23.5`.
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// `stats`: collection counters (songs, albums, artists, playtime, ...).
    pub fn stats(&mut self) -> Result<Attrs, CollectError> {
        self.command("stats").map(into_attrs)
    }

    /// `status`: current player state.
    pub fn status(&mut self) -> Result<Attrs, CollectError> {
        self.command("status").map(into_attrs)
    }

    /// `outputs`: one record per configured audio output.
    pub fn outputs(&mut self) -> Result<Vec<Attrs>, CollectError> {
        self.command("outputs")
            .map(|pairs| into_records(pairs, &["outputid"], &[]))
    }

    /// `listallinfo <uri>`: one record per song below `uri`, recursively.
    ///
    /// Directory and playlist entries are skipped.
    pub fn list_all_info(&mut self, uri: &str) -> Result<Vec<Attrs>, CollectError> {
        self.command(&format!("listallinfo {}", quote(uri)))
            .map(|pairs| into_records(pairs, &["file"], &["directory", "playlist"]))
    }

    /// Sends one command line and collects its `key: value` pairs.
    fn command(&mut self, line: &str) -> Result<Vec<(String, String)>, CollectError> {
        let command = line.split_whitespace().next().unwrap_or(line).to_string();
        self.exchange(line)
            .map_err(|source| CollectError::Query { command, source })
    }

    fn exchange(&mut self, line: &str) -> Result<Vec<(String, String)>, ProtocolError> {
        trace!(command = line.split_whitespace().next().unwrap_or(line), "sending");
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.read_response()
    }

    /// Reads pairs until `OK`; an `ACK` line ends the response with an error.
    fn read_response(&mut self) -> Result<Vec<(String, String)>, ProtocolError> {
        let mut pairs = Vec::new();
        loop {
            let line = self.read_line()?;
            if line == "OK" {
                return Ok(pairs);
            }
            if line.starts_with("ACK ") {
                return Err(match Ack::parse(&line) {
                    Some(ack) => ProtocolError::Ack(ack),
                    None => ProtocolError::Malformed(line),
                });
            }
            match split_pair(&line) {
                Some((key, value)) => pairs.push((key.to_string(), value.to_string())),
                None => return Err(ProtocolError::Malformed(line)),
            }
        }
    }

    /// Reads one line without its terminator.
    fn read_line(&mut self) -> Result<String, ProtocolError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ProtocolError::UnexpectedEof);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

impl Drop for MpdClient {
    fn drop(&mut self) {
        let _ = self.writer.write_all(b"close\n");
        let _ = self.writer.flush();
        let _ = self.writer.shutdown(Shutdown::Both);
    }
}

fn open_stream(config: &ConnectionConfig) -> std::io::Result<TcpStream> {
    let dial = config.dial_addr();
    let Some(timeout) = config.timeout() else {
        return TcpStream::connect(dial.as_str());
    };

    let mut last_err = None;
    for addr in dial.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("{} resolved to no addresses", dial),
        )
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::collector::mock::{FakeDaemon, Script};

    #[test]
    fn test_connect_reads_protocol_version() {
        let daemon = FakeDaemon::start(Script::new());
        let client = MpdClient::connect(&daemon.config()).unwrap();
        assert_eq!(client.protocol_version(), "0.23.5");
    }

    #[test]
    fn test_connect_rejects_bad_greeting() {
        let daemon = FakeDaemon::start(Script::new().with_greeting("HELLO"));
        let err = MpdClient::connect(&daemon.config()).err().unwrap();
        assert!(matches!(err, CollectError::Connection { .. }));
        assert!(err.to_string().contains("unexpected greeting"));
        assert!(daemon.wait_disconnected(1, Duration::from_secs(5)));
    }

    #[test]
    fn test_password_accepted() {
        let daemon = FakeDaemon::start(
            Script::new()
                .with_password("secret")
                .respond("status", "state: stop\nOK\n"),
        );
        let config = daemon.config().with_password(Some("secret".into()));
        let mut client = MpdClient::connect(&config).unwrap();
        assert!(client.status().is_ok());
        drop(client);
        assert!(daemon.wait_disconnected(1, Duration::from_secs(5)));
        assert_eq!(daemon.log().commands[0], "password \"secret\"");
    }

    #[test]
    fn test_password_rejected() {
        let daemon = FakeDaemon::start(Script::new().with_password("secret"));
        let config = daemon.config().with_password(Some("wrong".into()));
        let err = MpdClient::connect(&config).err().unwrap();
        assert!(matches!(err, CollectError::Connection { .. }));
        assert!(err.to_string().contains("authentication failed"));
    }

    #[test]
    fn test_ack_becomes_query_error() {
        let daemon = FakeDaemon::start(
            Script::new().respond("stats", "ACK [4@0] {stats} you don't have permission\n"),
        );
        let mut client = MpdClient::connect(&daemon.config()).unwrap();
        match client.stats() {
            Err(CollectError::Query {
                command,
                source: ProtocolError::Ack(ack),
            }) => {
                assert_eq!(command, "stats");
                assert_eq!(ack.code, 4);
            }
            other => panic!("expected ACK query error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_line_is_query_error() {
        let daemon = FakeDaemon::start(Script::new().respond("stats", "songs 10\nOK\n"));
        let mut client = MpdClient::connect(&daemon.config()).unwrap();
        let err = client.stats().err().unwrap();
        assert!(matches!(
            err,
            CollectError::Query {
                source: ProtocolError::Malformed(_),
                ..
            }
        ));
    }

    #[test]
    fn test_list_all_info_quotes_uri() {
        let daemon = FakeDaemon::start(Script::new().respond(
            "listallinfo \"/\"",
            "directory: a\nfile: a/1.mp3\nTitle: One\nOK\n",
        ));
        let mut client = MpdClient::connect(&daemon.config()).unwrap();
        let songs = client.list_all_info("/").unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0]["Title"], "One");
    }

    #[test]
    fn test_drop_sends_close() {
        let daemon = FakeDaemon::start(Script::new());
        let client = MpdClient::connect(&daemon.config()).unwrap();
        drop(client);
        assert!(daemon.wait_disconnected(1, Duration::from_secs(5)));
        assert_eq!(daemon.log().closed, 1);
    }
}
