//! Loopback TCP server speaking just enough of the MPD protocol.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::mpd::{ConnectionConfig, quote};

/// What the fake daemon says and expects.
#[derive(Debug, Clone)]
pub struct Script {
    greeting: String,
    password: Option<String>,
    /// Full command line -> raw response, including the final `OK`/`ACK` line.
    responses: HashMap<String, String>,
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl Script {
    /// A daemon that greets as MPD 0.23.5 and knows no commands.
    pub fn new() -> Self {
        Self {
            greeting: "OK MPD 0.23.5".to_string(),
            password: None,
            responses: HashMap::new(),
        }
    }

    pub fn with_greeting(mut self, greeting: &str) -> Self {
        self.greeting = greeting.to_string();
        self
    }

    /// Accepts `password` commands carrying this secret; any other is ACKed.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Answers `command` (the full line, arguments included) with `response`.
    pub fn respond(mut self, command: &str, response: impl Into<String>) -> Self {
        self.responses.insert(command.to_string(), response.into());
        self
    }

    fn reply(&self, command: &str) -> String {
        if command.starts_with("password ") {
            let accepted = self
                .password
                .as_deref()
                .is_some_and(|p| command == format!("password {}", quote(p)));
            return if accepted {
                "OK\n".to_string()
            } else {
                "ACK [3@0] {password} incorrect password\n".to_string()
            };
        }

        self.responses.get(command).cloned().unwrap_or_else(|| {
            let name = command.split_whitespace().next().unwrap_or_default();
            format!("ACK [5@0] {{}} unknown command \"{}\"\n", name)
        })
    }
}

/// Everything the daemon observed so far.
#[derive(Debug, Clone, Default)]
pub struct DaemonLog {
    /// Connections accepted.
    pub connections: usize,
    /// Connections that have ended, for any reason.
    pub disconnected: usize,
    /// Connections ended by an explicit `close` command.
    pub closed: usize,
    /// Every command line received, in order, across connections.
    pub commands: Vec<String>,
}

/// A running fake daemon. The accept thread lives until the test process exits.
pub struct FakeDaemon {
    addr: SocketAddr,
    log: Arc<Mutex<DaemonLog>>,
}

impl FakeDaemon {
    /// Binds `127.0.0.1:0` and starts serving `script`.
    pub fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind fake daemon");
        let addr = listener
            .local_addr()
            .expect("fake daemon has no local address");
        let log = Arc::new(Mutex::new(DaemonLog::default()));
        let script = Arc::new(script);

        let accept_log = log.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = accept_log.clone();
                let script = script.clone();
                thread::spawn(move || serve(stream, &script, &log));
            }
        });

        Self { addr, log }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Connection settings pointing at this daemon.
    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.addr.to_string())
    }

    /// Snapshot of what the daemon has observed.
    pub fn log(&self) -> DaemonLog {
        self.log.lock().unwrap().clone()
    }

    /// Waits until at least `count` connections have ended.
    pub fn wait_disconnected(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.log.lock().unwrap().disconnected >= count {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }
}

fn serve(stream: TcpStream, script: &Script, log: &Mutex<DaemonLog>) {
    log.lock().unwrap().connections += 1;
    let closed = converse(stream, script, log).unwrap_or(false);

    let mut log = log.lock().unwrap();
    log.disconnected += 1;
    if closed {
        log.closed += 1;
    }
}

/// Runs one conversation. Returns `true` if the client sent `close`.
fn converse(stream: TcpStream, script: &Script, log: &Mutex<DaemonLog>) -> io::Result<bool> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    writeln!(writer, "{}", script.greeting)?;

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let command = line.trim_end().to_string();
        log.lock().unwrap().commands.push(command.clone());

        if command == "close" {
            return Ok(true);
        }
        writer.write_all(script.reply(&command).as_bytes())?;
    }
}
