//! Connection settings for one MPD endpoint.

use std::fmt;
use std::time::Duration;

/// Host used when the configured address has no host part (`:6600`).
const DEFAULT_HOST: &str = "localhost";

/// Where and how to reach the daemon. Immutable once built.
#[derive(Clone)]
pub struct ConnectionConfig {
    addr: String,
    password: Option<String>,
    timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Creates a config for `addr` (`host:port`, or `:port` for localhost).
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            password: None,
            timeout: None,
        }
    }

    /// Sets the shared secret sent with `password` after the greeting.
    ///
    /// An empty password is treated as no password.
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    /// Bounds connect, read and write on the daemon socket.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The address exactly as configured. Used as the `mpd_host` label.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The address to dial: an empty host part means localhost.
    pub(crate) fn dial_addr(&self) -> String {
        if self.addr.starts_with(':') {
            format!("{}{}", DEFAULT_HOST, self.addr)
        } else {
            self.addr.clone()
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("addr", &self.addr)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dial_addr_defaults_to_localhost() {
        let config = ConnectionConfig::new(":6600");
        assert_eq!(config.dial_addr(), "localhost:6600");
        assert_eq!(config.addr(), ":6600");
    }

    #[test]
    fn dial_addr_keeps_explicit_host() {
        let config = ConnectionConfig::new("music.lan:6601");
        assert_eq!(config.dial_addr(), "music.lan:6601");
    }

    #[test]
    fn empty_password_means_none() {
        let config = ConnectionConfig::new(":6600").with_password(Some(String::new()));
        assert_eq!(config.password(), None);

        let config = ConnectionConfig::new(":6600").with_password(Some("secret".into()));
        assert_eq!(config.password(), Some("secret"));
    }

    #[test]
    fn debug_redacts_password() {
        let config = ConnectionConfig::new(":6600").with_password(Some("hunter2".into()));
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
