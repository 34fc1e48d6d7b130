//! `status` handling.

use tracing::debug;

use super::MpdCollector;
use crate::mpd::Attrs;

impl MpdCollector {
    /// Nothing is exported from `status`; the player state is only logged.
    pub(crate) fn log_status(&self, status: &Attrs) {
        debug!(
            host = self.host(),
            state = status.get("state").map(String::as_str).unwrap_or("-"),
            "player status"
        );
    }
}
