//! Console configuration types.
//!
//! [`ConsoleConfig`] is the single source of truth for all runtime settings.
//! It is constructed once from CLI arguments (see `main.rs`) or from
//! defaults suitable for a hub running on the same machine, then shared
//! read-only across every task.

use std::time::Duration;

/// All runtime configuration for the console.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// WebSocket URL of the hub's control channel, e.g.
    /// `ws://192.168.1.10:8080/ws`.
    pub hub_ws_url: String,

    /// Base URL of the hub's HTTP endpoints, e.g. `http://192.168.1.10:8080`.
    pub hub_http_url: String,

    /// Quiescence delay between tearing the channel down and redialling.
    ///
    /// Used both by `refresh()` (operator-forced resynchronisation) and by
    /// the caller-driven redial loop after a connection loss.  There is
    /// deliberately no backoff: the hub is a single local device and every
    /// attempt is cheap.
    pub reconnect_delay: Duration,

    /// Per-request timeout for the hub's HTTP endpoints.
    pub request_timeout: Duration,
}

impl Default for ConsoleConfig {
    /// Returns a config suitable for a hub on localhost, no external
    /// configuration required.
    ///
    /// | Field           | Default                    |
    /// |-----------------|----------------------------|
    /// | hub_ws_url      | `ws://127.0.0.1:8080/ws`   |
    /// | hub_http_url    | `http://127.0.0.1:8080`    |
    /// | reconnect_delay | 1 second                   |
    /// | request_timeout | 5 seconds                  |
    fn default() -> Self {
        Self {
            hub_ws_url: "ws://127.0.0.1:8080/ws".to_string(),
            hub_http_url: "http://127.0.0.1:8080".to_string(),
            reconnect_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
