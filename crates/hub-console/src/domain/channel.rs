//! Control-channel connectivity state.

use std::fmt;

/// Connectivity state of the control channel.
///
/// Exactly one value at any time, owned exclusively by the
/// `ControlChannel`; everything else reads it but never mutates it.
///
/// ```text
/// Disconnected ──connect()──► Connecting ──transport open──► Connected
///       ▲                         │                              │
///       └──────transport error────┘◄────────transport close──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No transport connection; `connect()` may start a fresh attempt.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The transport is open and frames flow in both directions.
    Connected,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChannelState::Disconnected => "disconnected",
            ChannelState::Connecting => "connecting",
            ChannelState::Connected => "connected",
        };
        f.write_str(s)
    }
}
