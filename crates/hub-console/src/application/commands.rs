//! Device lifecycle commands: pair, connect, disconnect, remove.
//!
//! Thin command constructors over the outbound frame channel.  Each takes a
//! BlueZ object path and enqueues exactly one frame; delivery (or silent
//! drop while disconnected) is the control channel's concern, and the hub
//! answers with a `bt_devices_updated` broadcast rather than a direct
//! response.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use hub_core::ConsoleToHubMsg;

/// Issues device lifecycle commands over the control channel.
#[derive(Clone)]
pub struct DeviceCommands {
    outbound: mpsc::UnboundedSender<ConsoleToHubMsg>,
}

impl DeviceCommands {
    pub fn new(outbound: mpsc::UnboundedSender<ConsoleToHubMsg>) -> Self {
        Self { outbound }
    }

    /// Asks the hub to initiate pairing with the device.
    pub fn pair(&self, device: &str) {
        self.send(ConsoleToHubMsg::PairDevice {
            device: device.to_string(),
        });
    }

    /// Asks the hub to connect to an already-paired device.
    pub fn connect(&self, device: &str) {
        self.send(ConsoleToHubMsg::ConnectDevice {
            device: device.to_string(),
        });
    }

    /// Asks the hub to disconnect the device without unpairing it.
    pub fn disconnect(&self, device: &str) {
        self.send(ConsoleToHubMsg::DisconnectDevice {
            device: device.to_string(),
        });
    }

    /// Asks the hub to unpair and forget the device.
    pub fn remove(&self, device: &str) {
        self.send(ConsoleToHubMsg::RemoveDevice {
            device: device.to_string(),
        });
    }

    fn send(&self, msg: ConsoleToHubMsg) {
        debug!(kind = msg.kind(), "queueing device command");
        if self.outbound.send(msg).is_err() {
            warn!("outbound pump gone; device command dropped");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
