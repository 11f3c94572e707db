//! MessageRouter: classifies inbound control-channel frames and dispatches
//! them to the right consumer.
//!
//! The router is the single consumer of the control channel's inbound
//! stream.  Each raw text frame is parsed into a [`HubToConsoleMsg`] and
//! routed: pairing events to the [`PairingAgent`], inventory-change
//! notifications to the refresh driver, the `connected` handshake to the
//! liveness flag.  Unparseable frames are logged and dropped — a console
//! talking to a newer hub must not crash on frames it does not know.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use hub_core::HubToConsoleMsg;

use crate::application::agent::PairingAgent;
use crate::application::ports::RefreshKind;

/// Dispatches inbound hub frames to the pairing agent and refresh driver.
pub struct MessageRouter {
    agent: Arc<Mutex<PairingAgent>>,
    refresh: mpsc::UnboundedSender<RefreshKind>,
    /// Set when the hub acknowledges the session with `connected`.
    live: AtomicBool,
}

impl MessageRouter {
    pub fn new(
        agent: Arc<Mutex<PairingAgent>>,
        refresh: mpsc::UnboundedSender<RefreshKind>,
    ) -> Self {
        Self {
            agent,
            refresh,
            live: AtomicBool::new(false),
        }
    }

    /// Whether the hub has acknowledged this session.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Parses and routes one raw text frame.
    ///
    /// Never fails: frames of unknown shape are dropped with a debug log so
    /// protocol evolution on the hub side cannot take the console down.
    pub async fn dispatch(&self, raw: &str) {
        let msg: HubToConsoleMsg = match serde_json::from_str(raw) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "unrecognised frame from hub; dropping");
                return;
            }
        };

        match msg {
            HubToConsoleMsg::Connected => {
                info!("hub acknowledged session");
                self.live.store(true, Ordering::Release);
            }
            HubToConsoleMsg::AgentAction { data } => {
                debug!(device = data.device(), "routing pairing event to agent");
                self.agent.lock().await.on_host_event(data);
            }
            HubToConsoleMsg::BtDevicesUpdated => self.request_refresh(RefreshKind::Bluetooth),
            HubToConsoleMsg::HidDevicesUpdated => self.request_refresh(RefreshKind::Hid),
        }
    }

    /// Consumes the inbound frame stream until the channel closes.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::Receiver<String>) {
        while let Some(raw) = inbound.recv().await {
            self.dispatch(&raw).await;
        }
        debug!("inbound frame stream closed; router stopping");
    }

    fn request_refresh(&self, kind: RefreshKind) {
        if self.refresh.send(kind).is_err() {
            warn!(?kind, "refresh consumer gone; inventory notification dropped");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
