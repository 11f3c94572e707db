//! InventoryDriver: keeps the console's device view in sync with the hub.
//!
//! Change notifications on the control channel carry no payload; they only
//! say *which* registry changed.  The driver answers each notification by
//! re-querying the hub's HTTP inventory endpoints, caching the fresh
//! snapshot for the presentation layer, and handing the Bluetooth snapshot
//! to the pairing agent so an exchange the host already finished can be
//! reconciled.

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use hub_core::{BtInventory, HidInventory};

use crate::application::agent::PairingAgent;
use crate::application::ports::{InventoryGateway, Notifier, RefreshKind};

/// Fetches inventory snapshots on demand and fans them out.
pub struct InventoryDriver {
    gateway: Arc<dyn InventoryGateway>,
    agent: Arc<Mutex<PairingAgent>>,
    notifier: Arc<dyn Notifier>,
    /// Last snapshots seen, for the presentation layer to render.
    bluetooth: StdMutex<BtInventory>,
    hid: StdMutex<HidInventory>,
}

impl InventoryDriver {
    pub fn new(
        gateway: Arc<dyn InventoryGateway>,
        agent: Arc<Mutex<PairingAgent>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            agent,
            notifier,
            bluetooth: StdMutex::new(BtInventory::default()),
            hid: StdMutex::new(HidInventory::default()),
        }
    }

    /// Last Bluetooth snapshot fetched.
    pub fn bluetooth_snapshot(&self) -> BtInventory {
        self.bluetooth.lock().unwrap().clone()
    }

    /// Last HID snapshot fetched.
    pub fn hid_snapshot(&self) -> HidInventory {
        self.hid.lock().unwrap().clone()
    }

    /// Answers one refresh request.
    ///
    /// Fetch failures are reported to the operator and leave the previous
    /// snapshot in place; the next change notification retries naturally.
    pub async fn handle(&self, kind: RefreshKind) {
        match kind {
            RefreshKind::Bluetooth => self.refresh_bluetooth().await,
            RefreshKind::Hid => self.refresh_hid().await,
            RefreshKind::All => {
                self.refresh_bluetooth().await;
                self.refresh_hid().await;
            }
        }
    }

    /// Consumes refresh requests until the channel closes.
    ///
    /// Starts with a full fetch so the view is populated before the first
    /// change notification arrives.
    pub async fn run(self: Arc<Self>, mut requests: mpsc::UnboundedReceiver<RefreshKind>) {
        self.handle(RefreshKind::All).await;
        while let Some(kind) = requests.recv().await {
            self.handle(kind).await;
        }
        debug!("refresh request stream closed; inventory driver stopping");
    }

    async fn refresh_bluetooth(&self) {
        match self.gateway.bluetooth_devices().await {
            Ok(snapshot) => {
                debug!(
                    devices = snapshot.devices.len(),
                    scanning = snapshot.scanning,
                    "bluetooth inventory refreshed"
                );
                self.agent
                    .lock()
                    .await
                    .on_inventory_updated(&snapshot.devices);
                *self.bluetooth.lock().unwrap() = snapshot;
            }
            Err(err) => {
                warn!(%err, "bluetooth inventory fetch failed");
                self.notifier.notice("Failed to fetch Bluetooth devices");
            }
        }
    }

    async fn refresh_hid(&self) {
        match self.gateway.hid_devices().await {
            Ok(snapshot) => {
                debug!(devices = snapshot.devices.len(), "hid inventory refreshed");
                *self.hid.lock().unwrap() = snapshot;
            }
            Err(err) => {
                warn!(%err, "hid inventory fetch failed");
                self.notifier.notice("Failed to fetch input devices");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
