//! Port traits: the seams between the application layer and the outside
//! world.
//!
//! The presentation layer and the inventory query service are external
//! collaborators; the console only consumes their interface contracts.
//! Keeping them behind traits lets every state-machine test run with a
//! recording fake instead of a terminal or a live hub.

use async_trait::async_trait;
use hub_core::{BtInventory, HidInventory};

use crate::domain::{ModalContent, ModalMode};

// ── Presentation ──────────────────────────────────────────────────────────────

/// Modal dialog capability of the presentation layer.
///
/// The surface shows at most one modal at a time; opening a new one
/// replaces whatever is on screen.  The operator's single decision per open
/// modal arrives separately, through the agent's decision entry point.
#[cfg_attr(test, mockall::automock)]
pub trait ModalSurface: Send + Sync {
    /// Opens (or replaces) the modal with the given controls and content.
    fn open(&self, mode: ModalMode, content: ModalContent);

    /// Closes the modal if one is open; a no-op otherwise.
    fn close(&self);
}

/// Transient, non-blocking operator notices (connection lost, request
/// failed).  Never used for pairing prompts — those go through the modal.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notice(&self, text: &str);
}

// ── Inventory ─────────────────────────────────────────────────────────────────

/// Which registry a refresh request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    Bluetooth,
    Hid,
    /// Both registries; used at startup and after `service_authorised`.
    All,
}

/// Read access to the hub's device-inventory query service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Current Bluetooth registry snapshot.
    async fn bluetooth_devices(&self) -> anyhow::Result<BtInventory>;

    /// Current HID registry snapshot.
    async fn hid_devices(&self) -> anyhow::Result<HidInventory>;
}
