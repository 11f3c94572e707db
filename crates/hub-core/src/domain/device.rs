//! Bluetooth and HID device records.
//!
//! These mirror the JSON the hub's `/bluetoothdevices` and `/hiddevices`
//! endpoints return.  Fields the console does not consume are simply not
//! modelled; serde ignores unknown fields by default, which keeps the
//! console tolerant of hub-side additions.
//!
//! Boolean and collection fields use `#[serde(default)]` so that older hub
//! builds which omit a flag deserialise as `false`/empty rather than failing
//! the whole inventory refresh.

use serde::{Deserialize, Serialize};

// ── Bluetooth ─────────────────────────────────────────────────────────────────

/// One Bluetooth peer known to the hub's adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BluetoothDevice {
    /// BlueZ object path, e.g. `/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF`.
    /// This is the unique key correlating pairing events to decisions.
    pub path: String,

    /// MAC address, e.g. `AA:BB:CC:DD:EE:FF`.
    #[serde(default)]
    pub address: String,

    /// Human-readable name advertised by the device.
    #[serde(default)]
    pub alias: String,

    /// `true` once a pairing exchange has completed for this device.
    #[serde(default)]
    pub paired: bool,

    /// `true` while the device has an active connection to the hub.
    #[serde(default)]
    pub connected: bool,

    /// `true` if this peer is a host the hub forwards input *to* (as opposed
    /// to a peripheral it captures input *from*).
    #[serde(default)]
    pub host: bool,
}

/// Snapshot of the hub's Bluetooth registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BtInventory {
    #[serde(default)]
    pub devices: Vec<BluetoothDevice>,
    /// `true` while the adapter is actively scanning for new peers.
    #[serde(default)]
    pub scanning: bool,
}

// ── HID ───────────────────────────────────────────────────────────────────────

/// One local HID device (keyboard, mouse) the hub can capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HidDevice {
    /// Hub-assigned identifier used in capture/filter commands.
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// `true` while the hub is capturing this device's input.
    #[serde(default)]
    pub capture: bool,

    /// Identifier of the message filter currently applied to this device.
    #[serde(default)]
    pub filter: String,

    /// `true` when the device is driven through the keyboard-compatibility
    /// path; capture cannot be toggled in that mode.
    #[serde(default)]
    pub compatibility_mode: bool,
}

/// A message filter the hub can apply to a captured HID device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HidFilter {
    pub id: String,
    pub name: String,
}

/// Snapshot of the hub's HID registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HidInventory {
    #[serde(default)]
    pub devices: Vec<HidDevice>,
    #[serde(default)]
    pub filters: Vec<HidFilter>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Extracts a display-friendly MAC address from a BlueZ object path.
///
/// `/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF` → `AA:BB:CC:DD:EE:FF`.
///
/// Returns `None` when the path does not end in a `dev_…` component, in
/// which case callers fall back to showing the raw path.
pub fn address_from_path(path: &str) -> Option<String> {
    let component = path.rsplit('/').next()?;
    let mac = component.strip_prefix("dev_")?;
    if mac.is_empty() {
        return None;
    }
    Some(mac.replace('_', ":"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
