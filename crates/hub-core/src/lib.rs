//! # hub-core
//!
//! Shared library for the HIDHub console containing the JSON wire protocol
//! spoken over the hub's WebSocket control channel and the device-inventory
//! domain records returned by its HTTP endpoints.
//!
//! This crate is used by the console application and by its integration
//! tests.  It has zero dependencies on sockets, async runtimes, or UI
//! frameworks.
//!
//! # Architecture overview
//!
//! The HIDHub is a small host-side service (typically a Raspberry Pi) that
//! captures local HID devices and relays their input to Bluetooth hosts.
//! The console is its remote control: it lists devices, toggles capture and
//! scanning, and — the interesting part — answers Bluetooth pairing prompts
//! on behalf of the operator.
//!
//! This crate defines:
//!
//! - **`protocol`** – The JSON frames that travel over the persistent
//!   WebSocket control channel, in both directions, plus the pairing-agent
//!   event payloads embedded in `agent_action` frames.
//!
//! - **`domain`** – Pure device records (`BluetoothDevice`, `HidDevice` and
//!   their inventory envelopes) with no behaviour beyond what the console
//!   needs to render lists and reconcile pairing state.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `hub_core::ConsoleToHubMsg` instead of the full module path.
pub use domain::device::{
    address_from_path, BluetoothDevice, BtInventory, HidDevice, HidFilter, HidInventory,
};
pub use protocol::messages::{AgentEvent, ConsoleToHubMsg, HubToConsoleMsg, PairingCode};
