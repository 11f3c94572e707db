//! JSON message types for the hub control channel.
//!
//! The hub speaks a line-of-JSON protocol over a persistent WebSocket.  Every
//! frame is a JSON object with a `"msg"` field naming the message kind; all
//! other fields are flattened into the same object.  For example:
//!
//! ```json
//! {"msg":"cancel_pairing","device":"/org/bluez/hci0/dev_AA_BB"}
//! ```
//!
//! Serde's `#[serde(tag = "msg")]` attribute handles the discriminant
//! automatically, and `rename_all = "snake_case"` maps the Rust variant
//! names onto the wire spelling.
//!
//! # Why separate console→hub and hub→console message types?
//!
//! The two directions carry different information:
//!
//! - The console *sends* decisions and device commands (`cancel_pairing`,
//!   `pair_device`, …).
//! - The hub *sends* pairing prompts and inventory-change notifications.
//!
//! Using two distinct enums makes it a compile-time error to accidentally
//! send a hub-only message back to the hub, and vice versa.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Pairing code value ────────────────────────────────────────────────────────

/// A PIN or passkey value as it appeared on the wire.
///
/// BlueZ agents deliver pin codes as strings and passkeys as integers, but
/// hub builds differ in whether they forward the passkey raw or zero-padded
/// to six digits as a string.  The console must echo the code back *exactly*
/// as it was received — the hub compares it verbatim when verifying a
/// confirmation response — so the code is kept in its original JSON shape
/// rather than normalised to one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PairingCode {
    /// Passkey delivered as a JSON number (e.g. `654321`).
    Number(u64),
    /// PIN or zero-padded passkey delivered as a JSON string (e.g. `"016539"`).
    Text(String),
}

impl fmt::Display for PairingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingCode::Number(n) => write!(f, "{n:06}"),
            PairingCode::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PairingCode {
    fn from(s: &str) -> Self {
        PairingCode::Text(s.to_string())
    }
}

impl From<u64> for PairingCode {
    fn from(n: u64) -> Self {
        PairingCode::Number(n)
    }
}

// ── Console → Hub messages ────────────────────────────────────────────────────

/// All messages the console can send to the hub over the control channel.
///
/// # Serde representation
///
/// ```json
/// {"msg":"connect"}
/// {"msg":"request_confirmation_response","device":"/org/bluez/hci0/dev_AA_BB","passkey":654321,"confirmed":true}
/// {"msg":"pair_device","device":"/org/bluez/hci0/dev_AA_BB"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum ConsoleToHubMsg {
    /// Liveness frame sent once, immediately after the transport opens.
    /// The hub replies with `connected` and starts pushing notifications.
    Connect,

    /// Graceful teardown announcement sent before an operator-initiated
    /// channel refresh.  The hub drops the session without treating the
    /// close as an error.
    Shutdown,

    /// Abort an in-flight pairing exchange for `device`.
    ///
    /// Sent when the operator cancels an informational PIN modal (there is
    /// nothing to confirm, so cancellation is the only possible decision).
    CancelPairing {
        /// Object path of the device being paired.
        device: String,
    },

    /// The operator's verdict on a passkey-confirmation prompt.
    RequestConfirmationResponse {
        /// Object path of the device being paired.
        device: String,
        /// The passkey exactly as the hub presented it.
        passkey: PairingCode,
        /// `true` if the operator accepted the passkey match.
        confirmed: bool,
    },

    /// Ask the hub to initiate pairing with a discovered device.
    PairDevice { device: String },

    /// Ask the hub to connect an already-paired device.
    ConnectDevice { device: String },

    /// Ask the hub to disconnect a connected device.
    DisconnectDevice { device: String },

    /// Ask the hub to remove (unpair and forget) a device.
    RemoveDevice { device: String },
}

impl ConsoleToHubMsg {
    /// Returns the wire name of this message kind.
    ///
    /// Used in log messages so that dropped or failed sends can be named
    /// without serialising the whole frame (which may carry a passkey).
    pub fn kind(&self) -> &'static str {
        match self {
            ConsoleToHubMsg::Connect => "connect",
            ConsoleToHubMsg::Shutdown => "shutdown",
            ConsoleToHubMsg::CancelPairing { .. } => "cancel_pairing",
            ConsoleToHubMsg::RequestConfirmationResponse { .. } => {
                "request_confirmation_response"
            }
            ConsoleToHubMsg::PairDevice { .. } => "pair_device",
            ConsoleToHubMsg::ConnectDevice { .. } => "connect_device",
            ConsoleToHubMsg::DisconnectDevice { .. } => "disconnect_device",
            ConsoleToHubMsg::RemoveDevice { .. } => "remove_device",
        }
    }
}

// ── Hub → Console messages ────────────────────────────────────────────────────

/// All messages the hub pushes to the console over the control channel.
///
/// Message kinds the console does not recognise must be ignored, so the
/// router deserialises defensively and treats a parse failure as a
/// forward-compatible no-op rather than a session error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum HubToConsoleMsg {
    /// Application-level liveness acknowledgment of the console's `connect`
    /// frame.  Distinct from the transport-level connection being open.
    Connected,

    /// A host-originated pairing-agent event; the payload drives the
    /// console's pairing state machine.
    AgentAction {
        /// The embedded agent event.
        data: AgentEvent,
    },

    /// The hub's Bluetooth device registry changed; re-query the inventory.
    BtDevicesUpdated,

    /// The hub's HID device registry changed; re-query the inventory.
    HidDevicesUpdated,
}

// ── Pairing-agent events ──────────────────────────────────────────────────────

/// Host-originated pairing events embedded in `agent_action` frames.
///
/// These map one-to-one onto the BlueZ `org.bluez.Agent1` callbacks the hub
/// implements on the host side.  Pairing is time-sensitive and unsolicited:
/// the hub raises these whenever a remote Bluetooth host starts an
/// out-of-band authentication exchange, and expects exactly one decision
/// back per exchange.
///
/// ```json
/// {"action":"display_pin_code","device":"/org/bluez/hci0/dev_AA_BB","pincode":"123456"}
/// {"action":"confirm_passkey","device":"/org/bluez/hci0/dev_AA_BB","passkey":654321}
/// {"action":"service_authorised","device":"/org/bluez/hci0/dev_AA_BB"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Show a PIN the operator must type on the pairing device.  Purely
    /// informational: the only possible operator action is cancellation.
    DisplayPinCode {
        /// Object path of the device being paired.
        device: String,
        /// The PIN to display, as the hub formatted it.
        pincode: String,
    },

    /// Ask the operator to confirm that the displayed passkey matches the
    /// one shown on the pairing device.
    ConfirmPasskey {
        /// Object path of the device being paired.
        device: String,
        /// The passkey to display and echo back in the response.
        passkey: PairingCode,
    },

    /// The host authorised a service connection; pairing completed on the
    /// hub side.  May arrive with no exchange pending on the console.
    ///
    /// Some hub builds misspell this action on the wire; the alias accepts
    /// the historical spelling on input while always emitting the correct
    /// one on output.
    #[serde(alias = "service_autorised")]
    ServiceAuthorised {
        /// Object path of the authorised device, when the hub includes it.
        device: Option<String>,
    },
}

impl AgentEvent {
    /// Object path of the device the event concerns, when present.
    pub fn device(&self) -> Option<&str> {
        match self {
            AgentEvent::DisplayPinCode { device, .. }
            | AgentEvent::ConfirmPasskey { device, .. } => Some(device),
            AgentEvent::ServiceAuthorised { device } => device.as_deref(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
