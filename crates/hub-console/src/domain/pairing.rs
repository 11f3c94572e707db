//! Pairing exchange state and modal presentation values.
//!
//! The console tracks **at most one** out-of-band pairing exchange at a
//! time.  [`PendingPairingRequest`] is that single slot; it is created when
//! the hub raises a prompt and destroyed the instant its outcome leaves
//! [`PairingOutcome::Pending`], whether by operator action, host
//! confirmation, or external resolution (the inventory reports the device
//! already paired).

use hub_core::{address_from_path, PairingCode};

// ── Exchange state ────────────────────────────────────────────────────────────

/// Which kind of authentication prompt the hub raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingKind {
    /// The operator must type the shown PIN on the pairing device; the only
    /// available decision is cancellation.
    DisplayPin,
    /// The operator must confirm the shown passkey matches the one on the
    /// pairing device; the available decisions are accept and reject.
    ConfirmPasskey,
}

/// Terminal-or-pending outcome of a pairing exchange.
///
/// Terminal once set to anything but `Pending` — the slot holding the
/// request is cleared in the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingOutcome {
    /// Awaiting either operator or host resolution.
    Pending,
    /// Operator confirmed the passkey match.
    Accepted,
    /// Operator rejected the passkey match.
    Rejected,
    /// Operator dismissed the prompt.
    CancelledByOperator,
    /// The inventory reported the device paired before the operator acted.
    ResolvedExternally,
}

/// The single in-flight pairing exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPairingRequest {
    /// BlueZ object path of the device being paired; the unique key
    /// correlating hub events to the operator's decision.
    pub device: String,
    pub kind: PairingKind,
    /// The PIN or passkey shown to the operator, kept in its wire shape so
    /// the response echoes it exactly.
    pub code: PairingCode,
    pub outcome: PairingOutcome,
}

impl PendingPairingRequest {
    /// Creates a fresh pending exchange.
    pub fn new(device: impl Into<String>, kind: PairingKind, code: PairingCode) -> Self {
        Self {
            device: device.into(),
            kind,
            code,
            outcome: PairingOutcome::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.outcome == PairingOutcome::Pending
    }
}

// ── Operator input ────────────────────────────────────────────────────────────

/// The single decision an operator can make on an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorDecision {
    /// Accept the passkey match (decision modals only).
    Confirm,
    /// Reject the passkey match (decision modals only).
    Reject,
    /// Dismiss the prompt and abort the exchange.
    Cancel,
}

// ── Modal presentation ────────────────────────────────────────────────────────

/// Which controls the modal exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    /// No accept/reject controls, only cancel (PIN display).
    Informational,
    /// Accept and reject visible, cancel hidden (passkey confirmation).
    Decision,
}

/// What the modal displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    /// Short heading, e.g. `Pair?`.
    pub heading: String,
    /// Instruction line shown above the code.
    pub prompt: String,
    /// The large-type PIN or passkey.
    pub code: String,
    /// Device label, preferring the MAC address over the raw object path.
    pub device_label: String,
}

impl ModalContent {
    /// Content for an informational PIN-display prompt.
    pub fn display_pin(device: &str, pincode: &str) -> Self {
        Self {
            heading: "Pair?".to_string(),
            prompt: "Type in the pin code and hit Enter:".to_string(),
            code: pincode.to_string(),
            device_label: device_label(device),
        }
    }

    /// Content for a passkey-confirmation prompt.
    pub fn confirm_passkey(device: &str, passkey: &PairingCode) -> Self {
        Self {
            heading: "Pair to host?".to_string(),
            prompt: "Confirm you see the same passkey on host:".to_string(),
            code: passkey.to_string(),
            device_label: device_label(device),
        }
    }
}

/// MAC address when the object path carries one, otherwise the raw path.
fn device_label(device: &str) -> String {
    address_from_path(device).unwrap_or_else(|| device.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
