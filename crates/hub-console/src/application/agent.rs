//! PairingAgent: the out-of-band pairing state machine.
//!
//! Realizes the Bluetooth agent role for exactly one in-flight
//! authentication exchange at a time.  Host-originated events arrive from
//! the router, operator decisions arrive from the presentation layer, and
//! exactly one outgoing decision frame is emitted per exchange.
//!
//! # The single-slot invariant
//!
//! The agent holds `Option<PendingPairingRequest>`.  A new prompt while an
//! exchange is pending is a protocol violation on the hub's side; the
//! policy is replace-and-log — the stale request is pre-empted and the new
//! one proceeds, so the operator always sees the prompt the host is
//! actually waiting on.  Whenever the outcome leaves `Pending` the slot is
//! cleared in the same step, before any further event is processed.
//!
//! # Event sources
//!
//! ```text
//! router ──on_host_event──────────┐
//! presentation ──on_operator_decision──► PairingAgent ──► outbound frames
//! inventory ──on_inventory_updated┘           │
//!                                             └──► modal open/close
//! ```
//!
//! All three entry points run on the same `tokio::sync::Mutex`-guarded
//! instance, so events are applied one at a time in arrival order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use hub_core::{AgentEvent, BluetoothDevice, ConsoleToHubMsg};

use crate::application::ports::{ModalSurface, RefreshKind};
use crate::domain::{
    ModalContent, ModalMode, OperatorDecision, PairingKind, PairingOutcome,
    PendingPairingRequest,
};

/// The pairing-agent state machine.
pub struct PairingAgent {
    /// The single pending-exchange slot.
    pending: Option<PendingPairingRequest>,
    modal: Arc<dyn ModalSurface>,
    /// Outbound decision frames; a pump task forwards these to the control
    /// channel.  Unbounded so the agent's entry points never suspend.
    outbound: mpsc::UnboundedSender<ConsoleToHubMsg>,
    /// Inventory refresh requests raised by `service_authorised`.
    refresh: mpsc::UnboundedSender<RefreshKind>,
}

impl PairingAgent {
    pub fn new(
        modal: Arc<dyn ModalSurface>,
        outbound: mpsc::UnboundedSender<ConsoleToHubMsg>,
        refresh: mpsc::UnboundedSender<RefreshKind>,
    ) -> Self {
        Self {
            pending: None,
            modal,
            outbound,
            refresh,
        }
    }

    /// Object path of the device in the pending exchange, if any.
    pub fn pending_device(&self) -> Option<&str> {
        self.pending.as_ref().map(|req| req.device.as_str())
    }

    // ── Host events ───────────────────────────────────────────────────────────

    /// Entry point for host-originated pairing events (from `agent_action`
    /// frames).
    pub fn on_host_event(&mut self, event: AgentEvent) {
        match event {
            AgentEvent::DisplayPinCode { device, pincode } => {
                let content = ModalContent::display_pin(&device, &pincode);
                self.begin_exchange(
                    PendingPairingRequest::new(device, PairingKind::DisplayPin, pincode.as_str().into()),
                    ModalMode::Informational,
                    content,
                );
            }
            AgentEvent::ConfirmPasskey { device, passkey } => {
                let content = ModalContent::confirm_passkey(&device, &passkey);
                self.begin_exchange(
                    PendingPairingRequest::new(device, PairingKind::ConfirmPasskey, passkey),
                    ModalMode::Decision,
                    content,
                );
            }
            AgentEvent::ServiceAuthorised { device } => {
                // Host-side completion can race both the prompt and the
                // operator: close whatever is on screen, resolve a matching
                // pending exchange, and re-query the inventory.
                debug!(device = device.as_deref(), "service authorised by host");
                self.modal.close();
                let resolved = match (&self.pending, &device) {
                    (Some(req), Some(dev)) => req.device == *dev,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if resolved {
                    self.resolve(PairingOutcome::ResolvedExternally);
                }
                if self.refresh.send(RefreshKind::All).is_err() {
                    debug!("refresh consumer gone; skipping inventory refresh");
                }
            }
        }
    }

    /// Installs a new pending exchange, pre-empting a stale one if needed,
    /// and raises the matching modal.
    fn begin_exchange(
        &mut self,
        request: PendingPairingRequest,
        mode: ModalMode,
        content: ModalContent,
    ) {
        if let Some(stale) = self.pending.take() {
            // Protocol violation: the hub should never raise a second
            // prompt while one is unanswered.  Pre-empt the stale exchange
            // so the operator answers the prompt the host is waiting on.
            warn!(
                stale_device = %stale.device,
                new_device = %request.device,
                "pairing prompt while another is pending; pre-empting stale request"
            );
        }
        debug!(device = %request.device, kind = ?request.kind, "pairing exchange started");
        self.pending = Some(request);
        self.modal.open(mode, content);
    }

    // ── Operator decisions ────────────────────────────────────────────────────

    /// Entry point for the operator's single decision on the open modal.
    ///
    /// A decision with no pending exchange is stale (the exchange resolved
    /// externally while the operator reached for the button) and is ignored.
    pub fn on_operator_decision(&mut self, decision: OperatorDecision) {
        let Some(req) = self.pending.take() else {
            debug!(?decision, "operator decision with no pending exchange; ignoring");
            return;
        };

        match (decision, req.kind) {
            (OperatorDecision::Cancel, _) => {
                self.send(ConsoleToHubMsg::CancelPairing {
                    device: req.device.clone(),
                });
                self.finish(req, PairingOutcome::CancelledByOperator);
            }
            (OperatorDecision::Confirm, PairingKind::ConfirmPasskey) => {
                self.send(ConsoleToHubMsg::RequestConfirmationResponse {
                    device: req.device.clone(),
                    passkey: req.code.clone(),
                    confirmed: true,
                });
                self.finish(req, PairingOutcome::Accepted);
            }
            (OperatorDecision::Reject, PairingKind::ConfirmPasskey) => {
                self.send(ConsoleToHubMsg::RequestConfirmationResponse {
                    device: req.device.clone(),
                    passkey: req.code.clone(),
                    confirmed: false,
                });
                self.finish(req, PairingOutcome::Rejected);
            }
            (other, PairingKind::DisplayPin) => {
                // Informational modals expose no accept/reject controls;
                // such a decision can only come from a desynced surface.
                // The exchange stays pending.
                warn!(decision = ?other, "accept/reject on an informational prompt; ignoring");
                self.pending = Some(req);
            }
        }
    }

    // ── External reconciliation ───────────────────────────────────────────────

    /// Reconciles the pending exchange against a fresh Bluetooth snapshot.
    ///
    /// If the pending device now reports `paired`, the host finished the
    /// exchange without the operator: the slot clears, the modal closes,
    /// and no decision frame is ever emitted for that exchange.
    pub fn on_inventory_updated(&mut self, devices: &[BluetoothDevice]) {
        let Some(req) = &self.pending else { return };

        let externally_paired = devices
            .iter()
            .any(|device| device.path == req.device && device.paired);
        if externally_paired {
            self.modal.close();
            self.resolve(PairingOutcome::ResolvedExternally);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    /// Marks a terminal outcome for a request already removed from the slot
    /// and closes the modal.
    fn finish(&self, mut req: PendingPairingRequest, outcome: PairingOutcome) {
        req.outcome = outcome;
        debug!(device = %req.device, ?outcome, "pairing exchange finished");
        self.modal.close();
    }

    /// Takes the pending request out of the slot with a terminal outcome.
    fn resolve(&mut self, outcome: PairingOutcome) {
        if let Some(mut req) = self.pending.take() {
            req.outcome = outcome;
            debug!(device = %req.device, ?outcome, "pairing exchange resolved");
        }
    }

    fn send(&self, msg: ConsoleToHubMsg) {
        if self.outbound.send(msg).is_err() {
            warn!("outbound pump gone; pairing decision frame dropped");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
