//! Domain layer for hub-console.
//!
//! Pure types with no dependencies on I/O, networking, or external
//! frameworks.  Everything here is constructible and assertable in a plain
//! unit test.
//!
//! # What belongs in the domain layer?
//!
//! - The control-channel state enum
//! - The single-slot pairing exchange state and its outcomes
//! - Modal presentation values (mode + content)
//! - Configuration structures
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `WebSocket`, or `reqwest` types
//! - Channel senders or task handles
//! - Anything that could block or fail due to external state

pub mod channel;
pub mod config;
pub mod pairing;

pub use channel::ChannelState;
pub use config::ConsoleConfig;
pub use pairing::{
    ModalContent, ModalMode, OperatorDecision, PairingKind, PairingOutcome,
    PendingPairingRequest,
};
