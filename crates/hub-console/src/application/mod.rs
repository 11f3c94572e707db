//! Application layer for hub-console.
//!
//! The application layer orchestrates the business logic: it knows *what*
//! to do with a hub event or an operator decision, but delegates *how* —
//! sockets, HTTP, rendering — to the infrastructure layer behind the port
//! traits in [`ports`].
//!
//! # Responsibilities
//!
//! - The pairing-agent state machine ([`agent::PairingAgent`])
//! - Classifying and dispatching inbound frames ([`router::MessageRouter`])
//! - Device lifecycle command construction ([`commands::DeviceCommands`])
//! - Driving inventory refreshes and reconciliation ([`inventory::InventoryDriver`])
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or sending HTTP requests (infrastructure)
//! - WebSocket framing (handled by tokio-tungstenite)
//! - Terminal rendering (the ui_bridge adapter)

pub mod agent;
pub mod commands;
pub mod inventory;
pub mod ports;
pub mod router;

pub use agent::PairingAgent;
pub use commands::DeviceCommands;
pub use inventory::InventoryDriver;
pub use ports::{InventoryGateway, ModalSurface, Notifier, RefreshKind};
pub use router::MessageRouter;
