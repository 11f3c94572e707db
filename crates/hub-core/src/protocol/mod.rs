//! Wire protocol for the hub's WebSocket control channel.
//!
//! Frames are JSON objects, one per WebSocket text message, discriminated by
//! a `"msg"` field.  Pairing-agent events ride inside `agent_action` frames
//! and carry their own `"action"` discriminant.
//!
//! # What belongs here?
//!
//! - The two direction-specific message enums and the agent event payload
//! - The `PairingCode` value type shared by prompts and responses
//!
//! # What does NOT belong here?
//!
//! - WebSocket framing (tokio-tungstenite handles that)
//! - Dispatch logic (the console's router owns that)

pub mod messages;

pub use messages::{AgentEvent, ConsoleToHubMsg, HubToConsoleMsg, PairingCode};
