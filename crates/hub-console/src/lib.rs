//! hub-console library crate.
//!
//! This crate is the operator console for a HIDHub bridge service: it keeps
//! a persistent WebSocket control channel open to the hub, answers the
//! hub's Bluetooth pairing prompts on behalf of the operator, and drives
//! the hub's inventory and command endpoints.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Hub service (JSON over WebSocket + HTTP)
//!         ↕
//! [hub-console]
//!   ├── domain/           Pure types: ConsoleConfig, ChannelState, pairing state
//!   ├── application/      PairingAgent, MessageRouter, ports, commands
//!   └── infrastructure/
//!         ├── control_channel/  WebSocket session manager (tokio-tungstenite)
//!         ├── hub_api/          HTTP inventory/command client (reqwest)
//!         └── ui_bridge/        terminal modal + notifier adapters
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `hub-core`; its only runtime
//!   dependency is the channel types it uses to emit events.
//! - `infrastructure` depends on all other layers plus `tokio`,
//!   `tungstenite`, and `reqwest`.
//!
//! The pairing state machine lives entirely in the application layer so it
//! can be tested without a network; the WebSocket lifecycle is covered by
//! integration tests that run a scripted in-process hub.

/// Domain layer: pure business-logic types (no I/O).
pub mod domain;

/// Application layer: pairing agent, frame router, and port traits.
pub mod application;

/// Infrastructure layer: WebSocket channel, HTTP client, terminal UI.
pub mod infrastructure;
