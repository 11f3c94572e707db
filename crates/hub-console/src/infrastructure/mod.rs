//! Infrastructure layer for hub-console.
//!
//! Everything that touches the outside world lives here: the WebSocket
//! control channel to the hub, the HTTP inventory/maintenance client, and
//! the terminal presentation adapter.  The application layer sees these
//! only through its port traits and message channels.

pub mod control_channel;
pub mod hub_api;
pub mod ui_bridge;

pub use control_channel::{ChannelError, ControlChannel};
pub use hub_api::{HubApiClient, HubApiError};
pub use ui_bridge::{
    read_operator_input, ConsoleCommand, OperatorInput, TerminalModal, TerminalNotifier,
};
