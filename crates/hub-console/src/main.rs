//! hub-console — entry point.
//!
//! Terminal console for a Bluetooth HID hub.  The console holds one
//! persistent WebSocket session to the hub for events and pairing, and uses
//! the hub's HTTP endpoints for inventory snapshots and maintenance
//! actions.
//!
//! # Usage
//!
//! ```text
//! hub-console [OPTIONS]
//!
//! Options:
//!   --hub-host <HOST>             Hub hostname or IP [default: 127.0.0.1]
//!   --hub-port <PORT>             Hub HTTP/WebSocket port [default: 8080]
//!   --reconnect-delay-ms <MS>     Redial quiescence delay [default: 1000]
//!   --request-timeout-secs <SECS> HTTP request timeout [default: 5]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                      | Default     | Description              |
//! |-------------------------------|-------------|--------------------------|
//! | `HIDHUB_HOST`                 | `127.0.0.1` | Hub hostname or IP       |
//! | `HIDHUB_PORT`                 | `8080`      | Hub HTTP/WebSocket port  |
//! | `HIDHUB_RECONNECT_DELAY_MS`   | `1000`      | Redial quiescence delay  |
//! | `HIDHUB_REQUEST_TIMEOUT_SECS` | `5`         | HTTP request timeout     |
//!
//! # Task layout
//!
//! ```text
//! redial loop (this fn) ──► ControlChannel ──► read task ──► inbound frames
//!                                 ▲                              │
//! outbound pump ◄── frame channel ┘            MessageRouter ◄───┘
//!                                                │        │
//! stdin reader ──► decisions ──► PairingAgent ◄──┘        └──► refresh
//!                                                               │
//!                               InventoryDriver ◄───────────────┘
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hub_console::application::{DeviceCommands, InventoryDriver, MessageRouter, PairingAgent};
use hub_console::domain::ConsoleConfig;
use hub_console::infrastructure::{
    read_operator_input, ConsoleCommand, ControlChannel, HubApiClient, OperatorInput,
    TerminalModal, TerminalNotifier,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote console for a Bluetooth HID hub.
///
/// Connects to the hub's control channel, renders pairing prompts, and
/// keeps a live view of the hub's Bluetooth and input-device registries.
#[derive(Debug, Parser)]
#[command(
    name = "hub-console",
    about = "Remote pairing and device console for a Bluetooth HID hub",
    version
)]
struct Cli {
    /// Hostname or IP address of the hub.
    #[arg(long, default_value = "127.0.0.1", env = "HIDHUB_HOST")]
    hub_host: String,

    /// Port serving both the hub's HTTP endpoints and its `/ws` control
    /// channel.
    #[arg(long, default_value_t = 8080, env = "HIDHUB_PORT")]
    hub_port: u16,

    /// Quiescence delay in milliseconds between losing the control channel
    /// and redialling.  Also applied inside an operator-forced refresh.
    #[arg(long, default_value_t = 1000, env = "HIDHUB_RECONNECT_DELAY_MS")]
    reconnect_delay_ms: u64,

    /// Per-request timeout in seconds for the hub's HTTP endpoints.
    #[arg(long, default_value_t = 5, env = "HIDHUB_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: u64,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ConsoleConfig`].
    fn into_console_config(self) -> ConsoleConfig {
        ConsoleConfig {
            hub_ws_url: format!("ws://{}:{}/ws", self.hub_host, self.hub_port),
            hub_http_url: format!("http://{}:{}", self.hub_host, self.hub_port),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log level comes from RUST_LOG, defaulting to `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.into_console_config();

    info!(
        "hub-console starting — ws={}, http={}",
        config.hub_ws_url, config.hub_http_url
    );

    // ── Wiring ────────────────────────────────────────────────────────────────
    let modal: Arc<TerminalModal> = Arc::new(TerminalModal);
    let notifier: Arc<TerminalNotifier> = Arc::new(TerminalNotifier);

    let (outbound_tx, mut outbound_rx) = tokio::sync::mpsc::unbounded_channel();
    let (refresh_tx, refresh_rx) = tokio::sync::mpsc::unbounded_channel();
    let (input_tx, mut input_rx) = tokio::sync::mpsc::unbounded_channel();

    let agent = Arc::new(tokio::sync::Mutex::new(PairingAgent::new(
        modal,
        outbound_tx.clone(),
        refresh_tx.clone(),
    )));
    let router = Arc::new(MessageRouter::new(Arc::clone(&agent), refresh_tx));
    let api = Arc::new(HubApiClient::new(&config)?);
    let commands = DeviceCommands::new(outbound_tx);
    let driver = Arc::new(InventoryDriver::new(
        Arc::clone(&api) as _,
        Arc::clone(&agent),
        Arc::clone(&notifier) as _,
    ));

    let (channel, inbound_rx) = ControlChannel::new(config.clone(), notifier);

    // ── Background tasks ──────────────────────────────────────────────────────
    tokio::spawn(Arc::clone(&router).run(inbound_rx));
    tokio::spawn(Arc::clone(&driver).run(refresh_rx));
    tokio::spawn(read_operator_input(input_tx));

    // Outbound pump: the agent and command layer enqueue frames; only this
    // task touches the channel's write half.
    let send_channel = Arc::clone(&channel);
    tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            send_channel.send(&msg).await;
        }
    });

    // Operator input: decisions go to the agent, commands are executed here.
    let input_agent = Arc::clone(&agent);
    let input_channel = Arc::clone(&channel);
    let input_driver = Arc::clone(&driver);
    tokio::spawn(async move {
        while let Some(input) = input_rx.recv().await {
            match input {
                OperatorInput::Decision(decision) => {
                    input_agent.lock().await.on_operator_decision(decision);
                }
                OperatorInput::Command(command) => {
                    run_command(command, &commands, &api, &input_channel, &input_driver).await;
                }
            }
        }
    });

    // ── Shutdown flag ─────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Redial loop ───────────────────────────────────────────────────────────
    //
    // The channel never redials itself; this loop is the single place that
    // decides to try again, at a fixed cadence.
    while running.load(Ordering::Relaxed) {
        if channel.state() == hub_console::domain::ChannelState::Disconnected {
            if let Err(e) = channel.connect().await {
                warn!("dial failed: {e}");
            }
        }
        tokio::time::sleep(config.reconnect_delay).await;
    }

    info!("hub-console stopped");
    Ok(())
}

// ── Command execution ─────────────────────────────────────────────────────────

/// Executes one typed console command.
///
/// Device lifecycle verbs become control-channel frames; everything else is
/// an HTTP call or a local action.  Failures are printed, never fatal.
async fn run_command(
    command: ConsoleCommand,
    commands: &DeviceCommands,
    api: &HubApiClient,
    channel: &Arc<ControlChannel>,
    driver: &Arc<InventoryDriver>,
) {
    let result = match command {
        ConsoleCommand::Pair(device) => {
            commands.pair(&device);
            Ok(())
        }
        ConsoleCommand::Connect(device) => {
            commands.connect(&device);
            Ok(())
        }
        ConsoleCommand::Disconnect(device) => {
            commands.disconnect(&device);
            Ok(())
        }
        ConsoleCommand::Remove(device) => {
            commands.remove(&device);
            Ok(())
        }
        ConsoleCommand::Capture(id, on) => api.set_device_capture(&id, on).await,
        ConsoleCommand::Password(current, new) => api.change_password(&current, &new).await,
        ConsoleCommand::Filter(id, filter) => api.set_device_filter(&id, &filter).await,
        ConsoleCommand::Scan(true) => api.start_scanning().await,
        ConsoleCommand::Scan(false) => api.stop_scanning().await,
        ConsoleCommand::Discoverable(true) => api.start_discoverable().await,
        ConsoleCommand::Discoverable(false) => api.stop_discoverable().await,
        ConsoleCommand::RestartService => api.restart_service().await,
        ConsoleCommand::Reboot => api.reboot().await,
        ConsoleCommand::Devices => {
            print_inventory(driver);
            Ok(())
        }
        ConsoleCommand::Refresh => {
            if let Err(e) = channel.refresh().await {
                warn!("refresh failed: {e}");
            }
            Ok(())
        }
    };
    if let Err(e) = result {
        println!("*** command failed: {e}");
    }
}

/// Prints the cached inventory snapshots as plain tables.
fn print_inventory(driver: &Arc<InventoryDriver>) {
    let bt = driver.bluetooth_snapshot();
    println!(
        "Bluetooth devices (scanning: {}):",
        if bt.scanning { "on" } else { "off" }
    );
    for device in &bt.devices {
        println!(
            "  {}  {}  paired={} connected={}{}",
            device.address,
            device.alias,
            device.paired,
            device.connected,
            if device.host { "  [host]" } else { "" }
        );
    }

    let hid = driver.hid_snapshot();
    println!("Input devices:");
    for device in &hid.devices {
        println!(
            "  {}  {}  capture={} filter={}",
            device.id, device.name, device.capture, device.filter
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
