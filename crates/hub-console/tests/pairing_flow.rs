//! End-to-end pairing flows against a scripted in-process hub.
//!
//! Each test binds a real WebSocket server on a loopback port, drives the
//! full console pipeline (control channel → router → agent → outbound
//! pump), and asserts on the exact frames the scripted hub receives.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};

use hub_console::application::{MessageRouter, PairingAgent, RefreshKind};
use hub_console::application::ports::{ModalSurface, Notifier};
use hub_console::domain::{ConsoleConfig, ModalContent, ModalMode, OperatorDecision};
use hub_console::infrastructure::ControlChannel;

// ── Test doubles ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingModal {
    opened: StdMutex<Vec<(ModalMode, String)>>,
}

impl ModalSurface for RecordingModal {
    fn open(&self, mode: ModalMode, content: ModalContent) {
        self.opened.lock().unwrap().push((mode, content.code));
    }
    fn close(&self) {}
}

#[derive(Default)]
struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notice(&self, _text: &str) {}
}

// ── Harness ───────────────────────────────────────────────────────────────────

struct Console {
    channel: Arc<ControlChannel>,
    agent: Arc<Mutex<PairingAgent>>,
    modal: Arc<RecordingModal>,
    refresh_rx: mpsc::UnboundedReceiver<RefreshKind>,
}

/// Builds the full console pipeline pointed at `url` and starts its tasks.
fn console(url: &str) -> Console {
    let modal = Arc::new(RecordingModal::default());
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();

    let agent = Arc::new(Mutex::new(PairingAgent::new(
        Arc::clone(&modal) as Arc<dyn ModalSurface>,
        outbound_tx,
        refresh_tx.clone(),
    )));
    let router = Arc::new(MessageRouter::new(Arc::clone(&agent), refresh_tx));

    let config = ConsoleConfig {
        hub_ws_url: url.to_string(),
        reconnect_delay: Duration::from_millis(10),
        ..ConsoleConfig::default()
    };
    let (channel, inbound_rx) = ControlChannel::new(config, Arc::new(SilentNotifier));

    tokio::spawn(Arc::clone(&router).run(inbound_rx));
    let pump_channel = Arc::clone(&channel);
    tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            pump_channel.send(&msg).await;
        }
    });

    Console {
        channel,
        agent,
        modal,
        refresh_rx,
    }
}

/// Polls until the agent has a pending exchange, or panics after a timeout.
async fn wait_for_pending(agent: &Arc<Mutex<PairingAgent>>) -> String {
    for _ in 0..100 {
        if let Some(device) = agent.lock().await.pending_device().map(str::to_string) {
            return device;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("agent never received the pairing prompt");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_passkey_confirmation_round_trip() {
    // Scripted hub: handshake, prompt, then wait for the decision frame.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hub = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let handshake = ws.next().await.unwrap().unwrap();
        assert_eq!(
            handshake,
            WsMessage::Text(r#"{"msg":"connect"}"#.to_string())
        );

        ws.send(WsMessage::Text(r#"{"msg":"connected"}"#.to_string()))
            .await
            .unwrap();
        ws.send(WsMessage::Text(
            r#"{"msg":"agent_action","data":{"action":"confirm_passkey","device":"/org/bluez/hci0/dev_AA_BB","passkey":654321}}"#
                .to_string(),
        ))
        .await
        .unwrap();

        match ws.next().await.unwrap().unwrap() {
            WsMessage::Text(text) => text,
            other => panic!("expected text decision frame, got {other:?}"),
        }
    });

    let console = console(&format!("ws://{addr}/ws"));
    console.channel.connect().await.unwrap();

    let device = wait_for_pending(&console.agent).await;
    assert_eq!(device, "/org/bluez/hci0/dev_AA_BB");
    // The prompt surfaced as a decision modal showing the passkey.
    assert_eq!(
        console.modal.opened.lock().unwrap().as_slice(),
        &[(ModalMode::Decision, "654321".to_string())]
    );

    console
        .agent
        .lock()
        .await
        .on_operator_decision(OperatorDecision::Confirm);

    // The hub receives the echo of device and passkey with confirmed:true.
    let frame = hub.await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["msg"], "request_confirmation_response");
    assert_eq!(value["device"], "/org/bluez/hci0/dev_AA_BB");
    assert_eq!(value["passkey"], 654321);
    assert_eq!(value["confirmed"], true);
}

#[tokio::test]
async fn test_pin_display_cancel_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hub = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.next().await; // handshake

        ws.send(WsMessage::Text(
            r#"{"msg":"agent_action","data":{"action":"display_pin_code","device":"/org/bluez/hci0/dev_AA_BB","pincode":"123456"}}"#
                .to_string(),
        ))
        .await
        .unwrap();

        match ws.next().await.unwrap().unwrap() {
            WsMessage::Text(text) => text,
            other => panic!("expected text frame, got {other:?}"),
        }
    });

    let console = console(&format!("ws://{addr}/ws"));
    console.channel.connect().await.unwrap();

    wait_for_pending(&console.agent).await;
    // PIN display is informational: the only decision is cancel.
    assert_eq!(
        console.modal.opened.lock().unwrap().as_slice(),
        &[(ModalMode::Informational, "123456".to_string())]
    );

    console
        .agent
        .lock()
        .await
        .on_operator_decision(OperatorDecision::Cancel);

    let frame = hub.await.unwrap();
    assert_eq!(
        frame,
        r#"{"msg":"cancel_pairing","device":"/org/bluez/hci0/dev_AA_BB"}"#
    );
}

#[tokio::test]
async fn test_inventory_notifications_request_refreshes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.next().await; // handshake

        for frame in [
            r#"{"msg":"bt_devices_updated"}"#,
            r#"{"msg":"hid_devices_updated"}"#,
        ] {
            ws.send(WsMessage::Text(frame.to_string())).await.unwrap();
        }
        // Hold the session open until the test ends.
        while ws.next().await.is_some() {}
    });

    let mut console = console(&format!("ws://{addr}/ws"));
    console.channel.connect().await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(2), console.refresh_rx.recv())
        .await
        .expect("timed out waiting for refresh request")
        .unwrap();
    let second = tokio::time::timeout(Duration::from_secs(2), console.refresh_rx.recv())
        .await
        .expect("timed out waiting for refresh request")
        .unwrap();

    assert_eq!(first, RefreshKind::Bluetooth);
    assert_eq!(second, RefreshKind::Hid);
}

#[tokio::test]
async fn test_service_authorised_closes_exchange_without_decision_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.next().await; // handshake

        ws.send(WsMessage::Text(
            r#"{"msg":"agent_action","data":{"action":"confirm_passkey","device":"D1","passkey":"001234"}}"#
                .to_string(),
        ))
        .await
        .unwrap();
        // The hub finishes the exchange on its own; note the legacy
        // misspelling some hub builds emit.
        ws.send(WsMessage::Text(
            r#"{"msg":"agent_action","data":{"action":"service_autorised","device":"D1"}}"#
                .to_string(),
        ))
        .await
        .unwrap();
        while ws.next().await.is_some() {}
    });

    let mut console = console(&format!("ws://{addr}/ws"));
    console.channel.connect().await.unwrap();

    wait_for_pending(&console.agent).await;

    // The authorised event clears the slot and asks for a full refresh.
    let refresh = tokio::time::timeout(Duration::from_secs(2), console.refresh_rx.recv())
        .await
        .expect("timed out waiting for refresh request")
        .unwrap();
    assert_eq!(refresh, RefreshKind::All);
    assert_eq!(console.agent.lock().await.pending_device(), None);
}
