//! WebSocket control channel to the hub.
//!
//! [`ControlChannel`] owns the single persistent WebSocket session over
//! which all control traffic flows.  It is deliberately *not* a reconnect
//! supervisor: when the session drops, the channel reports it (state flips
//! to `Disconnected`, the operator gets one notice) and waits for the next
//! `connect()` call.  The redial loop in `main.rs` is the only caller that
//! retries.
//!
//! # Session lifecycle
//!
//! ```text
//! connect() ──handshake──► Connected ──► read task pumps frames inbound
//!     │                        │
//!     └─ failure ─► Disconnected ◄─ close/error (notice unless refreshing)
//! ```
//!
//! On every successful dial the channel sends the `connect` handshake frame
//! before anything else; the hub answers with `connected`, which the router
//! consumes.  A generation counter ties each read task to the dial that
//! spawned it so a stale task's close handling cannot clobber the state of
//! a newer session.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use futures_util::stream::{SplitSink, StreamExt};
use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

use hub_core::ConsoleToHubMsg;

use crate::application::ports::Notifier;
use crate::domain::{ChannelState, ConsoleConfig};

/// Write half of the WebSocket session.
type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;

/// Errors surfaced by the control channel.
///
/// Only dialling can fail loudly; everything after a successful handshake
/// degrades to `Disconnected` state plus an operator notice.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The WebSocket dial or upgrade handshake failed.
    #[error("failed to connect to hub at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: WsError,
    },

    /// The handshake frame could not be serialized or written.
    #[error("failed to send handshake frame: {0}")]
    Handshake(#[source] WsError),
}

/// The persistent WebSocket control channel.
///
/// Shared as `Arc<ControlChannel>` across the redial loop, the outbound
/// pump, and the refresh path.  Inbound text frames are forwarded verbatim
/// to the single `mpsc::Receiver<String>` handed out by [`new`], which the
/// router consumes.
///
/// [`new`]: ControlChannel::new
pub struct ControlChannel {
    config: ConsoleConfig,
    notifier: Arc<dyn Notifier>,
    /// Inbound frame forwarding; the router holds the receiving end.
    inbound: mpsc::Sender<String>,
    /// Write half of the live session, if any.
    sink: Mutex<Option<WsSink>>,
    state: StdMutex<ChannelState>,
    /// Guard ensuring at most one dial attempt is in flight.
    connecting: AtomicBool,
    /// Set during an operator-forced refresh so the teardown does not raise
    /// a connection-lost notice.
    refreshing: AtomicBool,
    /// Incremented per successful dial; ties read tasks to their session.
    generation: AtomicU64,
}

impl ControlChannel {
    /// Creates the channel and hands back the inbound frame stream.
    ///
    /// The receiver is the *only* consumer of frames from the hub; give it
    /// to the message router.
    pub fn new(
        config: ConsoleConfig,
        notifier: Arc<dyn Notifier>,
    ) -> (Arc<Self>, mpsc::Receiver<String>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(64);
        let channel = Arc::new(Self {
            config,
            notifier,
            inbound: inbound_tx,
            sink: Mutex::new(None),
            state: StdMutex::new(ChannelState::Disconnected),
            connecting: AtomicBool::new(false),
            refreshing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        });
        (channel, inbound_rx)
    }

    /// Current session state.
    pub fn state(&self) -> ChannelState {
        *self.state.lock().unwrap()
    }

    // ── Dialling ──────────────────────────────────────────────────────────────

    /// Dials the hub, sends the handshake frame, and starts the read task.
    ///
    /// Idempotent under concurrency: if a dial is already in flight or a
    /// session is already up, this returns `Ok` without starting a second
    /// attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Connect`] if the dial or upgrade fails and
    /// [`ChannelError::Handshake`] if the first frame cannot be written.
    /// Either way the state is left `Disconnected` and the caller may retry.
    pub async fn connect(self: &Arc<Self>) -> Result<(), ChannelError> {
        // Compare-and-swap so two concurrent connect() calls race for one
        // dial; the loser returns immediately.
        if self
            .connecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("connect() while a dial is in flight; ignoring");
            return Ok(());
        }
        if self.state() == ChannelState::Connected {
            self.connecting.store(false, Ordering::Release);
            debug!("connect() while already connected; ignoring");
            return Ok(());
        }
        *self.state.lock().unwrap() = ChannelState::Connecting;

        let result = self.dial().await;

        self.connecting.store(false, Ordering::Release);
        if result.is_err() {
            *self.state.lock().unwrap() = ChannelState::Disconnected;
        }
        result
    }

    async fn dial(self: &Arc<Self>) -> Result<(), ChannelError> {
        let url = self.config.hub_ws_url.clone();
        debug!(%url, "dialling hub");

        let (ws, _response) = connect_async(&url)
            .await
            .map_err(|source| ChannelError::Connect { url: url.clone(), source })?;
        let (mut sink, stream) = ws.split();

        // Handshake first: the hub registers the session and answers with
        // a `connected` frame on this same socket.
        let handshake = serde_json::to_string(&ConsoleToHubMsg::Connect)
            .expect("handshake frame serialization is infallible");
        sink.send(WsMessage::Text(handshake))
            .await
            .map_err(ChannelError::Handshake)?;

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *self.sink.lock().await = Some(sink);
        *self.state.lock().unwrap() = ChannelState::Connected;
        info!(%url, "control channel established");

        let channel = Arc::clone(self);
        tokio::spawn(async move {
            channel.read_frames(stream, generation).await;
        });

        Ok(())
    }

    // ── Inbound pump ──────────────────────────────────────────────────────────

    /// Forwards text frames to the router until the session ends.
    async fn read_frames(
        self: Arc<Self>,
        mut stream: futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
        generation: u64,
    ) {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => {
                    if self.inbound.send(text).await.is_err() {
                        debug!("router gone; stopping read task");
                        break;
                    }
                }
                Ok(WsMessage::Close(_)) => {
                    debug!("hub closed the control channel");
                    break;
                }
                // Pings are answered by tungstenite automatically; binary
                // frames are not part of the protocol.
                Ok(other) => debug!(kind = ?other, "ignoring non-text frame"),
                Err(err) => {
                    warn!(%err, "control channel read error");
                    break;
                }
            }
        }
        self.session_closed(generation).await;
    }

    /// Applies close handling, but only if this read task belongs to the
    /// current session.
    async fn session_closed(&self, generation: u64) {
        if self.generation.load(Ordering::Acquire) != generation {
            debug!("stale read task finished; newer session already up");
            return;
        }

        *self.state.lock().unwrap() = ChannelState::Disconnected;
        self.sink.lock().await.take();

        // During an operator-forced refresh the teardown is expected; the
        // operator asked for it, so no scary notice.
        if self.refreshing.load(Ordering::Acquire) {
            debug!("session closed as part of refresh");
        } else {
            warn!("connection to hub lost");
            self.notifier.notice("Connection to hub lost");
        }
    }

    // ── Outbound ──────────────────────────────────────────────────────────────

    /// Sends one control frame if the session is up.
    ///
    /// While disconnected the frame is dropped with a warning naming its
    /// kind; pairing state on the hub side expires on its own, so queueing
    /// stale decisions for a future session would be worse than losing them.
    pub async fn send(&self, msg: &ConsoleToHubMsg) {
        if self.state() != ChannelState::Connected {
            warn!(kind = msg.kind(), "channel not connected; frame dropped");
            return;
        }

        let text = match serde_json::to_string(msg) {
            Ok(text) => text,
            Err(err) => {
                warn!(kind = msg.kind(), %err, "frame serialization failed");
                return;
            }
        };

        let mut sink = self.sink.lock().await;
        let Some(ws) = sink.as_mut() else {
            warn!(kind = msg.kind(), "no live sink; frame dropped");
            return;
        };
        if let Err(err) = ws.send(WsMessage::Text(text)).await {
            // A write failure means the socket is dead; the read task will
            // observe it too and run the close handling.
            warn!(kind = msg.kind(), %err, "control frame write failed");
        }
    }

    // ── Refresh ───────────────────────────────────────────────────────────────

    /// Operator-forced resynchronisation: tear the session down cleanly,
    /// wait out the quiescence delay, and dial again.
    ///
    /// The `shutdown` frame lets the hub release the session immediately
    /// instead of waiting for a TCP timeout; its delivery is best-effort.
    pub async fn refresh(self: &Arc<Self>) -> Result<(), ChannelError> {
        info!("refreshing control channel");
        self.refreshing.store(true, Ordering::Release);

        self.send(&ConsoleToHubMsg::Shutdown).await;
        if let Some(mut ws) = self.sink.lock().await.take() {
            if let Err(err) = ws.close().await {
                debug!(%err, "close during refresh failed; continuing");
            }
        }
        *self.state.lock().unwrap() = ChannelState::Disconnected;

        // Quiescence delay so the hub finishes tearing the old session down
        // before the new dial arrives.
        tokio::time::sleep(self.config.reconnect_delay).await;

        let result = self.connect().await;
        self.refreshing.store(false, Ordering::Release);
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
