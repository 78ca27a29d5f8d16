// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel: one long-lived streaming connection to the queue service.
//!
//! Provides a high-level interface for:
//! - Connecting and subscribing to an establishment
//! - Sending commands while the stream is open
//! - Feeding every inbound frame to the [`Dispatcher`]
//! - Closing, from any task, at any time
//!
//! Each successful `connect` starts a session task that owns the transport.
//! The session multiplexes outbound commands, inbound frames and cancellation.
//! Losing the stream ends the session and leaves the channel `Disconnected`;
//! reconnecting is always an explicit `connect` call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use qt_core::protocol::ClientMessage;
use qt_core::{DeviceIdentity, StateStore};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dispatch::Dispatcher;
use super::heartbeat::{self, HeartbeatConfig};
use super::state::{ConnectionState, SharedConnectionState};
use super::transport::{Transport, TransportError, TransportResult, WebSocketTransport};

/// Default push endpoint.
pub const DEFAULT_PUSH_URL: &str = "ws://localhost:8081";

/// Default bound on the connection handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound on the close handshake when a session ends.
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Outbound commands buffered per session.
const OUTBOUND_CAPACITY: usize = 32;

/// Configuration for the push channel.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// URL of the push endpoint.
    pub url: String,
    /// Maximum time to wait for the connection handshake.
    pub connect_timeout: Duration,
    /// Heartbeat settings.
    pub heartbeat: HeartbeatConfig,
}

impl Default for PushConfig {
    fn default() -> Self {
        PushConfig {
            url: DEFAULT_PUSH_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

/// Why a connect attempt failed. The channel is left `Disconnected`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("push endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("push connection timed out")]
    Timeout,

    #[error("push endpoint protocol mismatch: {0}")]
    ProtocolMismatch(String),
}

impl From<TransportError> for ConnectError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Handshake(msg) => ConnectError::ProtocolMismatch(msg),
            other => ConnectError::Unreachable(other.to_string()),
        }
    }
}

/// Error type for push channel operations.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// Operation attempted while the channel is not `Open`.
    #[error("push channel not connected")]
    NotConnected,

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type for push channel operations.
pub type PushResult<T> = Result<T, PushError>;

/// One outbound command and the slot for its send result.
struct Outbound {
    msg: ClientMessage,
    ack: oneshot::Sender<TransportResult<()>>,
}

/// Sending half of a session, shared with the heartbeat monitor.
#[derive(Clone)]
pub(crate) struct SessionSender {
    outbound: mpsc::Sender<Outbound>,
    state: Arc<SharedConnectionState>,
}

impl SessionSender {
    pub(crate) fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Hands one message to the session and waits for it to hit the wire.
    pub(crate) async fn send(&self, msg: ClientMessage) -> PushResult<()> {
        if !self.is_open() {
            return Err(PushError::NotConnected);
        }
        let (ack, done) = oneshot::channel();
        self.outbound
            .send(Outbound { msg, ack })
            .await
            .map_err(|_| PushError::NotConnected)?;
        done.await.map_err(|_| PushError::NotConnected)??;
        Ok(())
    }
}

/// A running session: its task, its heartbeat and the token that stops both.
struct Session {
    sender: SessionSender,
    cancel: CancellationToken,
    reader: JoinHandle<()>,
    heartbeat: Option<JoinHandle<()>>,
}

impl Session {
    async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.reader.await;
        if let Some(heartbeat) = self.heartbeat {
            let _ = heartbeat.await;
        }
    }
}

type Connector<T> = Box<dyn Fn() -> T + Send + Sync>;

struct Inner<T> {
    config: PushConfig,
    identity: Arc<DeviceIdentity>,
    store: Arc<StateStore>,
    state: Arc<SharedConnectionState>,
    connector: Connector<T>,
    session: Mutex<Option<Session>>,
}

/// Handle to the push channel. Cheap to clone; clones share one connection.
pub struct PushChannel<T: Transport + 'static = WebSocketTransport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport + 'static> Clone for PushChannel<T> {
    fn clone(&self) -> Self {
        PushChannel {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PushChannel<WebSocketTransport> {
    /// Create a push channel that connects over WebSocket.
    pub fn new(config: PushConfig, identity: Arc<DeviceIdentity>, store: Arc<StateStore>) -> Self {
        Self::with_connector(config, identity, store, WebSocketTransport::new)
    }
}

impl<T: Transport + 'static> PushChannel<T> {
    /// Create a push channel with a custom transport factory (for testing).
    ///
    /// The factory is called once per `connect`.
    pub fn with_connector<F>(
        config: PushConfig,
        identity: Arc<DeviceIdentity>,
        store: Arc<StateStore>,
        connector: F,
    ) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        PushChannel {
            inner: Arc::new(Inner {
                config,
                identity,
                store,
                state: Arc::new(SharedConnectionState::new()),
                connector: Box::new(connector),
                session: Mutex::new(None),
            }),
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state.get()
    }

    /// Check if the stream is open.
    pub fn is_open(&self) -> bool {
        self.inner.state.is_open()
    }

    pub fn config(&self) -> &PushConfig {
        &self.inner.config
    }

    /// Connect, subscribe, and start the session.
    ///
    /// A channel that is already open is left as is.
    pub async fn connect(&self) -> Result<(), ConnectError> {
        let mut slot = self.inner.session.lock().await;
        if self.inner.state.is_open() {
            debug!("push channel already open");
            return Ok(());
        }
        // A session that ended on its own still needs its tasks reaped
        if let Some(stale) = slot.take() {
            stale.shutdown().await;
        }

        let url = self.inner.config.url.as_str();
        info!(url, "connecting push channel");
        self.inner.state.set(ConnectionState::Connecting);

        let mut transport = (self.inner.connector)();
        let connected =
            tokio::time::timeout(self.inner.config.connect_timeout, transport.connect(url)).await;
        let result = match connected {
            Err(_) => Err(ConnectError::Timeout),
            Ok(Err(e)) => Err(ConnectError::from(e)),
            Ok(Ok(())) => Ok(()),
        };
        if let Err(e) = result {
            warn!(url, error = %e, "push connection failed");
            self.inner.state.set(ConnectionState::Disconnected);
            return Err(e);
        }

        self.inner.state.set(ConnectionState::Open);
        self.inner.store.set_connectivity(true);

        let identity = &self.inner.identity;
        let subscribe =
            ClientMessage::subscribe(identity.establishment_id(), identity.device_id());
        if let Err(e) = transport.send(subscribe).await {
            warn!(error = %e, "subscribe failed, dropping connection");
            let _ = transport.disconnect().await;
            self.inner.state.set(ConnectionState::Disconnected);
            self.inner.store.set_connectivity(false);
            return Err(ConnectError::Unreachable(e.to_string()));
        }
        info!(
            establishment_id = identity.establishment_id(),
            device_id = identity.device_id(),
            "push channel open, subscribe sent"
        );

        *slot = Some(self.start_session(transport));
        Ok(())
    }

    fn start_session(&self, transport: T) -> Session {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);
        let cancel = CancellationToken::new();
        let frames_received = Arc::new(AtomicU64::new(0));
        let sender = SessionSender {
            outbound: outbound_tx,
            state: Arc::clone(&self.inner.state),
        };

        let reader = tokio::spawn(run_session(
            transport,
            outbound_rx,
            cancel.clone(),
            Dispatcher::new(Arc::clone(&self.inner.store)),
            Arc::clone(&self.inner.state),
            Arc::clone(&self.inner.store),
            Arc::clone(&frames_received),
        ));
        let heartbeat = heartbeat::spawn(
            &self.inner.config.heartbeat,
            sender.clone(),
            self.inner.identity.device_id().to_string(),
            frames_received,
            cancel.clone(),
        );

        Session {
            sender,
            cancel,
            reader,
            heartbeat,
        }
    }

    /// Send one message. Fails with [`PushError::NotConnected`] unless `Open`.
    pub async fn send(&self, msg: ClientMessage) -> PushResult<()> {
        if !self.inner.state.is_open() {
            return Err(PushError::NotConnected);
        }
        let sender = self
            .inner
            .session
            .lock()
            .await
            .as_ref()
            .map(|session| session.sender.clone())
            .ok_or(PushError::NotConnected)?;
        sender.send(msg).await
    }

    /// Send a liveness probe now.
    pub async fn ping(&self) -> PushResult<()> {
        self.send(ClientMessage::ping(self.inner.identity.device_id()))
            .await
    }

    /// Ask the server to move the queue to `new_serving_number`.
    ///
    /// Local state changes only when the server's event comes back.
    pub async fn advance_queue(&self, new_serving_number: u64) -> PushResult<()> {
        let identity = &self.inner.identity;
        self.send(ClientMessage::advance_queue(
            identity.establishment_id(),
            new_serving_number,
            identity.device_id(),
        ))
        .await
    }

    /// Close the channel. Idempotent; safe from any task.
    ///
    /// Returns once the session and heartbeat tasks have stopped.
    pub async fn close(&self) {
        // Held throughout so a concurrent connect cannot interleave
        let mut slot = self.inner.session.lock().await;
        match slot.take() {
            Some(session) => {
                self.inner.state.set(ConnectionState::Closing);
                session.shutdown().await;
                info!("push channel closed");
            }
            None => debug!("push channel already closed"),
        }
        self.inner.state.set(ConnectionState::Disconnected);
        self.inner.store.set_connectivity(false);
    }
}

/// How a session ended.
enum Closure {
    Requested,
    Lost(String),
}

/// Session loop: one task per open stream.
///
/// Frames are dispatched one at a time in arrival order.
async fn run_session<T: Transport>(
    mut transport: T,
    mut outbound: mpsc::Receiver<Outbound>,
    cancel: CancellationToken,
    dispatcher: Dispatcher,
    state: Arc<SharedConnectionState>,
    store: Arc<StateStore>,
    frames_received: Arc<AtomicU64>,
) {
    let closure = loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break Closure::Requested,

            Some(Outbound { msg, ack }) = outbound.recv() => {
                // A peer that stops reading must not stall closure
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break Closure::Requested,
                    result = transport.send(msg) => result,
                };
                let failure = result.as_ref().err().map(ToString::to_string);
                let _ = ack.send(result);
                if let Some(e) = failure {
                    break Closure::Lost(e);
                }
            }

            frame = transport.recv() => match frame {
                Ok(Some(text)) => {
                    frames_received.fetch_add(1, Ordering::AcqRel);
                    dispatcher.handle_frame(&text);
                }
                Ok(None) => break Closure::Lost("closed by server".to_string()),
                Err(e) => break Closure::Lost(e.to_string()),
            },
        }
    };

    match closure {
        Closure::Requested => debug!("push session stopping"),
        Closure::Lost(reason) => warn!(reason = %reason, "push channel lost"),
    }

    if tokio::time::timeout(DISCONNECT_TIMEOUT, transport.disconnect())
        .await
        .is_err()
    {
        debug!("push transport did not close in time, dropping it");
    }
    // Stops the heartbeat when the stream was lost rather than closed
    cancel.cancel();
    state.set(ConnectionState::Disconnected);
    store.set_connectivity(false);
}
