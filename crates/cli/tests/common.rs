// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, oneshot};
use tokio_tungstenite::tungstenite::Message;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The `qtdev` binary with a clean environment.
pub fn qtdev(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("qtdev");
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env_remove("QTDEV_API_URL")
        .env_remove("QTDEV_PUSH_URL")
        .env_remove("QTDEV_ESTABLISHMENT")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a config file into `dir` and returns its path.
pub fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("qtdev.toml");
    std::fs::write(&path, content).unwrap();
    path
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// In-process push server speaking the queue service protocol.
///
/// Each connection is greeted with `connected`. `subscribe` is answered with
/// `subscribed` and a `queue_update` (serving 3, 5 waiting), `ping` with
/// `pong`, and `advance_queue` with a `queue_advanced` echo.
pub struct QueueServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Value>>>,
    answer_pings: Arc<AtomicBool>,
    hang_up_on_subscribe: Arc<AtomicBool>,
    kick: broadcast::Sender<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl QueueServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let answer_pings = Arc::new(AtomicBool::new(true));
        let hang_up_on_subscribe = Arc::new(AtomicBool::new(false));
        let (kick, _) = broadcast::channel(4);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let ctx = ConnContext {
            received: Arc::clone(&received),
            answer_pings: Arc::clone(&answer_pings),
            hang_up_on_subscribe: Arc::clone(&hang_up_on_subscribe),
            kick: kick.clone(),
        };
        tokio::spawn(async move {
            tokio::select! {
                _ = accept_loop(listener, ctx) => {}
                _ = shutdown_rx => {}
            }
        });

        QueueServer {
            addr,
            received,
            answer_pings,
            hang_up_on_subscribe,
            kick,
            shutdown_tx,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Every client message received so far, as JSON.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    pub fn received_of(&self, kind: &str) -> Vec<Value> {
        self.received()
            .into_iter()
            .filter(|msg| msg["type"] == kind)
            .collect()
    }

    /// Stop answering pings.
    pub fn go_silent(&self) {
        self.answer_pings.store(false, Ordering::SeqCst);
    }

    /// Close each connection as soon as its subscribe arrives.
    pub fn hang_up_on_subscribe(&self) {
        self.hang_up_on_subscribe.store(true, Ordering::SeqCst);
    }

    /// Close every open connection from the server side.
    pub fn drop_clients(&self) {
        let _ = self.kick.send(());
    }

    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[derive(Clone)]
struct ConnContext {
    received: Arc<Mutex<Vec<Value>>>,
    answer_pings: Arc<AtomicBool>,
    hang_up_on_subscribe: Arc<AtomicBool>,
    kick: broadcast::Sender<()>,
}

async fn accept_loop(listener: TcpListener, ctx: ConnContext) {
    while let Ok((stream, _)) = listener.accept().await {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let _ = handle_connection(stream, ctx).await;
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    ctx: ConnContext,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut tx, mut rx) = ws.split();
    let mut kick = ctx.kick.subscribe();

    tx.send(text(json!({"type": "connected"}))).await?;

    loop {
        let frame = tokio::select! {
            _ = kick.recv() => {
                let _ = tx.send(Message::Close(None)).await;
                return Ok(());
            }
            frame = rx.next() => frame,
        };
        let Some(frame) = frame else {
            return Ok(());
        };
        let Message::Text(body) = frame? else {
            continue;
        };
        let Ok(msg) = serde_json::from_str::<Value>(body.as_str()) else {
            continue;
        };
        ctx.received.lock().unwrap().push(msg.clone());

        match msg["type"].as_str() {
            Some("subscribe") if ctx.hang_up_on_subscribe.load(Ordering::SeqCst) => {
                let _ = tx.send(Message::Close(None)).await;
                return Ok(());
            }
            Some("subscribe") => {
                tx.send(text(json!({
                    "type": "subscribed",
                    "establishment_id": msg["establishment_id"],
                })))
                .await?;
                tx.send(text(json!({
                    "type": "queue_update",
                    "current_serving": 3,
                    "total_waiting": 5,
                    "available_numbers": [4, 5, 6, 7, 8],
                })))
                .await?;
            }
            Some("ping") if ctx.answer_pings.load(Ordering::SeqCst) => {
                tx.send(text(json!({"type": "pong"}))).await?;
            }
            Some("advance_queue") => {
                tx.send(text(json!({
                    "type": "queue_advanced",
                    "new_serving_number": msg["new_serving_number"],
                })))
                .await?;
            }
            _ => {}
        }
    }
}

fn text(value: Value) -> Message {
    Message::text(value.to_string())
}

/// A plain TCP server that answers every request with an HTTP 200 page.
pub async fn start_http_only_server() -> SocketAddr {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let _ = stream
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nok")
                    .await;
            });
        }
    });
    addr
}

/// Polls `check` until it holds or `timeout` passes.
pub async fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
