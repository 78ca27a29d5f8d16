// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat monitor: periodic liveness probes on an open push channel.
//!
//! The monitor only sends. Pongs come back through normal dispatch. With a
//! pong timeout configured, the session is closed when a probe cannot be
//! written within the timeout, or when no inbound frame follows it in time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use qt_core::protocol::ClientMessage;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::channel::{PushError, SessionSender};

/// Default probe period.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Heartbeat settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Time between probes. Zero disables the monitor.
    pub interval: Duration,
    /// Close the session when no frame arrives this long after a probe.
    /// `None` never closes.
    pub pong_timeout: Option<Duration>,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        HeartbeatConfig {
            interval: DEFAULT_HEARTBEAT_INTERVAL,
            pong_timeout: None,
        }
    }
}

/// Starts the monitor for one session. Returns `None` when disabled.
///
/// The task ends when `cancel` fires, when the channel leaves `Open`, or when
/// a probe cannot be sent.
pub(crate) fn spawn(
    config: &HeartbeatConfig,
    sender: SessionSender,
    device_id: String,
    frames_received: Arc<AtomicU64>,
    cancel: CancellationToken,
) -> Option<JoinHandle<()>> {
    if config.interval.is_zero() {
        return None;
    }
    let config = config.clone();
    Some(tokio::spawn(run(
        config,
        sender,
        device_id,
        frames_received,
        cancel,
    )))
}

async fn run(
    config: HeartbeatConfig,
    sender: SessionSender,
    device_id: String,
    frames_received: Arc<AtomicU64>,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if !sender.is_open() {
            break;
        }

        let seen = frames_received.load(Ordering::Acquire);
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = expire(config.pong_timeout) => {
                warn!("heartbeat stuck on a stalled stream, closing push channel");
                cancel.cancel();
                break;
            }
            sent = sender.send(ClientMessage::ping(device_id.as_str())) => sent,
        };
        match sent {
            Ok(()) => debug!("heartbeat sent"),
            Err(PushError::NotConnected) => {
                // Lost a race with closure
                debug!("heartbeat skipped, channel not connected");
                break;
            }
            Err(e) => {
                warn!(error = %e, "heartbeat send failed");
                break;
            }
        }

        if let Some(timeout) = config.pong_timeout {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = time::sleep(timeout) => {}
            }
            if frames_received.load(Ordering::Acquire) == seen {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "no frame after heartbeat, closing push channel"
                );
                cancel.cancel();
                break;
            }
        }
    }

    debug!("heartbeat stopped");
}

/// Completes after `timeout`, or never when there is none.
async fn expire(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => time::sleep(timeout).await,
        None => std::future::pending().await,
    }
}
