// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel connection state.
//!
//! The channel is the only writer. The heartbeat monitor and callers read it
//! lock-free.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No stream.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Stream established and subscribed.
    Open,
    /// Shutdown requested, not yet complete.
    Closing,
}

impl ConnectionState {
    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Open => 2,
            ConnectionState::Closing => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            3 => ConnectionState::Closing,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
        };
        f.write_str(s)
    }
}

/// Connection state visible to the session task, the heartbeat and callers.
#[derive(Debug)]
pub struct SharedConnectionState {
    state: AtomicU8,
}

impl SharedConnectionState {
    /// Create a new shared state initialized to disconnected.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
        }
    }

    /// Get the current state.
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Check if the stream is open.
    pub fn is_open(&self) -> bool {
        self.get() == ConnectionState::Open
    }
}

impl Default for SharedConnectionState {
    fn default() -> Self {
        Self::new()
    }
}
