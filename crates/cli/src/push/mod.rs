// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel: live queue events from the queue service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ PushChannel │────►│  Transport  │────►│   Queue     │
//! │  (session)  │◄────│   (trait)   │◄────│   Service   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!    │      ▲
//!    ▼      │ ping
//! ┌────────────┐  ┌───────────┐
//! │ Dispatcher │  │ Heartbeat │
//! └────────────┘  └───────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ StateStore  │
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - WebSocket connection with bounded handshake time
//! - Automatic subscribe on open
//! - Table-driven dispatch of inbound events into the state store
//! - Periodic heartbeat, with an optional missed-pong close
//! - Manual reconnect: a lost stream stays down until `connect` is called
//! - Injectable transport trait for testing

mod channel;
mod dispatch;
mod heartbeat;
mod state;
mod transport;

pub use channel::{
    ConnectError, PushChannel, PushConfig, PushError, PushResult, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_PUSH_URL,
};
pub use dispatch::{Dispatcher, Effect};
pub use heartbeat::{HeartbeatConfig, DEFAULT_HEARTBEAT_INTERVAL};
pub use state::{ConnectionState, SharedConnectionState};
pub use transport::{Transport, TransportError, TransportResult, WebSocketTransport};


#[cfg(test)]
mod dispatch_tests;
