// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! qt-core: Shared library for the QuikTik device client
//!
//! This crate provides the queue data model, the push protocol messages, the
//! device identity, and the state store that reconciles push and pull updates.

pub mod error;
pub mod identity;
pub mod protocol;
pub mod snapshot;
pub mod store;

pub use error::{Error, Result};
pub use identity::DeviceIdentity;
pub use protocol::{ClientMessage, InboundMessage};
pub use snapshot::{QueueFields, QueueSnapshot};
pub use store::{PullOutcome, StateStore, StoreView};
