// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Message dispatcher: maps each inbound push message to its state effect.
//!
//! | kind               | effect                                      |
//! |--------------------|---------------------------------------------|
//! | `connected`        | connectivity flag set                       |
//! | `subscribed`       | logged                                      |
//! | `queue_update`     | queue fields overwritten                    |
//! | `ticket_purchased` | logged                                      |
//! | `queue_advanced`   | `current_serving` overwritten               |
//! | `pong`             | logged                                      |
//! | anything else      | logged as a diagnostic                      |
//!
//! Push updates are applied unconditionally in arrival order. Frames that do
//! not parse are logged and dropped.

use std::sync::Arc;

use qt_core::protocol::InboundMessage;
use qt_core::StateStore;
use tracing::{debug, info, warn};

/// What dispatching one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The state store was written.
    StateChanged,
    /// A known informational kind; nothing was written.
    Informational,
    /// An unrecognized kind; nothing was written.
    Ignored,
    /// The frame did not parse; nothing was written.
    Dropped,
}

/// Applies inbound push messages to a [`StateStore`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: Arc<StateStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<StateStore>) -> Self {
        Dispatcher { store }
    }

    /// Parse and dispatch one raw text frame.
    pub fn handle_frame(&self, text: &str) -> Effect {
        match InboundMessage::parse(text) {
            Ok(msg) => self.dispatch(msg),
            Err(e) => {
                warn!(error = %e, frame = %text, "dropping malformed push frame");
                Effect::Dropped
            }
        }
    }

    /// Apply one parsed message.
    pub fn dispatch(&self, msg: InboundMessage) -> Effect {
        match msg {
            InboundMessage::Connected => {
                info!("connected to queue service push stream");
                self.store.set_connectivity(true);
                Effect::StateChanged
            }
            InboundMessage::Subscribed { establishment_id } => {
                info!(establishment_id = %establishment_id, "subscribed to establishment");
                Effect::Informational
            }
            InboundMessage::QueueUpdate(fields) => {
                info!(
                    current_serving = fields.current_serving,
                    total_waiting = fields.total_waiting,
                    available = fields.available_numbers.len(),
                    "queue update"
                );
                self.store.apply_push_update(fields);
                Effect::StateChanged
            }
            InboundMessage::TicketPurchased {
                queue_number,
                amount,
            } => {
                info!(queue_number, amount, "ticket purchased");
                Effect::Informational
            }
            InboundMessage::QueueAdvanced { new_serving_number } => {
                info!(current_serving = new_serving_number, "queue advanced");
                self.store.apply_push_advance(new_serving_number);
                Effect::StateChanged
            }
            InboundMessage::Pong => {
                debug!("heartbeat acknowledged");
                Effect::Informational
            }
            InboundMessage::Unrecognized { kind, payload } => {
                warn!(kind = %kind, %payload, "unrecognized push message");
                Effect::Ignored
            }
        }
    }
}
