// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel messages for device-server communication.
//!
//! Frames are JSON objects tagged by a `type` field:
//! - Client sends subscribe, ping and advance_queue
//! - Server sends stream/subscription acks, queue events and pongs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::snapshot::QueueFields;

/// Messages sent from the device to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to one establishment's queue events.
    ///
    /// Sent automatically as soon as the channel opens.
    Subscribe {
        establishment_id: String,
        device_id: String,
    },

    /// Liveness probe; the server answers with `pong`.
    Ping { device_id: String },

    /// Ask the server to move the queue to a new serving number.
    AdvanceQueue {
        establishment_id: String,
        new_serving_number: u64,
        device_id: String,
    },
}

impl ClientMessage {
    /// Creates a Subscribe message.
    pub fn subscribe(establishment_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        ClientMessage::Subscribe {
            establishment_id: establishment_id.into(),
            device_id: device_id.into(),
        }
    }

    /// Creates a Ping message.
    pub fn ping(device_id: impl Into<String>) -> Self {
        ClientMessage::Ping {
            device_id: device_id.into(),
        }
    }

    /// Creates an AdvanceQueue message.
    pub fn advance_queue(
        establishment_id: impl Into<String>,
        new_serving_number: u64,
        device_id: impl Into<String>,
    ) -> Self {
        ClientMessage::AdvanceQueue {
            establishment_id: establishment_id.into(),
            new_serving_number,
            device_id: device_id.into(),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Messages received from the server, one variant per kind.
///
/// Kinds this client does not know are kept as [`InboundMessage::Unrecognized`]
/// with their raw payload so they can be logged.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// The stream is established.
    Connected,
    /// The subscribe round-trip completed.
    Subscribed { establishment_id: String },
    /// Authoritative replacement of the queue fields.
    QueueUpdate(QueueFields),
    /// A ticket was sold. Informational only.
    TicketPurchased { queue_number: u64, amount: f64 },
    /// The queue moved to a new serving number.
    QueueAdvanced { new_serving_number: u64 },
    /// Heartbeat acknowledgement.
    Pong,
    /// Any kind not listed above.
    Unrecognized { kind: String, payload: Value },
}

/// Wire form of the kinds this client understands.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownMessage {
    Connected {},
    Subscribed { establishment_id: String },
    QueueUpdate(QueueFields),
    TicketPurchased { queue_number: u64, amount: f64 },
    QueueAdvanced { new_serving_number: u64 },
    Pong {},
}

impl InboundMessage {
    /// Kinds with a dedicated variant.
    pub const KNOWN_KINDS: [&'static str; 6] = [
        "connected",
        "subscribed",
        "queue_update",
        "ticket_purchased",
        "queue_advanced",
        "pong",
    ];

    /// Parses one text frame.
    ///
    /// Fails with [`Error::MalformedMessage`] when the frame is not a JSON
    /// object, or when a known kind is missing a required field. A frame
    /// without a `type` field is reported as the kind `unknown`.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::MalformedMessage(e.to_string()))?;
        if !value.is_object() {
            return Err(Error::MalformedMessage(format!(
                "expected a JSON object, got: {value}"
            )));
        }

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        if !Self::KNOWN_KINDS.contains(&kind.as_str()) {
            return Ok(InboundMessage::Unrecognized {
                kind,
                payload: value,
            });
        }

        let known: KnownMessage = serde_json::from_value(value)
            .map_err(|e| Error::MalformedMessage(format!("{kind}: {e}")))?;
        Ok(known.into())
    }

    /// The wire name of this message's kind.
    pub fn kind(&self) -> &str {
        match self {
            InboundMessage::Connected => "connected",
            InboundMessage::Subscribed { .. } => "subscribed",
            InboundMessage::QueueUpdate(_) => "queue_update",
            InboundMessage::TicketPurchased { .. } => "ticket_purchased",
            InboundMessage::QueueAdvanced { .. } => "queue_advanced",
            InboundMessage::Pong => "pong",
            InboundMessage::Unrecognized { kind, .. } => kind,
        }
    }
}

impl From<KnownMessage> for InboundMessage {
    fn from(msg: KnownMessage) -> Self {
        match msg {
            KnownMessage::Connected {} => InboundMessage::Connected,
            KnownMessage::Subscribed { establishment_id } => {
                InboundMessage::Subscribed { establishment_id }
            }
            KnownMessage::QueueUpdate(fields) => InboundMessage::QueueUpdate(fields),
            KnownMessage::TicketPurchased {
                queue_number,
                amount,
            } => InboundMessage::TicketPurchased {
                queue_number,
                amount,
            },
            KnownMessage::QueueAdvanced { new_serving_number } => {
                InboundMessage::QueueAdvanced { new_serving_number }
            }
            KnownMessage::Pong {} => InboundMessage::Pong,
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
