// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! State store: the single source of truth for a device's view of its queue.
//!
//! Two independent paths write here:
//! - the push channel's dispatch loop, whose updates are authoritative and
//!   applied in arrival order
//! - pull requests, whose snapshots are only accepted when they do not move
//!   `current_serving` backwards
//!
//! All writes are serialized through a `tokio::sync::watch` sender, which
//! also lets observers wait for the next change.

use chrono::Utc;
use tokio::sync::watch;

use crate::snapshot::{QueueFields, QueueSnapshot};

/// Point-in-time copy of everything the store holds.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreView {
    pub snapshot: QueueSnapshot,
    /// Whether the push channel currently has a live stream.
    pub connected: bool,
}

/// Result of offering a pull-path update to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// The update was applied.
    Applied,
    /// The store already holds a newer serving number; the update was dropped.
    Stale { stored: u64, offered: u64 },
}

/// Shared, internally synchronized queue state.
#[derive(Debug)]
pub struct StateStore {
    state: watch::Sender<StoreView>,
}

impl StateStore {
    /// Creates a store for one establishment, serving number 0, disconnected.
    pub fn new(establishment_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(StoreView {
            snapshot: QueueSnapshot::empty(establishment_id),
            connected: false,
        });
        StateStore { state }
    }

    /// Overwrites the queue fields unconditionally (push `queue_update`).
    pub fn apply_push_update(&self, fields: QueueFields) {
        self.state.send_modify(|view| {
            view.snapshot.current_serving = fields.current_serving;
            view.snapshot.total_waiting = fields.total_waiting;
            view.snapshot.available_numbers = fields.available_numbers;
            view.snapshot.last_updated = Utc::now();
        });
    }

    /// Overwrites the serving number unconditionally (push `queue_advanced`).
    pub fn apply_push_advance(&self, new_serving_number: u64) {
        self.state.send_modify(|view| {
            view.snapshot.current_serving = new_serving_number;
            view.snapshot.last_updated = Utc::now();
        });
    }

    /// Replaces the snapshot with a pulled one, unless it would move
    /// `current_serving` backwards.
    ///
    /// A pulled snapshot without an establishment keeps the stored one.
    pub fn apply_pull_snapshot(&self, mut snapshot: QueueSnapshot) -> PullOutcome {
        let mut outcome = PullOutcome::Applied;
        self.state.send_if_modified(|view| {
            let stored = view.snapshot.current_serving;
            if snapshot.current_serving < stored {
                outcome = PullOutcome::Stale {
                    stored,
                    offered: snapshot.current_serving,
                };
                return false;
            }
            if snapshot.establishment_id.is_empty() {
                snapshot.establishment_id = view.snapshot.establishment_id.clone();
            }
            view.snapshot = snapshot;
            true
        });
        outcome
    }

    /// Records a serving number the service accepted through a pull-path
    /// command, subject to the same monotonic guard as pulled snapshots.
    pub fn apply_optimistic_advance(&self, new_serving_number: u64) -> PullOutcome {
        let mut outcome = PullOutcome::Applied;
        self.state.send_if_modified(|view| {
            let stored = view.snapshot.current_serving;
            if new_serving_number < stored {
                outcome = PullOutcome::Stale {
                    stored,
                    offered: new_serving_number,
                };
                return false;
            }
            view.snapshot.current_serving = new_serving_number;
            view.snapshot.last_updated = Utc::now();
            true
        });
        outcome
    }

    /// Sets the connectivity flag. Only the push channel calls this.
    pub fn set_connectivity(&self, connected: bool) {
        self.state.send_if_modified(|view| {
            if view.connected == connected {
                return false;
            }
            view.connected = connected;
            true
        });
    }

    /// Returns a consistent copy of the queue snapshot.
    pub fn read(&self) -> QueueSnapshot {
        self.state.borrow().snapshot.clone()
    }

    /// Returns a consistent copy of the snapshot and connectivity together.
    pub fn view(&self) -> StoreView {
        self.state.borrow().clone()
    }

    pub fn current_serving(&self) -> u64 {
        self.state.borrow().snapshot.current_serving
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Subscribe to store changes.
    pub fn subscribe(&self) -> watch::Receiver<StoreView> {
        self.state.subscribe()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
