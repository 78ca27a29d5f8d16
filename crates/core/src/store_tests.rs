// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::Arc;
use yare::parameterized;

fn fields(current_serving: u64, total_waiting: u64) -> QueueFields {
    QueueFields {
        current_serving,
        total_waiting,
        available_numbers: vec![current_serving + 1, current_serving + 2],
    }
}

fn pulled(current_serving: u64) -> QueueSnapshot {
    QueueSnapshot {
        current_serving,
        total_waiting: 2,
        ..QueueSnapshot::empty("")
    }
}

#[test]
fn new_store_is_empty_and_disconnected() {
    let store = StateStore::new("est_001");
    let view = store.view();
    assert_eq!(view.snapshot.establishment_id, "est_001");
    assert_eq!(view.snapshot.current_serving, 0);
    assert!(!view.connected);
}

#[test]
fn push_update_overwrites_all_fields() {
    let store = StateStore::new("est_001");
    store.apply_push_update(fields(3, 5));

    let snapshot = store.read();
    assert_eq!(snapshot.current_serving, 3);
    assert_eq!(snapshot.total_waiting, 5);
    assert_eq!(snapshot.available_numbers, vec![4, 5]);
    assert_eq!(snapshot.establishment_id, "est_001");
}

#[test]
fn push_updates_may_move_backwards() {
    let store = StateStore::new("est_001");
    store.apply_push_advance(9);
    store.apply_push_update(fields(4, 1));
    assert_eq!(store.current_serving(), 4);
}

#[test]
fn stale_pull_after_push_advance_is_discarded() {
    let store = StateStore::new("est_001");
    store.apply_push_advance(7);

    let outcome = store.apply_pull_snapshot(pulled(5));

    assert_eq!(
        outcome,
        PullOutcome::Stale {
            stored: 7,
            offered: 5
        }
    );
    assert_eq!(store.current_serving(), 7);
}

#[parameterized(
    newer = { 5, 9 },
    equal = { 5, 5 },
    from_zero = { 0, 1 },
)]
fn fresh_pull_is_applied(stored: u64, offered: u64) {
    let store = StateStore::new("est_001");
    store.apply_push_advance(stored);

    assert_eq!(store.apply_pull_snapshot(pulled(offered)), PullOutcome::Applied);
    assert_eq!(store.current_serving(), offered);
    assert_eq!(store.read().total_waiting, 2);
}

#[test]
fn pull_without_establishment_keeps_stored_one() {
    let store = StateStore::new("est_001");
    store.apply_pull_snapshot(pulled(1));
    assert_eq!(store.read().establishment_id, "est_001");
}

#[test]
fn optimistic_advance_is_guarded() {
    let store = StateStore::new("est_001");
    store.apply_push_advance(10);

    assert_eq!(
        store.apply_optimistic_advance(8),
        PullOutcome::Stale {
            stored: 10,
            offered: 8
        }
    );
    assert_eq!(store.apply_optimistic_advance(11), PullOutcome::Applied);
    assert_eq!(store.current_serving(), 11);
}

#[test]
fn connectivity_flag_toggles() {
    let store = StateStore::new("est_001");
    store.set_connectivity(true);
    assert!(store.is_connected());
    store.set_connectivity(false);
    assert!(!store.is_connected());
}

#[test]
fn last_push_value_wins() {
    let store = StateStore::new("est_001");
    let sequence = [(true, 2), (false, 6), (true, 3), (false, 1), (true, 8)];
    for (is_update, value) in sequence {
        if is_update {
            store.apply_push_update(fields(value, 0));
        } else {
            store.apply_push_advance(value);
        }
    }
    assert_eq!(store.current_serving(), 8);
}

#[tokio::test]
async fn subscribers_see_changes() {
    let store = StateStore::new("est_001");
    let mut rx = store.subscribe();

    store.apply_push_advance(4);
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().snapshot.current_serving, 4);

    // A discarded pull does not wake subscribers.
    store.apply_pull_snapshot(pulled(1));
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn concurrent_writers_never_regress_below_push_value() {
    let store = Arc::new(StateStore::new("est_001"));
    store.apply_push_advance(50);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for n in 0..50 {
                    store.apply_pull_snapshot(pulled(n + i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(store.current_serving() >= 50);
}
