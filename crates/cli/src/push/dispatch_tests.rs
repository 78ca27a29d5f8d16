// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the message dispatcher.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use qt_core::protocol::InboundMessage;
use qt_core::{QueueFields, QueueSnapshot, StateStore};
use yare::parameterized;

use super::dispatch::{Dispatcher, Effect};

fn make_dispatcher() -> (Dispatcher, Arc<StateStore>) {
    let store = Arc::new(StateStore::new("est_001"));
    (Dispatcher::new(Arc::clone(&store)), store)
}

#[test]
fn connected_sets_connectivity() {
    let (dispatcher, store) = make_dispatcher();
    assert_eq!(
        dispatcher.handle_frame(r#"{"type":"connected"}"#),
        Effect::StateChanged
    );
    assert!(store.is_connected());
}

#[test]
fn queue_update_overwrites_snapshot() {
    let (dispatcher, store) = make_dispatcher();
    dispatcher.handle_frame(
        r#"{"type":"queue_update","current_serving":3,"total_waiting":5,"available_numbers":[4,5,6,7,8]}"#,
    );

    let snapshot = store.read();
    assert_eq!(snapshot.current_serving, 3);
    assert_eq!(snapshot.total_waiting, 5);
    assert_eq!(snapshot.available_numbers, vec![4, 5, 6, 7, 8]);
}

#[test]
fn queue_advanced_overwrites_serving_number() {
    let (dispatcher, store) = make_dispatcher();
    store.apply_push_update(QueueFields {
        current_serving: 9,
        total_waiting: 3,
        available_numbers: vec![],
    });

    dispatcher.dispatch(InboundMessage::QueueAdvanced {
        new_serving_number: 4,
    });

    assert_eq!(store.current_serving(), 4);
    assert_eq!(store.read().total_waiting, 3);
}

#[parameterized(
    subscribed = { r#"{"type":"subscribed","establishment_id":"est_001"}"# },
    ticket = { r#"{"type":"ticket_purchased","queue_number":12,"amount":3.75}"# },
    pong = { r#"{"type":"pong"}"# },
)]
fn informational_kinds_leave_state_unchanged(frame: &str) {
    let (dispatcher, store) = make_dispatcher();
    store.apply_push_advance(6);
    let before = store.view();

    assert_eq!(dispatcher.handle_frame(frame), Effect::Informational);
    assert_eq!(store.view(), before);
}

#[parameterized(
    unknown_kind = { r#"{"type":"promo_banner","text":"hello"}"#, Effect::Ignored },
    no_type = { r#"{"current_serving":99}"#, Effect::Ignored },
    not_json = { "}{", Effect::Dropped },
    missing_field = { r#"{"type":"queue_update","total_waiting":1}"#, Effect::Dropped },
    binary_like = { "\u{0}\u{1}", Effect::Dropped },
)]
fn unusable_frames_leave_state_unchanged(frame: &str, expected: Effect) {
    let (dispatcher, store) = make_dispatcher();
    store.apply_push_advance(6);
    let before = store.view();

    assert_eq!(dispatcher.handle_frame(frame), expected);
    assert_eq!(store.view(), before);
}

#[test]
fn last_serving_message_wins_in_arrival_order() {
    let (dispatcher, store) = make_dispatcher();
    let frames = [
        r#"{"type":"queue_update","current_serving":10,"total_waiting":2,"available_numbers":[]}"#,
        r#"{"type":"queue_advanced","new_serving_number":12}"#,
        r#"{"type":"ticket_purchased","queue_number":30,"amount":1.0}"#,
        r#"{"type":"queue_advanced","new_serving_number":11}"#,
        r#"{"type":"bogus"}"#,
    ];
    for frame in frames {
        dispatcher.handle_frame(frame);
    }
    assert_eq!(store.current_serving(), 11);
}

#[test]
fn stale_pull_after_push_advance_keeps_push_value() {
    let (dispatcher, store) = make_dispatcher();
    dispatcher.handle_frame(r#"{"type":"queue_advanced","new_serving_number":7}"#);

    store.apply_pull_snapshot(QueueSnapshot {
        current_serving: 5,
        ..QueueSnapshot::empty("est_001")
    });

    assert_eq!(store.current_serving(), 7);
}
