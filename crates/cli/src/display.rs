// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering of service and device views.

use chrono::{DateTime, Local, Utc};
use qt_core::{QueueSnapshot, StoreView};

use crate::device::ConnectionInfo;
use crate::pull::{Establishment, ServiceStatus};

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn join_numbers(numbers: &[u64]) -> String {
    if numbers.is_empty() {
        return "none".to_string();
    }
    numbers
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_status(status: &ServiceStatus) -> String {
    format!(
        "Status: {}\nPush clients: {}\nRegistered devices: {}",
        status.status, status.connected_push_clients, status.registered_devices
    )
}

pub fn format_establishments(establishments: &[Establishment]) -> String {
    if establishments.is_empty() {
        return "No establishments".to_string();
    }
    establishments
        .iter()
        .map(|e| format!("{}  {}", e.id, e.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_queue(snapshot: &QueueSnapshot) -> String {
    format!(
        "Establishment: {}\nCurrently serving: #{}\nPeople waiting: {}\nAvailable numbers: {}\nLast updated: {}",
        snapshot.establishment_id,
        snapshot.current_serving,
        snapshot.total_waiting,
        join_numbers(&snapshot.available_numbers),
        format_timestamp(&snapshot.last_updated),
    )
}

pub fn format_info(info: &ConnectionInfo) -> String {
    format!(
        "Device name: {}\nDevice ID: {}\nEstablishment: {}\nAPI: {}\nPush: {}\nPush state: {}\nPush connected: {}\nCurrent serving: #{}",
        info.device_name,
        info.device_id,
        info.establishment_id,
        info.api_url,
        info.push_url,
        info.push_state,
        yes_no(info.connected),
        info.current_serving,
    )
}

/// One line per store change, prefixed with the local time it was seen.
pub fn format_update(view: &StoreView, seen_at: DateTime<Local>) -> String {
    format!(
        "[{}] serving #{}, {} waiting, {} available{}",
        seen_at.format("%H:%M:%S"),
        view.snapshot.current_serving,
        view.snapshot.total_waiting,
        view.snapshot.available_numbers.len(),
        if view.connected { "" } else { " (offline)" },
    )
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
