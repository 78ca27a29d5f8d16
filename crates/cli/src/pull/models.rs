// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request and response bodies of the queue service API.

use serde::{Deserialize, Serialize};

/// Response of `GET status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    /// Live push streams. Older servers call this `connected_websockets`.
    #[serde(default, alias = "connected_websockets")]
    pub connected_push_clients: u64,
    #[serde(default)]
    pub registered_devices: u64,
}

/// One entry of `GET establishments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EstablishmentList {
    #[serde(default)]
    pub establishments: Vec<Establishment>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub device_id: &'a str,
    pub device_type: &'a str,
    pub device_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdvanceRequest<'a> {
    pub establishment_id: &'a str,
    pub new_serving_number: u64,
}
