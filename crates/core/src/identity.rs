// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device identity.
//!
//! A device identity is created once at client startup and never changes for
//! the lifetime of the client. Components share it behind an `Arc`.

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Prefix used for generated device IDs.
const DEVICE_ID_PREFIX: &str = "device";

/// Identity a device presents to the queue service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    device_id: String,
    device_name: String,
    establishment_id: String,
}

impl DeviceIdentity {
    /// Creates an identity with a freshly generated device ID.
    pub fn new(device_name: impl Into<String>, establishment_id: impl Into<String>) -> Self {
        let device_name = device_name.into();
        let device_id = generate_device_id(&device_name, &Utc::now());
        Self::with_id(device_id, device_name, establishment_id)
    }

    /// Creates an identity with a caller-chosen device ID.
    pub fn with_id(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        establishment_id: impl Into<String>,
    ) -> Self {
        DeviceIdentity {
            device_id: device_id.into(),
            device_name: device_name.into(),
            establishment_id: establishment_id.into(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn establishment_id(&self) -> &str {
        &self.establishment_id
    }
}

/// Generate a device ID from the device name and a timestamp.
/// Format: device_{hash} where hash is first 8 hex chars of SHA256(name + timestamp)
pub fn generate_device_id(device_name: &str, created_at: &DateTime<Utc>) -> String {
    let input = format!(
        "{}{}",
        device_name,
        created_at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("{}_{}", DEVICE_ID_PREFIX, hex::encode(&hash[..4]))
}
