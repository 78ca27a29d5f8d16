// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::open_device;
use crate::config::Config;
use crate::error::Result;

/// Register this device with the service.
pub async fn run(config: &Config) -> Result<()> {
    let device = open_device(config).await?;
    device.register().await?;
    let identity = device.identity();
    println!(
        "Registered {} ({}) for {}",
        identity.device_name(),
        identity.device_id(),
        identity.establishment_id()
    );
    Ok(())
}
