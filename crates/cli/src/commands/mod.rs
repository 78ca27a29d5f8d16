// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod info;
pub mod queue;
pub mod register;
pub mod status;
pub mod watch;

use qt_core::DeviceIdentity;

use crate::config::Config;
use crate::device::{discover_establishment, DeviceClient};
use crate::error::Result;
use crate::pull::PullClient;

/// Builds the device for this run: resolves the establishment and mints a
/// fresh device id.
pub(crate) async fn open_device(config: &Config) -> Result<DeviceClient> {
    let pull = PullClient::new(&config.pull_config())?;
    let establishment_id =
        discover_establishment(&pull, config.establishment_id.as_deref()).await;
    let identity = DeviceIdentity::new(config.device_name.as_str(), establishment_id);
    DeviceClient::new(config, identity)
}
