// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tracing::warn;

use super::open_device;
use crate::config::Config;
use crate::display::format_info;
use crate::error::Result;

/// Show device and connection details.
///
/// The queue is fetched on a best-effort basis so the serving number is
/// meaningful; an unreachable service still prints the rest.
pub async fn run(config: &Config) -> Result<()> {
    let device = open_device(config).await?;
    if let Err(e) = device.refresh_queue().await {
        warn!(error = %e, "could not fetch queue");
    }
    println!("{}", format_info(&device.info()));
    Ok(())
}
