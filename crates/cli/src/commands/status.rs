// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Service-level queries that need no device identity.

use crate::config::Config;
use crate::display::{format_establishments, format_status};
use crate::error::Result;
use crate::pull::PullClient;

/// Show queue service status.
pub async fn status(config: &Config) -> Result<()> {
    let pull = PullClient::new(&config.pull_config())?;
    let status = pull.status().await?;
    println!("{}", format_status(&status));
    Ok(())
}

/// List establishments in server order.
pub async fn establishments(config: &Config) -> Result<()> {
    let pull = PullClient::new(&config.pull_config())?;
    let establishments = pull.establishments().await?;
    println!("{}", format_establishments(&establishments));
    Ok(())
}
