// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live view: follow push updates until Ctrl-C.

use chrono::Local;
use tracing::{info, warn};

use super::open_device;
use crate::config::Config;
use crate::display::{format_queue, format_update};
use crate::error::{Error, Result};
use crate::push::PushError;

/// Register, connect, and print every state change.
///
/// Ends cleanly on Ctrl-C. A lost push stream ends the command with an error;
/// reconnecting is left to the caller.
pub async fn run(config: &Config) -> Result<()> {
    let device = open_device(config).await?;

    if let Err(e) = device.register().await {
        warn!(error = %e, "continuing unregistered");
    }
    match device.refresh_queue().await {
        Ok((snapshot, _)) => println!("{}", format_queue(&snapshot)),
        Err(e) => warn!(error = %e, "could not fetch initial queue"),
    }

    let mut updates = device.store().subscribe();
    device.connect().await?;
    println!(
        "Watching {} as {} (Ctrl-C to stop)",
        device.identity().establishment_id(),
        device.identity().device_id()
    );

    let outcome = loop {
        // Connectivity changes can coalesce, so the channel itself is checked
        if !device.push().is_open() {
            break Err(Error::Push(PushError::NotConnected));
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let view = updates.borrow_and_update().clone();
                println!("{}", format_update(&view, Local::now()));
            }
        }
    };

    device.close().await;
    outcome
}
