// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue inspection and advancement.

use std::time::Duration;

use qt_core::PullOutcome;
use tracing::debug;

use super::open_device;
use crate::config::Config;
use crate::display::format_queue;
use crate::error::Result;

/// Show the current queue.
pub async fn show(config: &Config) -> Result<()> {
    let device = open_device(config).await?;
    let (snapshot, _) = device.refresh_queue().await?;
    println!("{}", format_queue(&snapshot));
    Ok(())
}

/// Advance the queue over HTTP, or over the push channel with `push`.
pub async fn advance(config: &Config, number: Option<u64>, push: bool) -> Result<()> {
    let device = open_device(config).await?;
    if number.is_none() {
        // The default target is relative to the service's current number
        device.refresh_queue().await?;
    }

    if !push {
        let (target, outcome) = device.advance_http(number).await?;
        println!("Queue advanced to #{target}");
        if let PullOutcome::Stale { stored, .. } = outcome {
            println!("Note: local view is already at #{stored}");
        }
        return Ok(());
    }

    device.connect().await?;
    let mut updates = device.store().subscribe();
    let result = device.advance_push(number).await;
    let target = match result {
        Ok(target) => target,
        Err(e) => {
            device.close().await;
            return Err(e);
        }
    };

    let wait = Duration::from_secs(config.connect_timeout_secs);
    let confirmed = matches!(
        tokio::time::timeout(
            wait,
            updates.wait_for(|view| view.snapshot.current_serving == target),
        )
        .await,
        Ok(Ok(_))
    );
    if confirmed {
        println!("Queue advanced to #{target} via push");
    } else {
        debug!(new_serving_number = target, "no queue event confirmed the advance");
        println!(
            "Advance to #{target} sent via push; no confirmation within {}s",
            wait.as_secs()
        );
    }
    device.close().await;
    Ok(())
}
