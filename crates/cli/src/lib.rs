// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! qtdevrs - An external queue device for the QuikTik service.
//!
//! This crate provides the device side of a dual-channel queue client:
//! request/response queries over HTTP and a live event stream over WebSocket,
//! both feeding one state store.
//!
//! # Main Components
//!
//! - [`PullClient`] - HTTP queries (status, establishments, queue, register, advance)
//! - [`PushChannel`] - WebSocket stream with subscribe, heartbeat and dispatch
//! - [`DeviceClient`] - One identity and one [`StateStore`](qt_core::StateStore) joining both
//! - [`Config`] - Endpoints, device name, timeouts
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use qtdevrs::{Config, DeviceClient};
//! use qt_core::DeviceIdentity;
//!
//! let config = Config::load(None)?;
//! let device = DeviceClient::new(&config, DeviceIdentity::new("Lobby", "est_001"))?;
//! device.refresh_queue().await?;
//! device.connect().await?;
//! let mut updates = device.store().subscribe();
//! updates.changed().await?;
//! device.close().await;
//! ```

mod cli;
mod commands;
mod display;
mod env;

pub mod config;
pub mod device;
pub mod error;
pub mod pull;
pub mod push;

pub use cli::{Cli, Command};
pub use config::Config;
pub use device::{ConnectionInfo, DeviceClient};
pub use error::{Error, Result};
pub use pull::PullClient;
pub use push::PushChannel;

/// Execute a CLI command with a loaded configuration.
pub async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Status => commands::status::status(config).await,
        Command::Establishments => commands::status::establishments(config).await,
        Command::Queue => commands::queue::show(config).await,
        Command::Register => commands::register::run(config).await,
        Command::Advance { number, push } => commands::queue::advance(config, number, push).await,
        Command::Watch => commands::watch::run(config).await,
        Command::Info => commands::info::run(config).await,
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
