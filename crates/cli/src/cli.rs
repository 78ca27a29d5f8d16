// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "qtdev")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "External queue device for the QuikTik service")]
#[command(
    long_about = "External queue device for the QuikTik service.\n\n\
    Queries the queue over HTTP and follows live updates over WebSocket."
)]
pub struct Cli {
    /// Read configuration from <path> instead of the default location
    #[arg(short, long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Log at debug level, ignoring RUST_LOG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show queue service status
    Status,

    /// List establishments
    Establishments,

    /// Show the current queue
    Queue,

    /// Register this device with the service
    Register,

    /// Advance the queue to the next (or given) number
    Advance {
        /// Number to serve next (default: current + 1)
        number: Option<u64>,

        /// Send over the push channel instead of HTTP
        #[arg(long)]
        push: bool,
    },

    /// Follow live queue updates until interrupted
    Watch,

    /// Show device and connection details
    Info,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
