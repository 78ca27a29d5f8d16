// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::pull::RequestError;
use crate::push::{ConnectError, PushError};

/// All errors surfaced by the `qtdev` library.
///
/// Every variant is recoverable: the caller may retry, reconnect, or fix
/// its configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid {field}: {reason}\n  hint: check the config file or the QTDEV_* environment")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Push(#[from] PushError),

    #[error("queue service rejected device registration: {0}")]
    Registration(RequestError),
}

/// Result type for `qtdev` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
