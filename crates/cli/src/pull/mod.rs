// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pull client: request/response queries against the queue service.
//!
//! Every call is independent and bounded by the configured timeout. Nothing
//! here writes to the state store; callers decide what to do with a
//! snapshot (see [`crate::device`]).

mod client;
mod error;
mod models;

pub use client::{PullClient, PullConfig, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::{RequestError, RequestResult};
pub use models::{Establishment, ServiceStatus};
