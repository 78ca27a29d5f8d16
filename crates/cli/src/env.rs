// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables read by the CLI are named in [`vars`]
//! and read through the typed accessors below. Empty values count as unset.

/// Environment variable names.
pub mod vars {
    pub const QTDEV_API_URL: &str = "QTDEV_API_URL";
    pub const QTDEV_PUSH_URL: &str = "QTDEV_PUSH_URL";
    pub const QTDEV_ESTABLISHMENT: &str = "QTDEV_ESTABLISHMENT";
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the value of `QTDEV_API_URL` if set.
pub fn api_url() -> Option<String> {
    non_empty(vars::QTDEV_API_URL)
}

/// Returns the value of `QTDEV_PUSH_URL` if set.
pub fn push_url() -> Option<String> {
    non_empty(vars::QTDEV_PUSH_URL)
}

/// Returns the value of `QTDEV_ESTABLISHMENT` if set.
pub fn establishment() -> Option<String> {
    non_empty(vars::QTDEV_ESTABLISHMENT)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
