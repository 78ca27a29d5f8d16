// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Why a pull request failed. All variants are recoverable; nothing retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("queue service unreachable: {0}")]
    Unreachable(String),

    #[error("request to queue service timed out")]
    Timeout,

    #[error("queue service returned status {0}")]
    BadStatus(u16),

    #[error("unexpected response from queue service: {0}")]
    Decode(String),

    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout
        } else if let Some(status) = err.status() {
            RequestError::BadStatus(status.as_u16())
        } else if err.is_decode() {
            RequestError::Decode(err.to_string())
        } else {
            RequestError::Unreachable(err.to_string())
        }
    }
}

/// Result type for pull requests.
pub type RequestResult<T> = Result<T, RequestError>;
