// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Why a poll produced no new batch. Every variant leaves the current series untouched.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection refused, name resolution, timeout and the like.
    #[error("Error fetching data: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to fetch data. Status code: {0}")]
    Status(u16),

    /// The body was not a JSON array of reading objects.
    #[error("Malformed data: {0}")]
    Body(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
