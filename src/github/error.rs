// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GitHub API errors.

/// Failures talking to the forge.
///
/// Transport errors, timeouts and non-2xx responses all land here; the setup
/// run records them per step and carries on.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ForgeError {
    #[error("GitHub app authentication failed: {0}")]
    Auth(String),

    #[error("GitHub request failed: {0}")]
    Request(String),

    #[error("GitHub returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GitHub response was invalid: {0}")]
    InvalidResponse(String),
}

impl ForgeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ForgeError::Status { status: 404, .. })
    }
}
