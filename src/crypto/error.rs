// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sealed box errors.

/// Failures raised while sealing or opening a secret.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    /// A public or private key was not exactly 32 bytes.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The operating system entropy source could not produce an ephemeral key.
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// The sealed message was truncated or its authentication tag did not verify.
    #[error("sealed box authentication failed")]
    AuthenticationFailure,

    /// The underlying box construction rejected the plaintext.
    #[error("sealed box encryption failed")]
    Encryption,
}
