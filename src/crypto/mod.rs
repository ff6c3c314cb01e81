// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Secret Encryption
//!
//! GitHub Actions secrets must be uploaded encrypted to the repository's
//! current public key using a libsodium sealed box. This module implements
//! that construction and nothing else: there is no key storage, no key
//! rotation and no general-purpose encryption API.

pub mod error;
pub mod sealed_box;

pub use error::CryptoError;
pub use sealed_box::{open, seal, RecipientKeyPair, SealedMessage};
