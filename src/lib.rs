// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repo Setup Server - GitHub App webhook that bootstraps new repositories
//!
//! On an authentic `repository.created` delivery the server provisions two
//! encrypted Actions secrets into the new repository and then pushes a set
//! of template files, the last of which is a workflow that consumes those
//! secrets.
//!
//! ## Modules
//!
//! - `signature` - Webhook HMAC verification
//! - `crypto` - Sealed box encryption (X25519 + XSalsa20-Poly1305)
//! - `github` - GitHub App client and the forge capability trait
//! - `provisioner` - Encrypted secret upload
//! - `setup` - Setup orchestration, run record and template payloads
//! - `api` - HTTP API handlers (Axum)

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod github;
pub mod models;
pub mod provisioner;
pub mod setup;
pub mod signature;
pub mod state;
