// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # GitHub Integration
//!
//! The setup flow only talks to the forge through [`ForgeClient`]. The
//! production implementation is [`GitHubClient`], which authenticates as a
//! GitHub App and mints installation tokens scoped to the target repository.
//!
//! ## Capabilities
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | `get_public_key` | `GET /repos/{owner}/{repo}/actions/secrets/public-key` |
//! | `create_secret` | `PUT /repos/{owner}/{repo}/actions/secrets/{name}` |
//! | `get_file_sha` | `GET /repos/{owner}/{repo}/contents/{path}` |
//! | `create_file` | `PUT /repos/{owner}/{repo}/contents/{path}` |
//! | `delete_file` | `DELETE /repos/{owner}/{repo}/contents/{path}` |
//! | `list_labels` | `GET /repos/{owner}/{repo}/labels` |
//! | `create_label` | `POST /repos/{owner}/{repo}/labels` |
//! | `delete_label` | `DELETE /repos/{owner}/{repo}/labels/{name}` |

use async_trait::async_trait;

use crate::models::RepositoryRef;

pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod models;
pub mod token;

pub use client::GitHubClient;
pub use error::ForgeError;
pub use models::{EncryptedSecret, Label, RepoPublicKey};

/// Forge operations needed to bootstrap a repository.
///
/// Every mutating call is an upsert or tolerates being repeated, so a whole
/// setup run can be replayed safely.
#[async_trait]
pub trait ForgeClient: Send + Sync {
    /// Current Actions public key and its id.
    async fn get_public_key(&self, repo: &RepositoryRef) -> Result<RepoPublicKey, ForgeError>;

    /// Create or replace the secret `name`.
    async fn create_secret(
        &self,
        repo: &RepositoryRef,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> Result<(), ForgeError>;

    /// Blob sha of the file at `path`, or `None` when it does not exist.
    async fn get_file_sha(
        &self,
        repo: &RepositoryRef,
        path: &str,
    ) -> Result<Option<String>, ForgeError>;

    /// Commit `content` (already base64) to `path`, replacing an existing file.
    async fn create_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<(), ForgeError>;

    async fn delete_file(&self, repo: &RepositoryRef, path: &str, sha: &str)
        -> Result<(), ForgeError>;

    async fn list_labels(&self, repo: &RepositoryRef) -> Result<Vec<Label>, ForgeError>;

    async fn create_label(&self, repo: &RepositoryRef, label: &Label) -> Result<(), ForgeError>;

    async fn delete_label(&self, repo: &RepositoryRef, name: &str) -> Result<(), ForgeError>;
}
