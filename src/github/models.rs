// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GitHub REST request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Repository Actions public key, already base64-decoded.
///
/// Fetched fresh for every secret: the key can rotate, and a secret sealed to
/// a stale key is silently unreadable.
#[derive(Clone, PartialEq, Eq)]
pub struct RepoPublicKey {
    pub key_id: String,
    pub key: Vec<u8>,
}

impl std::fmt::Debug for RepoPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoPublicKey")
            .field("key_id", &self.key_id)
            .field("key", &hex::encode(&self.key))
            .finish()
    }
}

/// Issue label.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    /// Six hex digits, no leading `#`.
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Label {
    pub fn new(name: &str, color: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            description: Some(description.to_string()),
        }
    }
}

/// Secret upsert body: `{name, key_id, encrypted_value}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedSecret {
    pub name: String,
    pub key_id: String,
    /// Base64 of the sealed message.
    pub encrypted_value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublicKeyResponse {
    pub key_id: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentsResponse {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PutContentsRequest<'a> {
    pub message: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteContentsRequest<'a> {
    pub message: &'a str,
    pub sha: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstallationTokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
