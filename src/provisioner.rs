// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encrypted Actions secret provisioning.
//!
//! ## Steps
//!
//! 1. Fetch the repository's current public key and key id. This is done on
//!    every call and never cached: after a key rotation a secret sealed to
//!    the old key is stored without error but can no longer be decrypted.
//! 2. Seal the value to that key.
//! 3. Base64-encode the sealed message.
//! 4. Upsert the secret by name with the fetched key id.
//!
//! Repeating a call is safe. The ciphertext differs each time (fresh
//! ephemeral key) but the stored secret decrypts to the same value.

use std::sync::Arc;

use base64ct::{Base64, Encoding};
use tracing::debug;

use crate::crypto::{self, CryptoError};
use crate::github::{ForgeClient, ForgeError};
use crate::models::RepositoryRef;

/// Why a single secret could not be provisioned.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("forge API error: {0}")]
    Forge(#[from] ForgeError),

    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),
}

/// Seals and uploads secrets through a [`ForgeClient`].
#[derive(Clone)]
pub struct SecretProvisioner {
    client: Arc<dyn ForgeClient>,
}

impl SecretProvisioner {
    pub fn new(client: Arc<dyn ForgeClient>) -> Self {
        Self { client }
    }

    /// Create or replace `secret_name` in `repo` with `secret_value`.
    pub async fn provision(
        &self,
        repo: &RepositoryRef,
        secret_name: &str,
        secret_value: &[u8],
    ) -> Result<(), ProvisionError> {
        let public_key = self.client.get_public_key(repo).await?;

        let sealed = crypto::seal(secret_value, &public_key.key)?;
        let encrypted_value = Base64::encode_string(sealed.as_bytes());

        debug!(
            repository = %repo,
            secret = secret_name,
            key_id = %public_key.key_id,
            sealed_len = sealed.len(),
            "Sealed secret"
        );

        self.client
            .create_secret(repo, secret_name, &encrypted_value, &public_key.key_id)
            .await?;
        Ok(())
    }
}
