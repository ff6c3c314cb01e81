// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GitHub App authentication.
//!
//! ## Flow
//!
//! 1. Sign a short-lived RS256 JWT with the app's private key
//!    (`iss` = app id, `iat` backdated 60 s for clock drift, `exp` 9 min later).
//! 2. Exchange it at `POST /app/installations/{id}/access_tokens` for an
//!    installation token scoped to the repositories of that installation.
//! 3. Cache the installation token until shortly before it expires.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use super::client::api_url;
use super::models::InstallationTokenResponse;
use super::ForgeError;

/// Backdate `iat` to tolerate clock drift between us and GitHub.
const JWT_BACKDATE_SECS: i64 = 60;
/// GitHub rejects app JWTs that live longer than 10 minutes.
const JWT_LIFETIME_SECS: i64 = 9 * 60;
/// Refresh installation tokens this long before they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct AppClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - TimeDelta::seconds(TOKEN_REFRESH_MARGIN_SECS) > now
    }
}

/// Signs app JWTs and caches installation tokens per installation id.
#[derive(Clone)]
pub struct AppAuthenticator {
    app_id: u64,
    key: EncodingKey,
    cache: Arc<RwLock<HashMap<u64, CachedToken>>>,
}

impl AppAuthenticator {
    /// Build from the app id and its PEM private key (PKCS#1 or PKCS#8).
    pub fn from_pem(app_id: u64, private_key_pem: &str) -> Result<Self, ForgeError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| ForgeError::Auth(format!("invalid app private key: {e}")))?;
        Ok(Self {
            app_id,
            key,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Signed app JWT valid from now.
    pub fn app_jwt(&self) -> Result<String, ForgeError> {
        self.app_jwt_at(Utc::now())
    }

    fn app_jwt_at(&self, now: DateTime<Utc>) -> Result<String, ForgeError> {
        let issued = now.timestamp() - JWT_BACKDATE_SECS;
        let claims = AppClaims {
            iat: issued,
            exp: issued + JWT_LIFETIME_SECS,
            iss: self.app_id.to_string(),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| ForgeError::Auth(format!("failed to sign app JWT: {e}")))
    }

    /// Installation token for `installation_id`, minted on cache miss.
    pub async fn installation_token(
        &self,
        http: &Client,
        api_base: &Url,
        installation_id: u64,
    ) -> Result<String, ForgeError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&installation_id) {
                if entry.is_fresh(Utc::now()) {
                    return Ok(entry.token.clone());
                }
            }
        }

        let minted = self.mint(http, api_base, installation_id).await?;
        let token = minted.token.clone();

        {
            let mut cache = self.cache.write().await;
            cache.insert(
                installation_id,
                CachedToken {
                    token: minted.token,
                    expires_at: minted.expires_at,
                },
            );
        }

        Ok(token)
    }

    async fn mint(
        &self,
        http: &Client,
        api_base: &Url,
        installation_id: u64,
    ) -> Result<InstallationTokenResponse, ForgeError> {
        let installation = installation_id.to_string();
        let url = api_url(
            api_base,
            &["app", "installations", &installation, "access_tokens"],
        )?;
        let jwt = self.app_jwt()?;

        let response = http
            .post(url)
            .bearer_auth(jwt)
            .send()
            .await
            .map_err(|e| ForgeError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ForgeError::Auth(format!(
                "token request for installation {installation_id} returned {status}: {body}"
            )));
        }

        let token: InstallationTokenResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::Auth(format!("invalid token response: {e}")))?;

        if token.token.trim().is_empty() {
            return Err(ForgeError::Auth(
                "token response did not include a token".to_string(),
            ));
        }

        debug!(
            installation_id,
            expires_at = %token.expires_at,
            "Minted installation token"
        );
        Ok(token)
    }
}

impl std::fmt::Debug for AppAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppAuthenticator")
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}
