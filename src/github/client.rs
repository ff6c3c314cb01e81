// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GitHub REST client authenticated as a GitHub App installation.

use std::time::Duration;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use url::Url;

use super::models::{
    ContentsResponse, DeleteContentsRequest, EncryptedSecret, Label, PublicKeyResponse,
    PutContentsRequest, RepoPublicKey,
};
use super::token::AppAuthenticator;
use super::{ForgeClient, ForgeError};
use crate::models::RepositoryRef;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repo-setup-server/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const LABELS_PER_PAGE: usize = 100;

/// Forge client for one GitHub App.
///
/// Cheap to clone; clones share the HTTP connection pool and token cache.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_base: Url,
    auth: AppAuthenticator,
    http: Client,
}

impl GitHubClient {
    pub fn new(api_base_url: &str, app_id: u64, private_key_pem: &str) -> Result<Self, ForgeError> {
        let api_base = Url::parse(api_base_url)
            .map_err(|e| ForgeError::Request(format!("invalid API base URL {api_base_url}: {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(ForgeError::Request(format!(
                "invalid API base URL {api_base_url}"
            )));
        }

        let auth = AppAuthenticator::from_pem(app_id, private_key_pem)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ForgeError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base,
            auth,
            http,
        })
    }

    pub fn app_id(&self) -> u64 {
        self.auth.app_id()
    }

    fn repo_url(&self, repo: &RepositoryRef, rest: &[&str]) -> Result<Url, ForgeError> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str()];
        segments.extend_from_slice(rest);
        api_url(&self.api_base, &segments)
    }

    fn contents_url(&self, repo: &RepositoryRef, path: &str) -> Result<Url, ForgeError> {
        let mut rest = vec!["contents"];
        rest.extend(path.split('/').filter(|s| !s.is_empty()));
        self.repo_url(repo, &rest)
    }

    async fn request(
        &self,
        repo: &RepositoryRef,
        method: Method,
        url: Url,
    ) -> Result<RequestBuilder, ForgeError> {
        let token = self
            .auth
            .installation_token(&self.http, &self.api_base, repo.installation_id)
            .await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(request: RequestBuilder) -> Result<Response, ForgeError> {
        let response = request
            .send()
            .await
            .map_err(|e| ForgeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ForgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

/// Join `segments` onto the API base, percent-encoding each one.
pub(crate) fn api_url(base: &Url, segments: &[&str]) -> Result<Url, ForgeError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ForgeError::Request(format!("invalid API base URL {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl ForgeClient for GitHubClient {
    async fn get_public_key(&self, repo: &RepositoryRef) -> Result<RepoPublicKey, ForgeError> {
        let url = self.repo_url(repo, &["actions", "secrets", "public-key"])?;
        let response = Self::send(self.request(repo, Method::GET, url).await?).await?;

        let body: PublicKeyResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::InvalidResponse(format!("public key: {e}")))?;
        let key = Base64::decode_vec(&body.key)
            .map_err(|e| ForgeError::InvalidResponse(format!("public key is not base64: {e}")))?;

        Ok(RepoPublicKey {
            key_id: body.key_id,
            key,
        })
    }

    async fn create_secret(
        &self,
        repo: &RepositoryRef,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> Result<(), ForgeError> {
        let url = self.repo_url(repo, &["actions", "secrets", name])?;
        let body = EncryptedSecret {
            name: name.to_string(),
            key_id: key_id.to_string(),
            encrypted_value: encrypted_value.to_string(),
        };
        Self::send(self.request(repo, Method::PUT, url).await?.json(&body)).await?;
        Ok(())
    }

    async fn get_file_sha(
        &self,
        repo: &RepositoryRef,
        path: &str,
    ) -> Result<Option<String>, ForgeError> {
        let url = self.contents_url(repo, path)?;
        let response = match Self::send(self.request(repo, Method::GET, url).await?).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::InvalidResponse(format!("contents of {path}: {e}")))?;
        Ok(Some(body.sha))
    }

    async fn create_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<(), ForgeError> {
        // An existing file must be replaced by sha or the PUT is rejected with 422.
        let existing = self.get_file_sha(repo, path).await?;
        let url = self.contents_url(repo, path)?;
        let body = PutContentsRequest {
            message,
            content,
            sha: existing.as_deref(),
        };
        Self::send(self.request(repo, Method::PUT, url).await?.json(&body)).await?;
        Ok(())
    }

    async fn delete_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        let url = self.contents_url(repo, path)?;
        let message = format!("Remove {path}");
        let body = DeleteContentsRequest {
            message: &message,
            sha,
        };
        Self::send(self.request(repo, Method::DELETE, url).await?.json(&body)).await?;
        Ok(())
    }

    async fn list_labels(&self, repo: &RepositoryRef) -> Result<Vec<Label>, ForgeError> {
        let mut labels = Vec::new();
        let mut page = 1usize;

        loop {
            let mut url = self.repo_url(repo, &["labels"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &LABELS_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let response = Self::send(self.request(repo, Method::GET, url).await?).await?;
            let batch: Vec<Label> = response
                .json()
                .await
                .map_err(|e| ForgeError::InvalidResponse(format!("labels page {page}: {e}")))?;

            let last = batch.len() < LABELS_PER_PAGE;
            labels.extend(batch);
            if last {
                return Ok(labels);
            }
            page += 1;
        }
    }

    async fn create_label(&self, repo: &RepositoryRef, label: &Label) -> Result<(), ForgeError> {
        let url = self.repo_url(repo, &["labels"])?;
        let request = self.request(repo, Method::POST, url).await?.json(label);
        match Self::send(request).await {
            Ok(_) => Ok(()),
            // 422 `already_exists`: the label is there, which is what we want.
            Err(ForgeError::Status { status, body })
                if status == StatusCode::UNPROCESSABLE_ENTITY.as_u16()
                    && body.contains("already_exists") =>
            {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_label(&self, repo: &RepositoryRef, name: &str) -> Result<(), ForgeError> {
        let url = self.repo_url(repo, &["labels", name])?;
        match Self::send(self.request(repo, Method::DELETE, url).await?).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
