// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deterministic in-memory forge for tests.
//!
//! Keeps secrets, files and labels in maps with upsert semantics, records
//! every call in order, and holds a real X25519 key pair so tests can open
//! the secrets that were provisioned.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};

use super::{EncryptedSecret, ForgeClient, ForgeError, Label, RepoPublicKey};
use crate::crypto::{self, RecipientKeyPair};
use crate::models::RepositoryRef;

/// One recorded forge call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForgeCall {
    GetPublicKey,
    CreateSecret(String),
    GetFileSha(String),
    CreateFile(String),
    DeleteFile(String),
    ListLabels,
    CreateLabel(String),
    DeleteLabel(String),
}

struct StoredFile {
    content: String,
    sha: String,
}

struct FakeState {
    keypair: RecipientKeyPair,
    key_generation: u32,
    calls: Vec<ForgeCall>,
    failures: HashMap<ForgeCall, ForgeError>,
    secrets: HashMap<String, EncryptedSecret>,
    files: HashMap<String, StoredFile>,
    labels: Vec<Label>,
    next_sha: u64,
    truncated_key: bool,
}

pub struct FakeForge {
    state: Mutex<FakeState>,
}

impl Default for FakeForge {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeForge {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                keypair: RecipientKeyPair::generate().expect("entropy"),
                key_generation: 1,
                calls: Vec::new(),
                failures: HashMap::new(),
                secrets: HashMap::new(),
                files: HashMap::new(),
                labels: Vec::new(),
                next_sha: 1,
                truncated_key: false,
            }),
        }
    }

    /// Make every future `call` fail with `error`.
    pub fn fail_on(self, call: ForgeCall, error: ForgeError) -> Self {
        self.state.lock().unwrap().failures.insert(call, error);
        self
    }

    pub fn with_labels(self, labels: Vec<Label>) -> Self {
        self.state.lock().unwrap().labels = labels;
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let sha = state.take_sha();
            state.files.insert(
                path.to_string(),
                StoredFile {
                    content: content.to_string(),
                    sha,
                },
            );
        }
        self
    }

    /// Serve a 31-byte public key, as a corrupted API response would.
    pub fn with_truncated_key(self) -> Self {
        self.state.lock().unwrap().truncated_key = true;
        self
    }

    /// Replace the repository key pair, as GitHub does on rotation.
    pub fn rotate_key(&self) {
        let mut state = self.state.lock().unwrap();
        state.keypair = RecipientKeyPair::generate().expect("entropy");
        state.key_generation += 1;
    }

    pub fn calls(&self) -> Vec<ForgeCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn secret_count(&self) -> usize {
        self.state.lock().unwrap().secrets.len()
    }

    pub fn secret(&self, name: &str) -> Option<EncryptedSecret> {
        self.state.lock().unwrap().secrets.get(name).cloned()
    }

    /// Decrypt a stored secret with the current repository key.
    pub fn open_secret(&self, name: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        let secret = state.secrets.get(name)?;
        let sealed = Base64::decode_vec(&secret.encrypted_value).ok()?;
        crypto::open(&sealed, &state.keypair).ok()
    }

    pub fn current_key_id(&self) -> String {
        let state = self.state.lock().unwrap();
        state.key_id()
    }

    /// Decoded file content.
    pub fn file(&self, path: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        let stored = state.files.get(path)?;
        let bytes = Base64::decode_vec(&stored.content).ok()?;
        String::from_utf8(bytes).ok()
    }

    pub fn file_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.state.lock().unwrap().files.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn label_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .labels
            .iter()
            .map(|l| l.name.clone())
            .collect();
        names.sort();
        names
    }

    fn record(&self, call: ForgeCall) -> Result<std::sync::MutexGuard<'_, FakeState>, ForgeError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        if let Some(err) = state.failures.get(&call).cloned() {
            return Err(err);
        }
        Ok(state)
    }
}

impl FakeState {
    fn key_id(&self) -> String {
        format!("key-{}", self.key_generation)
    }

    fn take_sha(&mut self) -> String {
        let sha = format!("{:040x}", self.next_sha);
        self.next_sha += 1;
        sha
    }
}

fn not_found(what: &str) -> ForgeError {
    ForgeError::Status {
        status: 404,
        body: format!("{what} Not Found"),
    }
}

#[async_trait]
impl ForgeClient for FakeForge {
    async fn get_public_key(&self, _repo: &RepositoryRef) -> Result<RepoPublicKey, ForgeError> {
        let state = self.record(ForgeCall::GetPublicKey)?;
        let mut key = state.keypair.public_bytes().to_vec();
        if state.truncated_key {
            key.pop();
        }
        Ok(RepoPublicKey {
            key_id: state.key_id(),
            key,
        })
    }

    async fn create_secret(
        &self,
        _repo: &RepositoryRef,
        name: &str,
        encrypted_value: &str,
        key_id: &str,
    ) -> Result<(), ForgeError> {
        let mut state = self.record(ForgeCall::CreateSecret(name.to_string()))?;
        if key_id != state.key_id() {
            return Err(ForgeError::Status {
                status: 422,
                body: format!("key_id {key_id} is not current"),
            });
        }
        state.secrets.insert(
            name.to_string(),
            EncryptedSecret {
                name: name.to_string(),
                key_id: key_id.to_string(),
                encrypted_value: encrypted_value.to_string(),
            },
        );
        Ok(())
    }

    async fn get_file_sha(
        &self,
        _repo: &RepositoryRef,
        path: &str,
    ) -> Result<Option<String>, ForgeError> {
        let state = self.record(ForgeCall::GetFileSha(path.to_string()))?;
        Ok(state.files.get(path).map(|f| f.sha.clone()))
    }

    async fn create_file(
        &self,
        _repo: &RepositoryRef,
        path: &str,
        content: &str,
        _message: &str,
    ) -> Result<(), ForgeError> {
        let mut state = self.record(ForgeCall::CreateFile(path.to_string()))?;
        let sha = state.take_sha();
        state.files.insert(
            path.to_string(),
            StoredFile {
                content: content.to_string(),
                sha,
            },
        );
        Ok(())
    }

    async fn delete_file(
        &self,
        _repo: &RepositoryRef,
        path: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        let mut state = self.record(ForgeCall::DeleteFile(path.to_string()))?;
        match state.files.get(path) {
            Some(file) if file.sha == sha => {
                state.files.remove(path);
                Ok(())
            }
            Some(_) => Err(ForgeError::Status {
                status: 409,
                body: format!("{path} does not match {sha}"),
            }),
            None => Err(not_found(path)),
        }
    }

    async fn list_labels(&self, _repo: &RepositoryRef) -> Result<Vec<Label>, ForgeError> {
        let state = self.record(ForgeCall::ListLabels)?;
        Ok(state.labels.clone())
    }

    async fn create_label(&self, _repo: &RepositoryRef, label: &Label) -> Result<(), ForgeError> {
        let mut state = self.record(ForgeCall::CreateLabel(label.name.clone()))?;
        if !state.labels.iter().any(|l| l.name == label.name) {
            state.labels.push(label.clone());
        }
        Ok(())
    }

    async fn delete_label(&self, _repo: &RepositoryRef, name: &str) -> Result<(), ForgeError> {
        let mut state = self.record(ForgeCall::DeleteLabel(name.to_string()))?;
        state.labels.retain(|l| l.name != name);
        Ok(())
    }
}
