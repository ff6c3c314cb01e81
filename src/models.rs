// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Webhook Data Models
//!
//! Inbound `repository` webhook payloads and the [`RepositoryRef`] derived
//! from them. Only the fields the setup flow needs are deserialized; the
//! rest of GitHub's payload is ignored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Event type discriminator header.
pub const EVENT_HEADER: &str = "x-github-event";
/// Delivery id header, used only for log correlation.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// The only event type that triggers setup.
pub const REPOSITORY_EVENT: &str = "repository";
/// The only `repository` action that triggers setup.
pub const CREATED_ACTION: &str = "created";

// =============================================================================
// Repository Reference
// =============================================================================

/// Target repository and the app installation allowed to act on it.
///
/// Built once from the inbound event and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    pub installation_id: u64,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, installation_id: u64) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            installation_id,
        }
    }

    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// =============================================================================
// Webhook Payload
// =============================================================================

/// `repository` webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryEvent {
    pub action: String,
    pub repository: EventRepository,
    #[serde(default)]
    pub installation: Option<EventInstallation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    pub name: String,
    pub owner: EventAccount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventAccount {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventInstallation {
    pub id: u64,
}

impl RepositoryEvent {
    pub fn is_created(&self) -> bool {
        self.action == CREATED_ACTION
    }

    /// Repository reference for the setup run.
    ///
    /// Deliveries without an installation get id `0`; the token exchange
    /// then fails and every step is recorded as a forge error.
    pub fn repository_ref(&self) -> RepositoryRef {
        RepositoryRef::new(
            self.repository.owner.login.clone(),
            self.repository.name.clone(),
            self.installation.as_ref().map(|i| i.id).unwrap_or_default(),
        )
    }
}

/// Body returned to the webhook sender.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WebhookAck {
    /// `processing` when a setup run was started, `ignored` otherwise.
    pub status: String,
    /// Why the delivery was ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl WebhookAck {
    pub fn processing() -> Self {
        Self {
            status: "processing".to_string(),
            reason: None,
        }
    }

    pub fn ignored(reason: impl Into<String>) -> Self {
        Self {
            status: "ignored".to_string(),
            reason: Some(reason.into()),
        }
    }
}
