// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server-side label reconciliation.

use std::collections::HashSet;

use tracing::debug;

use crate::github::{ForgeClient, ForgeError, Label};
use crate::models::RepositoryRef;

/// What a sync changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelSyncReport {
    pub deleted: Vec<String>,
    pub created: Vec<String>,
}

/// Make the repository's labels match `wanted` by name.
///
/// Labels outside the taxonomy are deleted, missing ones created. Labels
/// already present are left alone, so a second sync is a no-op apart from
/// the listing.
pub async fn sync_labels(
    client: &dyn ForgeClient,
    repo: &RepositoryRef,
    wanted: &[Label],
) -> Result<LabelSyncReport, ForgeError> {
    let current = client.list_labels(repo).await?;
    let wanted_names: HashSet<&str> = wanted.iter().map(|l| l.name.as_str()).collect();
    let current_names: HashSet<&str> = current.iter().map(|l| l.name.as_str()).collect();

    let mut report = LabelSyncReport::default();

    for label in current.iter().filter(|l| !wanted_names.contains(l.name.as_str())) {
        client.delete_label(repo, &label.name).await?;
        report.deleted.push(label.name.clone());
    }

    for label in wanted.iter().filter(|l| !current_names.contains(l.name.as_str())) {
        client.create_label(repo, label).await?;
        report.created.push(label.name.clone());
    }

    debug!(
        repository = %repo,
        deleted = report.deleted.len(),
        created = report.created.len(),
        "Synced labels"
    );
    Ok(report)
}
