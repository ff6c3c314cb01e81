// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-event setup run record.
//!
//! A run is owned by the task that executes it and is dropped after it has
//! been logged. Nothing in here is shared between runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::RepositoryRef;

/// Progress through the canonical step order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupPhase {
    Received,
    Authenticated,
    SecretsProvisioned,
    FilesCreated,
    Completed,
}

/// Result of one step. Failures carry the rendered error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub name: String,
    pub outcome: StepOutcome,
}

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStatus {
    Completed,
    CompletedWithErrors,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupRun {
    pub run_id: Uuid,
    pub repository: RepositoryRef,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub phase: SetupPhase,
    pub steps: Vec<StepResult>,
}

impl SetupRun {
    pub fn new(repository: RepositoryRef) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            repository,
            started_at: Utc::now(),
            finished_at: None,
            phase: SetupPhase::Received,
            steps: Vec::new(),
        }
    }

    pub fn advance(&mut self, phase: SetupPhase) {
        self.phase = phase;
    }

    pub fn record<E: std::fmt::Display>(&mut self, name: &str, result: Result<(), E>) {
        let outcome = match result {
            Ok(()) => StepOutcome::Succeeded,
            Err(e) => StepOutcome::Failed(e.to_string()),
        };
        self.steps.push(StepResult {
            name: name.to_string(),
            outcome,
        });
    }

    pub fn finish(&mut self) {
        self.phase = SetupPhase::Completed;
        self.finished_at = Some(Utc::now());
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| s.outcome.is_failure())
    }

    pub fn status(&self) -> SetupStatus {
        if self.failed_steps().next().is_some() {
            SetupStatus::CompletedWithErrors
        } else {
            SetupStatus::Completed
        }
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}
