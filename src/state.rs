// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::setup::SetupOrchestrator;

/// Server context built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SetupOrchestrator>,
    /// Detached setup runs. Closed and drained on shutdown.
    pub tasks: TaskTracker,
}

impl AppState {
    pub fn new(orchestrator: SetupOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            tasks: TaskTracker::new(),
        }
    }
}
