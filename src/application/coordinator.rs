use crate::domain::ports::Refresh;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Whether a refresh is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Running,
}

/// Result of asking the coordinator to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggerOutcome {
    #[serde(rename = "started")]
    Started,
    #[serde(rename = "already updating")]
    AlreadyUpdating,
}

/// Status reported to pollers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Updating,
    Ready,
}

/// Runs at most one refresh at a time.
///
/// `trigger` flips the state from `Idle` to `Running` in one step under the
/// watch channel's lock, so concurrent callers cannot both win. The refresh
/// runs on its own task; a supervising task joins it and puts the state back
/// to `Idle` whether it succeeded, failed or panicked. Triggers that arrive
/// while a refresh is running are rejected, never queued.
pub struct UpdateCoordinator {
    task: Arc<dyn Refresh>,
    state: watch::Sender<RefreshState>,
}

impl UpdateCoordinator {
    pub fn new(task: Arc<dyn Refresh>) -> Self {
        let (state, _) = watch::channel(RefreshState::Idle);
        Self { task, state }
    }

    /// Starts a refresh unless one is already running. Never waits for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self) -> TriggerOutcome {
        let acquired = self.state.send_if_modified(|state| match state {
            RefreshState::Running => false,
            RefreshState::Idle => {
                *state = RefreshState::Running;
                true
            }
        });
        if !acquired {
            return TriggerOutcome::AlreadyUpdating;
        }

        info!("Refresh started");
        let task = Arc::clone(&self.task);
        let state = self.state.clone();
        tokio::spawn(async move {
            let worker = tokio::spawn(async move { task.refresh().await });
            match worker.await {
                Ok(Ok(report)) => info!(
                    saved = report.saved.len(),
                    failed = report.failed.len(),
                    "Refresh completed"
                ),
                Ok(Err(e)) => warn!(error = %e, "Refresh failed"),
                Err(e) => error!(error = %e, "Refresh task aborted"),
            }
            state.send_replace(RefreshState::Idle);
        });

        TriggerOutcome::Started
    }

    /// Current status; never blocks.
    pub fn status(&self) -> UpdateStatus {
        match *self.state.borrow() {
            RefreshState::Running => UpdateStatus::Updating,
            RefreshState::Idle => UpdateStatus::Ready,
        }
    }

    /// Waits until no refresh is running.
    pub async fn wait_ready(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|s| *s == RefreshState::Idle).await;
    }
}
