//! Deployment task tracking

use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::errors::ApiError;
use crate::models::deployment::{DeploymentHandle, TaskUpdate, TaskUpdateKind};
use crate::models::result::Outcome;

/// Consumes a task's update stream and classifies the outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskTracker {
    /// Surface task log lines at info level rather than debug
    pub show_logs: bool,
}

impl TaskTracker {
    pub fn new(show_logs: bool) -> Self {
        Self { show_logs }
    }

    /// Track a deployment to completion.
    ///
    /// Stops at a `Complete` update or at the end of the stream. Errors from
    /// the stream are returned to the caller as-is.
    pub async fn track<S>(&self, handle: &DeploymentHandle, updates: S) -> Result<Outcome, ApiError>
    where
        S: Stream<Item = Result<TaskUpdate, ApiError>>,
    {
        futures::pin_mut!(updates);

        let mut success = true;
        let mut received = 0usize;

        while let Some(update) = updates.next().await {
            let update = update?;
            received += 1;

            for line in &update.lines {
                if self.show_logs {
                    info!("{}", line);
                } else {
                    debug!("{}", line);
                }
            }

            if update.kind == TaskUpdateKind::BuildFailed {
                if success {
                    warn!("remote build failed for app {}", handle.app_id);
                }
                success = false;
            }

            if update.kind.is_terminal() {
                break;
            }
        }

        debug!(
            "task {:?} tracked through {} updates (success={})",
            handle.task_id, received, success
        );

        let outcome = if handle.no_op {
            Outcome::Skipped
        } else if success {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        Ok(outcome)
    }
}
