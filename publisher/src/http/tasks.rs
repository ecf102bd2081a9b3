//! Task API client

use connect_api::models::Task;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::deploy::api::TaskUpdates;
use crate::errors::ApiError;
use crate::http::client::HttpClient;
use crate::models::deployment::TaskUpdate;
use crate::utils::calc_exp_backoff;

/// Position in a task's output
#[derive(Debug, Clone, Copy, Default)]
struct PollState {
    first: u64,
    idle_polls: u32,
    finished: bool,
}

impl HttpClient {
    /// Fetch task output starting at line `first`
    pub async fn get_task(&self, task_id: &str, first: u64) -> Result<Task, ApiError> {
        let path = format!("/v1/tasks/{}", task_id);
        let wait = self.task_poll.wait.as_secs();
        self.get_with_query(&path, &[("first", first), ("wait", wait)])
            .await
    }

    /// Stream a task's status until it finishes.
    ///
    /// Each poll that returns output yields one update; polls with nothing
    /// new back off before retrying. The finished poll yields `Complete` or
    /// `BuildFailed` and ends the stream.
    pub fn task_updates<'a>(&'a self, task_id: &'a str) -> TaskUpdates<'a> {
        stream::try_unfold(PollState::default(), move |state| {
            self.next_task_update(task_id, state)
        })
        .boxed()
    }

    async fn next_task_update(
        &self,
        task_id: &str,
        mut state: PollState,
    ) -> Result<Option<(TaskUpdate, PollState)>, ApiError> {
        if state.finished {
            return Ok(None);
        }

        loop {
            let task = self.get_task(task_id, state.first).await?;
            state.first = task.last;

            if task.finished {
                state.finished = true;
                debug!("task {} finished with code {}", task_id, task.code);
                return Ok(Some((finished_update(task), state)));
            }

            if !task.output.is_empty() {
                state.idle_polls = 0;
                return Ok(Some((TaskUpdate::progress(task.output), state)));
            }

            let delay = calc_exp_backoff(&self.task_poll.cooldown, state.idle_polls);
            state.idle_polls = state.idle_polls.saturating_add(1);
            tokio::time::sleep(delay).await;
        }
    }
}

fn finished_update(task: Task) -> TaskUpdate {
    if task.code == 0 && task.error.is_empty() {
        TaskUpdate::complete(task.output)
    } else {
        let mut lines = task.output;
        if !task.error.is_empty() {
            lines.push(task.error);
        }
        TaskUpdate::build_failed(lines)
    }
}
