//! Deployment API capabilities

use std::path::Path;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::ApiError;
use crate::models::deployment::{DeployOptions, DeploymentHandle, TaskUpdate};

/// Stream of status updates for one deployment task, in emission order
pub type TaskUpdates<'a> = BoxStream<'a, Result<TaskUpdate, ApiError>>;

/// Deployment API trait for testability
#[async_trait]
pub trait DeployApi: Send + Sync {
    /// Check that the server is reachable
    async fn probe_server(&self) -> Result<(), ApiError>;

    /// Submit the content described by `manifest_path` to the application
    /// addressed by `identity`
    async fn create_deployment(
        &self,
        identity: &str,
        manifest_path: &Path,
        options: &DeployOptions,
    ) -> Result<DeploymentHandle, ApiError>;

    /// Status updates of a deployment task until it finishes
    fn poll_task<'a>(&'a self, task_id: &'a str) -> TaskUpdates<'a>;

    /// Update the application's environment from the content directory,
    /// returning the names of the variables set
    async fn update_app_environment(
        &self,
        handle: &DeploymentHandle,
        dir: &Path,
    ) -> Result<Vec<String>, ApiError>;
}
