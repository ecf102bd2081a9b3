//! Batch publishing of content directories

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::deploy::api::{DeployApi, TaskUpdates};
use crate::deploy::identity::{apply_namespace, normalize_identity, resolve_app_identifier};
use crate::deploy::spec::DirectorySpec;
use crate::deploy::tracker::TaskTracker;
use crate::errors::{ActionError, DirectoryError};
use crate::models::deployment::{DeployOptions, DeploymentHandle};
use crate::models::manifest::MANIFEST_FILE;
use crate::models::result::{BatchOutcome, Outcome, PublishResult};

/// Publisher options, fixed for the whole batch
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Options passed through with every submission
    pub deploy: DeployOptions,

    /// Prefix prepended to every identity
    pub namespace: Option<String>,

    /// Update the environment of each deployed application
    pub update_env: bool,

    /// Surface task log lines
    pub show_logs: bool,
}

/// Publishes directories one at a time through a shared API client
pub struct Publisher<A> {
    api: A,
    options: PublishOptions,
    base_dir: PathBuf,
    tracker: TaskTracker,
}

impl<A: DeployApi> Publisher<A> {
    /// Create a new publisher. `base_dir` anchors identity derivation for
    /// relative directories.
    pub fn new(api: A, options: PublishOptions, base_dir: impl Into<PathBuf>) -> Self {
        let tracker = TaskTracker::new(options.show_logs);
        Self {
            api,
            options,
            base_dir: base_dir.into(),
            tracker,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Publish every directory in order.
    ///
    /// A failure in one directory never stops the others. Returns
    /// `BatchFailure`, carrying every result, when any directory failed.
    pub async fn publish(&self, dirs: &[String]) -> Result<BatchOutcome, ActionError> {
        self.api
            .probe_server()
            .await
            .map_err(ActionError::ServerUnreachable)?;

        let mut results = Vec::with_capacity(dirs.len());
        for dir in dirs {
            results.push(self.publish_dir(dir).await);
        }

        let outcome = BatchOutcome::new(results);
        if outcome.all_succeeded() {
            Ok(outcome)
        } else {
            Err(ActionError::BatchFailure {
                failed: outcome.failed_dirs(),
                outcome,
            })
        }
    }

    async fn publish_dir(&self, raw: &str) -> PublishResult {
        let spec = DirectorySpec::parse(raw);

        let handle = match self.submit(&spec).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("dir {:?}: {}", spec.path, e);
                return PublishResult::unresolved(spec.path);
            }
        };

        info!(
            "publishing {} to {}\n     id: {}\n   guid: {}\n  title: {}",
            spec.path, handle.app_url, handle.app_id, handle.app_guid, handle.title
        );

        let outcome = match self.complete(&spec, &handle).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("dir {:?}: {}", spec.path, e);
                Outcome::Failure
            }
        };

        PublishResult {
            dir: spec.path,
            app_id: handle.app_id,
            url: handle.app_url,
            outcome,
        }
    }

    async fn submit(&self, spec: &DirectorySpec) -> Result<DeploymentHandle, DirectoryError> {
        let identity = match &spec.explicit_identity {
            Some(identity) => normalize_identity(identity),
            None => {
                let identity = resolve_app_identifier(&spec.path, &self.base_dir)?;
                debug!("strict path={:?} derived from dir={:?}", identity, spec.path);
                identity
            }
        };
        let identity = apply_namespace(self.options.namespace.as_deref(), &identity);

        let manifest_path = Path::new(&spec.path).join(MANIFEST_FILE);
        debug!("publishing dir={:?} path={:?}", spec.path, identity);

        self.api
            .create_deployment(&identity, &manifest_path, &self.options.deploy)
            .await
            .map_err(DirectoryError::Submission)
    }

    async fn complete(
        &self,
        spec: &DirectorySpec,
        handle: &DeploymentHandle,
    ) -> Result<Outcome, DirectoryError> {
        let updates: TaskUpdates<'_> = match &handle.task_id {
            Some(task_id) => self.api.poll_task(task_id),
            None => stream::empty().boxed(),
        };

        let outcome = self
            .tracker
            .track(handle, updates)
            .await
            .map_err(DirectoryError::Tracking)?;

        if outcome == Outcome::Skipped {
            info!("{} is already up to date", spec.path);
        } else if self.options.update_env {
            let names = self
                .api
                .update_app_environment(handle, Path::new(&spec.path))
                .await
                .map_err(DirectoryError::EnvironmentUpdate)?;
            if names.is_empty() {
                debug!("no environment variables to update for {}", spec.path);
            } else {
                info!("updated environment of {}: {}", spec.path, names.join(", "));
            }
        }

        Ok(outcome)
    }
}
