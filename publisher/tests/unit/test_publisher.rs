//! Batch publisher tests against a scripted deployment API

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use connect_publish::deploy::api::{DeployApi, TaskUpdates};
use connect_publish::deploy::publisher::{PublishOptions, Publisher};
use connect_publish::errors::{ActionError, ApiError};
use connect_publish::models::deployment::{DeployOptions, DeploymentHandle, TaskUpdate};
use connect_publish::models::result::{BatchOutcome, Outcome, PublishResult, INVALID_APP_ID};

const BASE_DIR: &str = "/home/runner/work/site";

/// How the fake server responds to a submission for one identity
#[derive(Clone)]
enum Script {
    /// Deploy, then stream these task updates
    Deploy {
        app_id: i64,
        updates: Vec<Result<TaskUpdate, String>>,
    },
    /// Content already up to date
    NoOp { app_id: i64 },
    /// Submission rejected
    Reject,
}

#[derive(Default)]
struct FakeApi {
    probe_fails: bool,
    env_fails: bool,
    scripts: HashMap<String, Script>,
    submissions: Mutex<Vec<(String, String)>>,
    env_updates: Mutex<Vec<String>>,
}

impl FakeApi {
    fn script(mut self, identity: &str, script: Script) -> Self {
        self.scripts.insert(identity.to_string(), script);
        self
    }

    fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.lock().unwrap().clone()
    }

    fn env_updates(&self) -> Vec<String> {
        self.env_updates.lock().unwrap().clone()
    }
}

fn url_for(app_id: i64) -> String {
    format!("https://connect.example.com/content/{}/", app_id)
}

#[async_trait]
impl DeployApi for FakeApi {
    async fn probe_server(&self) -> Result<(), ApiError> {
        if self.probe_fails {
            return Err(ApiError::InvalidResponse("connection refused".to_string()));
        }
        Ok(())
    }

    async fn create_deployment(
        &self,
        identity: &str,
        manifest_path: &Path,
        _options: &DeployOptions,
    ) -> Result<DeploymentHandle, ApiError> {
        self.submissions.lock().unwrap().push((
            identity.to_string(),
            manifest_path.to_string_lossy().into_owned(),
        ));

        let script = self
            .scripts
            .get(identity)
            .cloned()
            .ok_or_else(|| ApiError::InvalidResponse(format!("unexpected identity {}", identity)))?;

        match script {
            Script::Deploy { app_id, .. } => Ok(DeploymentHandle {
                task_id: Some(identity.to_string()),
                app_id,
                app_guid: format!("guid-{}", app_id),
                app_url: url_for(app_id),
                title: identity.to_string(),
                no_op: false,
            }),
            Script::NoOp { app_id } => Ok(DeploymentHandle {
                task_id: None,
                app_id,
                app_guid: format!("guid-{}", app_id),
                app_url: url_for(app_id),
                title: identity.to_string(),
                no_op: true,
            }),
            Script::Reject => Err(ApiError::StatusError {
                status: 409,
                body: "conflict".to_string(),
            }),
        }
    }

    fn poll_task<'a>(&'a self, task_id: &'a str) -> TaskUpdates<'a> {
        let updates = match self.scripts.get(task_id) {
            Some(Script::Deploy { updates, .. }) => updates.clone(),
            _ => Vec::new(),
        };
        stream::iter(
            updates
                .into_iter()
                .map(|update| update.map_err(ApiError::InvalidResponse)),
        )
        .boxed()
    }

    async fn update_app_environment(
        &self,
        handle: &DeploymentHandle,
        _dir: &Path,
    ) -> Result<Vec<String>, ApiError> {
        self.env_updates.lock().unwrap().push(handle.app_guid.clone());
        if self.env_fails {
            return Err(ApiError::StatusError {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(vec!["DATABASE_URL".to_string()])
    }
}

fn deployed(app_id: i64) -> Script {
    Script::Deploy {
        app_id,
        updates: vec![
            Ok(TaskUpdate::progress(["Building"])),
            Ok(TaskUpdate::complete(["Completed"])),
        ],
    }
}

fn dirs(dirs: &[&str]) -> Vec<String> {
    dirs.iter().map(|d| d.to_string()).collect()
}

fn publisher(api: FakeApi, options: PublishOptions) -> Publisher<FakeApi> {
    Publisher::new(api, options, BASE_DIR)
}

fn failed_outcome(result: Result<BatchOutcome, ActionError>) -> (Vec<String>, Vec<PublishResult>) {
    match result {
        Err(ActionError::BatchFailure { failed, outcome }) => (failed, outcome.into_results()),
        other => panic!("expected a batch failure, got {:?}", other.map(|o| o.into_results())),
    }
}

#[tokio::test]
async fn test_all_succeed() {
    let api = FakeApi::default()
        .script("/one/", deployed(1))
        .script("/two/", deployed(2));
    let publisher = publisher(api, PublishOptions::default());

    let outcome = publisher.publish(&dirs(&["apps/one", "apps/two"])).await.unwrap();

    assert!(outcome.all_succeeded());
    let results = outcome.results();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].dir, "apps/one");
    assert_eq!(results[0].app_id, 1);
    assert_eq!(results[0].url, url_for(1));
    assert_eq!(results[0].outcome, Outcome::Success);
    assert_eq!(results[1].outcome, Outcome::Success);

    let submissions = publisher.api().submissions();
    assert_eq!(submissions[0].1, "apps/one/manifest.json");
}

#[tokio::test]
async fn test_failed_identity_does_not_stop_batch() {
    let api = FakeApi::default()
        .script("/one/", deployed(1))
        .script("/three/", deployed(3));
    let publisher = publisher(api, PublishOptions::default());

    let result = publisher
        .publish(&dirs(&["apps/one", "%%%", "apps/three"]))
        .await;

    let (failed, results) = failed_outcome(result);
    assert_eq!(failed, vec!["%%%"]);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].outcome, Outcome::Success);
    assert_eq!(results[1], PublishResult::unresolved("%%%"));
    assert_eq!(results[2].outcome, Outcome::Success);
    assert_eq!(results[2].app_id, 3);

    // the unresolvable directory never reached the server
    assert_eq!(publisher.api().submissions().len(), 2);
}

#[tokio::test]
async fn test_batch_failure_message_names_dirs() {
    let api = FakeApi::default().script("/one/", Script::Reject);
    let publisher = publisher(api, PublishOptions::default());

    let err = publisher
        .publish(&dirs(&["apps/one", "%%%"]))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "unsuccessful publish of dirs=apps/one, %%%");
}

#[tokio::test]
async fn test_submission_failure_has_no_app() {
    let api = FakeApi::default().script("/one/", Script::Reject);
    let publisher = publisher(api, PublishOptions::default());

    let (_, results) = failed_outcome(publisher.publish(&dirs(&["apps/one"])).await);

    assert_eq!(results[0].app_id, INVALID_APP_ID);
    assert_eq!(results[0].url, "");
    assert_eq!(results[0].outcome, Outcome::Failure);
}

#[tokio::test]
async fn test_build_failure_keeps_app() {
    let api = FakeApi::default().script(
        "/one/",
        Script::Deploy {
            app_id: 1,
            updates: vec![
                Ok(TaskUpdate::progress(["Building"])),
                Ok(TaskUpdate::build_failed(["exit status 1"])),
                Ok(TaskUpdate::progress(["Cleaning up"])),
                Ok(TaskUpdate::complete(Vec::<String>::new())),
            ],
        },
    );
    let publisher = publisher(api, PublishOptions::default());

    let (_, results) = failed_outcome(publisher.publish(&dirs(&["apps/one"])).await);

    assert_eq!(results[0].app_id, 1);
    assert_eq!(results[0].url, url_for(1));
    assert_eq!(results[0].outcome, Outcome::Failure);
}

#[tokio::test]
async fn test_stream_error_fails_only_its_dir() {
    let api = FakeApi::default()
        .script(
            "/one/",
            Script::Deploy {
                app_id: 1,
                updates: vec![
                    Ok(TaskUpdate::progress(["Building"])),
                    Err("connection reset".to_string()),
                ],
            },
        )
        .script("/two/", deployed(2));
    let publisher = publisher(api, PublishOptions::default());

    let (failed, results) =
        failed_outcome(publisher.publish(&dirs(&["apps/one", "apps/two"])).await);

    assert_eq!(failed, vec!["apps/one"]);
    assert_eq!(results[0].app_id, 1);
    assert_eq!(results[0].url, url_for(1));
    assert_eq!(results[1].outcome, Outcome::Success);
}

#[tokio::test]
async fn test_no_op_is_skipped() {
    let api = FakeApi::default().script("/one/", Script::NoOp { app_id: 1 });
    let options = PublishOptions {
        update_env: true,
        ..Default::default()
    };
    let publisher = publisher(api, options);

    let outcome = publisher.publish(&dirs(&["apps/one"])).await.unwrap();

    assert_eq!(outcome.results()[0].outcome, Outcome::Skipped);
    assert_eq!(outcome.results()[0].app_id, 1);
    assert!(publisher.api().env_updates().is_empty());
}

#[tokio::test]
async fn test_env_update_after_deploy() {
    let api = FakeApi::default().script("/one/", deployed(1));
    let options = PublishOptions {
        update_env: true,
        ..Default::default()
    };
    let publisher = publisher(api, options);

    let outcome = publisher.publish(&dirs(&["apps/one"])).await.unwrap();

    assert!(outcome.all_succeeded());
    assert_eq!(publisher.api().env_updates(), vec!["guid-1"]);
}

#[tokio::test]
async fn test_env_update_failure_fails_dir() {
    let api = FakeApi {
        env_fails: true,
        ..Default::default()
    }
    .script("/one/", deployed(1));
    let options = PublishOptions {
        update_env: true,
        ..Default::default()
    };
    let publisher = publisher(api, options);

    let (_, results) = failed_outcome(publisher.publish(&dirs(&["apps/one"])).await);

    assert_eq!(results[0].app_id, 1);
    assert_eq!(results[0].outcome, Outcome::Failure);
}

#[tokio::test]
async fn test_env_updated_after_build_failure() {
    let api = FakeApi::default().script(
        "/one/",
        Script::Deploy {
            app_id: 1,
            updates: vec![
                Ok(TaskUpdate::build_failed(["exit status 1"])),
                Ok(TaskUpdate::complete(Vec::<String>::new())),
            ],
        },
    );
    let options = PublishOptions {
        update_env: true,
        ..Default::default()
    };
    let publisher = publisher(api, options);

    let (_, results) = failed_outcome(publisher.publish(&dirs(&["apps/one"])).await);

    assert_eq!(results[0].outcome, Outcome::Failure);
    assert_eq!(results[0].app_id, 1);
    assert_eq!(publisher.api().env_updates(), vec!["guid-1"]);
}

#[tokio::test]
async fn test_env_not_updated_unless_enabled() {
    let api = FakeApi::default().script("/one/", deployed(1));
    let publisher = publisher(api, PublishOptions::default());

    publisher.publish(&dirs(&["apps/one"])).await.unwrap();

    assert!(publisher.api().env_updates().is_empty());
}

#[tokio::test]
async fn test_probe_failure_attempts_nothing() {
    let api = FakeApi {
        probe_fails: true,
        ..Default::default()
    }
    .script("/one/", deployed(1));
    let publisher = publisher(api, PublishOptions::default());

    let result = publisher.publish(&dirs(&["apps/one"])).await;

    assert!(matches!(result, Err(ActionError::ServerUnreachable(_))));
    assert!(publisher.api().submissions().is_empty());
}

#[tokio::test]
async fn test_results_keep_input_order() {
    let api = FakeApi::default()
        .script("/c/", deployed(3))
        .script("/a/", Script::NoOp { app_id: 1 })
        .script("/b/", deployed(2));
    let publisher = publisher(api, PublishOptions::default());

    let outcome = publisher.publish(&dirs(&["c", "a", "b"])).await.unwrap();

    let order: Vec<&str> = outcome.results().iter().map(|r| r.dir.as_str()).collect();
    assert_eq!(order, vec!["c", "a", "b"]);
    let identities: Vec<String> = publisher
        .api()
        .submissions()
        .into_iter()
        .map(|(identity, _)| identity)
        .collect();
    assert_eq!(identities, vec!["/c/", "/a/", "/b/"]);
}

#[tokio::test]
async fn test_explicit_identity() {
    let api = FakeApi::default().script("/fancy/plumber/", deployed(5));
    let publisher = publisher(api, PublishOptions::default());

    let outcome = publisher
        .publish(&dirs(&["testapps/plumber:fancy/plumber"]))
        .await
        .unwrap();

    assert_eq!(outcome.results()[0].dir, "testapps/plumber");
    assert_eq!(publisher.api().submissions()[0].1, "testapps/plumber/manifest.json");
}

#[tokio::test]
async fn test_extra_identity_segments_are_dropped() {
    let api = FakeApi::default()
        .script("/b/", deployed(2))
        .script("/two/", deployed(3));
    let publisher = publisher(api, PublishOptions::default());

    let outcome = publisher
        .publish(&dirs(&["apps/a:b:c", "apps/two"]))
        .await
        .unwrap();

    let results = outcome.results();
    assert_eq!(results[0].dir, "apps/a");
    assert_eq!(results[0].app_id, 2);
    assert_eq!(results[0].outcome, Outcome::Success);
    assert_eq!(results[1].outcome, Outcome::Success);
    assert_eq!(
        publisher.api().submissions()[0],
        ("/b/".to_string(), "apps/a/manifest.json".to_string())
    );
}

#[tokio::test]
async fn test_namespace_applies_to_derived_identity() {
    let api = FakeApi::default().script("/team/plumber/", deployed(5));
    let options = PublishOptions {
        namespace: Some("team".to_string()),
        ..Default::default()
    };
    let publisher = publisher(api, options);

    publisher.publish(&dirs(&["testapps/plumber"])).await.unwrap();

    assert_eq!(publisher.api().submissions()[0].0, "/team/plumber/");
}

// Explicit identities are namespaced too. Whether an explicit identity should
// bypass the namespace is an open question; this pins the current behavior.
#[tokio::test]
async fn test_namespace_applies_to_explicit_identity() {
    let api = FakeApi::default().script("/team/fancy/plumber/", deployed(5));
    let options = PublishOptions {
        namespace: Some("team".to_string()),
        ..Default::default()
    };
    let publisher = publisher(api, options);

    publisher
        .publish(&dirs(&["testapps/plumber:/fancy/plumber/"]))
        .await
        .unwrap();

    assert_eq!(publisher.api().submissions()[0].0, "/team/fancy/plumber/");
}

#[tokio::test]
async fn test_empty_batch() {
    let publisher = publisher(FakeApi::default(), PublishOptions::default());

    let outcome = publisher.publish(&[]).await.unwrap();

    assert!(outcome.results().is_empty());
}
