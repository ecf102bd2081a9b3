//! Deployment API backed by the Connect HTTP API

use std::path::Path;

use async_trait::async_trait;
use connect_api::models::{Content, CreateContentRequest, UpdateContentRequest};
use tracing::{debug, info, warn};

use crate::bundle::build_bundle;
use crate::deploy::api::{DeployApi, TaskUpdates};
use crate::deploy::identity::content_name;
use crate::errors::ApiError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeployOptions, DeploymentHandle};
use crate::utils::sha256_hash;

impl HttpClient {
    /// Find the content for `identity`, creating and claiming it if needed
    async fn find_or_create_content(
        &self,
        identity: &str,
        options: &DeployOptions,
    ) -> Result<Content, ApiError> {
        let access_type = options.access_type.map(|a| a.to_string());

        if let Some(content) = self.find_content_by_vanity(identity).await? {
            debug!("found content {} at {}", content.guid, identity);
            if access_type.is_some() && content.access_type != access_type {
                let request = UpdateContentRequest { access_type };
                return self.update_content(&content.guid, &request).await;
            }
            return Ok(content);
        }

        let name = content_name(identity);
        let request = CreateContentRequest {
            name: name.clone(),
            title: name,
            access_type,
        };
        let content = self.create_content(&request).await?;
        info!("created content {} for {}", content.guid, identity);

        if let Err(e) = self.set_vanity(&content.guid, identity).await {
            if options.require_vanity_path {
                return Err(ApiError::VanityError(format!(
                    "unable to claim {} for content {}: {}",
                    identity, content.guid, e
                )));
            }
            warn!(
                "unable to claim {} for content {}, it is still reachable at {}: {}",
                identity, content.guid, content.content_url, e
            );
        }

        Ok(content)
    }

    /// Whether the active bundle of `content` has the given hash. An active
    /// bundle that cannot be downloaded counts as out of date.
    async fn is_current(&self, content: &Content, sha256: &str) -> bool {
        let Some(bundle_id) = content.bundle_id.as_deref() else {
            return false;
        };
        match self.download_bundle(&content.guid, bundle_id).await {
            Ok(active) => sha256_hash(&active) == sha256,
            Err(e) => {
                warn!(
                    "unable to download active bundle {} of content {}, deploying anyway: {}",
                    bundle_id, content.guid, e
                );
                false
            }
        }
    }
}

fn parse_app_id(content: &Content) -> Result<i64, ApiError> {
    content.id.parse().map_err(|_| {
        ApiError::InvalidResponse(format!(
            "content {} has a non-numeric id {:?}",
            content.guid, content.id
        ))
    })
}

#[async_trait]
impl DeployApi for HttpClient {
    async fn probe_server(&self) -> Result<(), ApiError> {
        let settings = self.server_settings().await?;
        debug!("server version {:?}", settings.version);
        Ok(())
    }

    async fn create_deployment(
        &self,
        identity: &str,
        manifest_path: &Path,
        options: &DeployOptions,
    ) -> Result<DeploymentHandle, ApiError> {
        let bundle = build_bundle(manifest_path).await?;
        let content = self.find_or_create_content(identity, options).await?;
        let app_id = parse_app_id(&content)?;
        let title = content.title.clone().unwrap_or_else(|| content.name.clone());

        if !options.force && self.is_current(&content, &bundle.sha256).await {
            return Ok(DeploymentHandle {
                task_id: None,
                app_id,
                app_guid: content.guid,
                app_url: content.content_url,
                title,
                no_op: true,
            });
        }

        let uploaded = self.upload_bundle(&content.guid, bundle.bytes).await?;
        let deployed = self.deploy_bundle(&content.guid, &uploaded.id).await?;
        debug!(
            "bundle {} deploying as task {} for content {}",
            uploaded.id, deployed.task_id, content.guid
        );

        Ok(DeploymentHandle {
            task_id: Some(deployed.task_id),
            app_id,
            app_guid: content.guid,
            app_url: content.content_url,
            title,
            no_op: false,
        })
    }

    fn poll_task<'a>(&'a self, task_id: &'a str) -> TaskUpdates<'a> {
        self.task_updates(task_id)
    }

    async fn update_app_environment(
        &self,
        handle: &DeploymentHandle,
        dir: &Path,
    ) -> Result<Vec<String>, ApiError> {
        self.sync_environment(&handle.app_guid, dir).await
    }
}
