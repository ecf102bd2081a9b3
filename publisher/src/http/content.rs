//! Content API client

use connect_api::models::{
    Bundle, Content, CreateContentRequest, DeployRequest, DeployResponse, ServerSettings,
    SetVanityRequest, UpdateContentRequest, Vanity,
};

use crate::deploy::identity::normalize_identity;
use crate::errors::ApiError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Fetch server settings
    pub async fn server_settings(&self) -> Result<ServerSettings, ApiError> {
        self.get("/server_settings").await
    }

    /// Find the content claiming the vanity path `identity`
    pub async fn find_content_by_vanity(&self, identity: &str) -> Result<Option<Content>, ApiError> {
        let wanted = normalize_identity(identity);
        let vanities: Vec<Vanity> = self.get("/v1/vanities").await?;

        match vanities
            .into_iter()
            .find(|vanity| normalize_identity(&vanity.path) == wanted)
        {
            Some(vanity) => Ok(Some(self.get_content(&vanity.content_guid).await?)),
            None => Ok(None),
        }
    }

    /// Get a content item
    pub async fn get_content(&self, guid: &str) -> Result<Content, ApiError> {
        let path = format!("/v1/content/{}", guid);
        self.get(&path).await
    }

    /// Create a content item
    pub async fn create_content(&self, request: &CreateContentRequest) -> Result<Content, ApiError> {
        self.post("/v1/content", request).await
    }

    /// Update a content item
    pub async fn update_content(
        &self,
        guid: &str,
        request: &UpdateContentRequest,
    ) -> Result<Content, ApiError> {
        let path = format!("/v1/content/{}", guid);
        self.patch(&path, request).await
    }

    /// Claim a vanity path for a content item
    pub async fn set_vanity(&self, guid: &str, identity: &str) -> Result<Vanity, ApiError> {
        let path = format!("/v1/content/{}/vanity", guid);
        let request = SetVanityRequest {
            path: normalize_identity(identity),
        };
        self.put(&path, &request).await
    }

    /// Upload a bundle archive
    pub async fn upload_bundle(&self, guid: &str, archive: Vec<u8>) -> Result<Bundle, ApiError> {
        let path = format!("/v1/content/{}/bundles", guid);
        self.post_bytes(&path, archive).await
    }

    /// Download a bundle archive
    pub async fn download_bundle(&self, guid: &str, bundle_id: &str) -> Result<Vec<u8>, ApiError> {
        let path = format!("/v1/content/{}/bundles/{}/download", guid, bundle_id);
        self.get_bytes(&path).await
    }

    /// Deploy an uploaded bundle, starting a task
    pub async fn deploy_bundle(&self, guid: &str, bundle_id: &str) -> Result<DeployResponse, ApiError> {
        let path = format!("/v1/content/{}/deploy", guid);
        let request = DeployRequest {
            bundle_id: bundle_id.to_string(),
        };
        self.post(&path, &request).await
    }
}
