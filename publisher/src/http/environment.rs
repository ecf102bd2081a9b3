//! Content environment API client

use std::path::Path;

use connect_api::models::EnvironmentVariable;
use tracing::debug;

use crate::errors::ApiError;
use crate::filesys::file::File;
use crate::http::client::HttpClient;
use crate::models::environment::{parse_env_file, ENV_FILE};

impl HttpClient {
    /// Set environment variables on a content item, returning the names the
    /// server reports as set
    pub async fn set_environment(
        &self,
        guid: &str,
        vars: &[EnvironmentVariable],
    ) -> Result<Vec<String>, ApiError> {
        let path = format!("/v1/content/{}/environment", guid);
        self.patch(&path, vars).await
    }

    /// Apply the environment file of `dir` to a content item
    pub async fn sync_environment(&self, guid: &str, dir: &Path) -> Result<Vec<String>, ApiError> {
        let file = File::new(dir.join(ENV_FILE));
        if !file.exists().await {
            debug!("no {} in {:?}", ENV_FILE, dir);
            return Ok(Vec::new());
        }

        let contents = file.read_string().await?;
        let vars = parse_env_file(&contents, |name| std::env::var(name).ok());
        if vars.is_empty() {
            return Ok(Vec::new());
        }

        self.set_environment(guid, &vars).await
    }
}
