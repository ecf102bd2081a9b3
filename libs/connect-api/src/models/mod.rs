//! API models

use serde::{Deserialize, Serialize};

/// Server settings, fetched to probe that the server is reachable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

/// A content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub guid: String,

    /// Numeric id, sent by the server as a string
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content_url: String,

    #[serde(default)]
    pub dashboard_url: Option<String>,

    /// Currently active bundle, if any has been deployed
    #[serde(default)]
    pub bundle_id: Option<String>,

    #[serde(default)]
    pub access_type: Option<String>,
}

/// Content creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContentRequest {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
}

/// Partial content update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
}

/// A vanity path assigned to a content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vanity {
    pub content_guid: String,
    pub path: String,
}

/// Vanity assignment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetVanityRequest {
    pub path: String,
}

/// An uploaded bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    #[serde(default)]
    pub content_guid: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Deploy request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    pub bundle_id: String,
}

/// Deploy response, carrying the task that performs the deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployResponse {
    pub task_id: String,
}

/// Task status, returned from long-polling a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    /// Output lines starting at the requested offset
    #[serde(default)]
    pub output: Vec<String>,

    #[serde(default)]
    pub finished: bool,

    /// Exit code, meaningful once finished
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub error: String,

    /// Offset to request on the next poll
    #[serde(default)]
    pub last: u64,
}

/// Environment variable assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: Option<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}
