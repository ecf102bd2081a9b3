//! Deployment models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A submitted deployment, as returned by the deployment API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentHandle {
    /// Task performing the deployment. `None` when nothing was deployed.
    pub task_id: Option<String>,

    /// Numeric application id
    pub app_id: i64,

    /// Application GUID
    pub app_guid: String,

    /// URL the application is served from
    pub app_url: String,

    /// Application title
    pub title: String,

    /// Content was already up to date; no deployment was started
    pub no_op: bool,
}

/// Kind of a task status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskUpdateKind {
    /// Intermediate output
    Progress,

    /// The remote build or deploy step failed
    BuildFailed,

    /// The task finished successfully
    Complete,
}

impl TaskUpdateKind {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskUpdateKind::Complete)
    }
}

/// A unit of the task status stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub kind: TaskUpdateKind,

    /// Log lines carried by this update, in order
    pub lines: Vec<String>,
}

impl TaskUpdate {
    pub fn progress<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TaskUpdateKind::Progress, lines)
    }

    pub fn build_failed<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TaskUpdateKind::BuildFailed, lines)
    }

    pub fn complete<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TaskUpdateKind::Complete, lines)
    }

    fn new<I, S>(kind: TaskUpdateKind, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Who may view published content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// Anyone, no login required
    All,
    /// Any logged-in user
    LoggedIn,
    /// Only users on the access list
    Acl,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::All => "all",
            AccessType::LoggedIn => "logged_in",
            AccessType::Acl => "acl",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(AccessType::All),
            "logged_in" => Ok(AccessType::LoggedIn),
            "acl" => Ok(AccessType::Acl),
            _ => Err(format!("Invalid access type: {}", s)),
        }
    }
}

/// Options passed through to the deployment API with each submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Deploy even if the content is already up to date
    pub force: bool,

    /// Access policy to apply to the content
    pub access_type: Option<AccessType>,

    /// Fail when the identity cannot be claimed as a vanity path
    pub require_vanity_path: bool,
}
