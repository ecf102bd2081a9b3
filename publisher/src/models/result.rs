//! Per-directory publish results

use serde::{Deserialize, Serialize};

/// Application id recorded when no application was ever resolved
pub const INVALID_APP_ID: i64 = -1;

/// Final state of one directory's publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Deployed and the task finished cleanly
    Success,

    /// Any error, or the remote build failed
    Failure,

    /// Content already up to date, nothing deployed
    Skipped,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Outcome::Success => "✔",
            Outcome::Failure => "✘",
            Outcome::Skipped => "-",
        }
    }
}

/// Result of publishing one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub dir: String,
    pub app_id: i64,
    pub url: String,
    pub outcome: Outcome,
}

impl PublishResult {
    /// A failure for a directory that never reached the server
    pub fn unresolved(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            app_id: INVALID_APP_ID,
            url: String::new(),
            outcome: Outcome::Failure,
        }
    }
}

/// Ordered results of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchOutcome {
    results: Vec<PublishResult>,
}

impl BatchOutcome {
    pub fn new(results: Vec<PublishResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[PublishResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<PublishResult> {
        self.results
    }

    /// Skipped results count as success
    pub fn all_succeeded(&self) -> bool {
        !self.results.iter().any(|res| res.outcome.is_failure())
    }

    pub fn failed_dirs(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|res| res.outcome.is_failure())
            .map(|res| res.dir.clone())
            .collect()
    }
}
