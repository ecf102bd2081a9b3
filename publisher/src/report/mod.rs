//! Batch result reporting

use std::fmt::Write;

use colored::Colorize;
use serde::Serialize;

use crate::models::result::{Outcome, PublishResult};

/// Totals over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub all_succeeded: bool,
}

impl From<&[PublishResult]> for Summary {
    fn from(results: &[PublishResult]) -> Self {
        let mut summary = Summary {
            total: results.len(),
            ..Default::default()
        };
        for res in results {
            match res.outcome {
                Outcome::Success => summary.succeeded += 1,
                Outcome::Failure => summary.failed += 1,
                Outcome::Skipped => summary.skipped += 1,
            }
        }
        summary.all_succeeded = summary.failed == 0;
        summary
    }
}

/// Results as a compact JSON array
pub fn results_json(results: &[PublishResult]) -> String {
    serde_json::to_string(results).unwrap_or_else(|_| "[]".to_string())
}

/// Human readable report, one block per directory followed by the totals
pub fn render(results: &[PublishResult]) -> String {
    let mut out = String::new();

    for res in results {
        let symbol = match res.outcome {
            Outcome::Success => res.outcome.symbol().green(),
            Outcome::Failure => res.outcome.symbol().red(),
            Outcome::Skipped => res.outcome.symbol().dimmed(),
        };
        let url = if res.url.is_empty() { "-" } else { res.url.as_str() };
        let _ = writeln!(out, "{} {}", symbol, res.dir.bold());
        let _ = writeln!(out, "    id:  {}", res.app_id);
        let _ = writeln!(out, "    url: {}", url);
    }

    let summary = Summary::from(results);
    let totals = format!(
        "{} published, {} skipped, {} failed of {}",
        summary.succeeded, summary.skipped, summary.failed, summary.total
    );
    let _ = write!(
        out,
        "{}",
        if summary.all_succeeded {
            totals.green()
        } else {
            totals.red()
        }
    );

    out
}
