//! Step output

use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::filesys::file::File;
use crate::models::result::PublishResult;
use crate::report::results_json;

/// Name of the step output carrying the results
pub const RESULTS_KEY: &str = "results";

/// Where the results of a run are written
#[derive(Debug, Clone, Default)]
pub struct ResultsOutput {
    path: Option<PathBuf>,
}

impl ResultsOutput {
    /// Append to the file at `path`, or print to stdout when there is none
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Write `results=<json>` as one line
    pub async fn write(&self, results: &[PublishResult]) -> io::Result<()> {
        let line = format!("{}={}\n", RESULTS_KEY, results_json(results));
        match &self.path {
            Some(path) => {
                debug!("writing {} results to {:?}", results.len(), path);
                File::new(path).append_string(&line).await
            }
            None => {
                print!("{}", line);
                Ok(())
            }
        }
    }
}
