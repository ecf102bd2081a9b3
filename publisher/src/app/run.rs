//! Action run

use tracing::{debug, error, info};

use crate::app::options::{ActionArgs, ActionOptions};
use crate::app::output::ResultsOutput;
use crate::deploy::publisher::Publisher;
use crate::errors::ActionError;
use crate::http::client::HttpClient;
use crate::models::result::{BatchOutcome, PublishResult};
use crate::report::render;

/// Publish every configured directory and write the results.
///
/// Results are written on every path: the full list when the batch ran,
/// an empty list when it never started.
pub async fn run(args: &ActionArgs) -> Result<BatchOutcome, ActionError> {
    let output = ResultsOutput::new(args.output_path());
    let result = publish(args).await;

    let results: &[PublishResult] = match &result {
        Ok(outcome) => outcome.results(),
        Err(ActionError::BatchFailure { outcome, .. }) => outcome.results(),
        Err(_) => &[],
    };
    info!("results:\n{}", render(results));

    if let Err(e) = output.write(results).await {
        error!("Unable to write results: {}", e);
        if result.is_ok() {
            return Err(e.into());
        }
    }

    result
}

async fn publish(args: &ActionArgs) -> Result<BatchOutcome, ActionError> {
    let options = ActionOptions::load(args)?;

    if let Some(dir) = &options.working_directory {
        debug!("changing to working directory {:?}", dir);
        std::env::set_current_dir(dir)?;
    }
    let base_dir = std::env::current_dir()?;

    let client = HttpClient::new(&options.credentials)
        .map_err(|e| ActionError::ConfigError(format!("unable to create HTTP client: {}", e)))?;
    info!(
        "publishing {} directories to {}",
        options.dirs.len(),
        client.base_url()
    );

    let publisher = Publisher::new(client, options.publish, base_dir);
    publisher.publish(&options.dirs).await
}
