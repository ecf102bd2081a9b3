//! connect-publish - Entry Point
//!
//! Publishes content directories to a Connect server from a CI job.

use std::env;
use std::process::ExitCode;

use clap::Parser;
use connect_publish::app::options::ActionArgs;
use connect_publish::app::run::run;
use connect_publish::logs::init_logging;
use connect_publish::utils::version_info;

use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = ActionArgs::parse();

    // Initialize logging
    let runner_debug = env::var("RUNNER_DEBUG").ok();
    let log_options = args.log_options().with_runner_debug(runner_debug.as_deref());
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let version = version_info();
    debug!(
        "connect-publish {} ({}, built {})",
        version.version, version.git_hash, version.build_time
    );

    match run(&args).await {
        Ok(outcome) => {
            info!("published {} directories", outcome.results().len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
