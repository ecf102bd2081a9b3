//! Action configuration options

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::warn;

use crate::authn::credentials::Credentials;
use crate::deploy::publisher::PublishOptions;
use crate::errors::ActionError;
use crate::logs::{LogLevel, LogOptions};
use crate::models::deployment::{AccessType, DeployOptions};
use crate::utils::parse_flag;

/// Directory published when none is configured
pub const DEFAULT_DIR: &str = ".";

/// Command line arguments. Each one can also be given as the `INPUT_*`
/// variable a CI runner sets for an action input.
#[derive(Parser, Debug, Clone)]
#[command(name = "connect-publish")]
#[command(version, about = "Publish content directories to a Connect server", long_about = None)]
pub struct ActionArgs {
    /// Server URL, optionally carrying the API key as its username or password
    #[arg(long, env = "INPUT_URL")]
    pub url: String,

    /// API key
    #[arg(long, env = "INPUT_API-KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Directories to publish, optionally as `<dir>:<identity>`
    #[arg(long = "dir", env = "INPUT_DIR", value_delimiter = '\n')]
    pub dirs: Vec<String>,

    /// Deploy even when the content is unchanged
    #[arg(long, env = "INPUT_FORCE", action = ArgAction::Set, value_parser = flag_value,
          num_args = 0..=1, default_value = "false", default_missing_value = "true")]
    pub force: bool,

    /// Show deployment task logs
    #[arg(long, env = "INPUT_SHOW-LOGS", action = ArgAction::Set, value_parser = flag_value,
          num_args = 0..=1, default_value = "false", default_missing_value = "true")]
    pub show_logs: bool,

    /// Update the content environment from each directory's `.env`
    #[arg(long, env = "INPUT_UPDATE-ENV", action = ArgAction::Set, value_parser = flag_value,
          num_args = 0..=1, default_value = "false", default_missing_value = "true")]
    pub update_env: bool,

    /// Fail when the vanity path cannot be claimed
    #[arg(long, env = "INPUT_REQUIRE-VANITY-PATH", action = ArgAction::Set, value_parser = flag_value,
          num_args = 0..=1, default_value = "false", default_missing_value = "true")]
    pub require_vanity_path: bool,

    /// Access type applied to published content (`all`, `logged_in`, `acl`)
    #[arg(long, env = "INPUT_ACCESS-TYPE")]
    pub access_type: Option<String>,

    /// Prefix for every published identity
    #[arg(long, env = "INPUT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Directory to change to before publishing
    #[arg(long, env = "INPUT_WORKING-DIRECTORY")]
    pub working_directory: Option<String>,

    /// File the results are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<String>,

    /// Log level
    #[arg(long, env = "INPUT_LOG-LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log as JSON lines
    #[arg(long, env = "INPUT_LOG-JSON", action = ArgAction::Set, value_parser = flag_value,
          num_args = 0..=1, default_value = "false", default_missing_value = "true")]
    pub log_json: bool,
}

fn flag_value(value: &str) -> Result<bool, String> {
    Ok(parse_flag(value))
}

/// Runners export unset inputs as empty strings
fn non_empty_path(value: Option<&str>) -> Option<PathBuf> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

impl ActionArgs {
    /// Results file, if one is configured
    pub fn output_path(&self) -> Option<PathBuf> {
        non_empty_path(self.output.as_deref())
    }

    /// Logging options. An unknown level falls back to the default.
    pub fn log_options(&self) -> LogOptions {
        let log_level = match self.log_level.trim() {
            "" => LogLevel::default(),
            level => level.parse().unwrap_or_else(|e| {
                eprintln!("{}, using {}", e, LogLevel::default().to_filter_string());
                LogLevel::default()
            }),
        };
        LogOptions {
            log_level,
            json_format: self.log_json,
        }
    }
}

/// Resolved action options
#[derive(Debug, Clone)]
pub struct ActionOptions {
    /// Server credentials
    pub credentials: Credentials,

    /// Directory specifications, in publish order
    pub dirs: Vec<String>,

    /// Publisher options
    pub publish: PublishOptions,

    /// Directory to change to before publishing
    pub working_directory: Option<PathBuf>,

    /// Results file
    pub output: Option<PathBuf>,
}

impl ActionOptions {
    /// Resolve options from the parsed arguments
    pub fn load(args: &ActionArgs) -> Result<Self, ActionError> {
        let credentials = Credentials::resolve(args.url.trim(), args.api_key.trim())?;

        let mut dirs: Vec<String> = args
            .dirs
            .iter()
            .map(|dir| dir.trim())
            .filter(|dir| !dir.is_empty())
            .map(str::to_string)
            .collect();
        if dirs.is_empty() {
            dirs.push(DEFAULT_DIR.to_string());
        }

        let access_type = args
            .access_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| match value.parse::<AccessType>() {
                Ok(access_type) => Some(access_type),
                Err(e) => {
                    warn!("ignoring access-type: {}", e);
                    None
                }
            });

        let namespace = args
            .namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(str::to_string);

        Ok(Self {
            credentials,
            dirs,
            publish: PublishOptions {
                deploy: DeployOptions {
                    force: args.force,
                    access_type,
                    require_vanity_path: args.require_vanity_path,
                },
                namespace,
                update_env: args.update_env,
                show_logs: args.show_logs,
            },
            working_directory: non_empty_path(args.working_directory.as_deref()),
            output: args.output_path(),
        })
    }
}
