//! connect-publish library
//!
//! Builds bundles from content directories and publishes them to a Connect
//! server, one directory at a time.

pub mod app;
pub mod authn;
pub mod bundle;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod report;
pub mod utils;
