//! Connect server HTTP client

pub mod client;
pub mod content;
pub mod deployer;
pub mod environment;
pub mod tasks;
