//! Domain models

pub mod deployment;
pub mod environment;
pub mod manifest;
pub mod result;
