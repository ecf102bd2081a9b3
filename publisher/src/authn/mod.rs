//! Authentication

pub mod credentials;
