//! Deployment module

pub mod api;
pub mod identity;
pub mod publisher;
pub mod spec;
pub mod tracker;
