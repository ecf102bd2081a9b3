//! Connect API wire models
//!
//! Request and response bodies for the subset of the Connect server API used
//! to publish content.

pub mod models;
