//! Action entry points

pub mod options;
pub mod output;
pub mod run;
