//! Small terminal tracker for weekly work hours. Tasks are logged into week buckets keyed by the
//! Monday each week starts on, and every week is measured against a fixed budget of hours.
//!

pub mod cli;
pub mod error;
pub mod fs;
pub mod ledger;
pub mod storage;
pub mod tracker;
pub mod utils;
