//! Daily football TV digest
//!
//! Scrapes tomorrow's match schedule, maps each target-league match's
//! broadcasters onto a curated channel catalog, and publishes a grouped
//! digest to Telegram.

pub mod catalog;
pub mod config;
pub mod digest;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod publisher;
pub mod reconcile;
pub mod scheduler;
pub mod sources;
pub mod utils;
