//! Centralized error handling for the matchday digest
//!
//! # Error Categories
//!
//! - **Configuration Errors**: missing channel lists, invalid settings
//! - **Source Errors**: listing-site connectivity and status failures
//! - **Publish Errors**: messaging API failures
//!
//! # Usage
//!
//! ```rust
//! use matchday_digest::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("cron expression is empty"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
