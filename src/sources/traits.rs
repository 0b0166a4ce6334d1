//! Page fetching abstraction
//!
//! The pipeline only needs "give me the HTML behind this URL"; keeping that
//! behind a trait lets tests drive the whole flow from in-memory pages.

use async_trait::async_trait;

use crate::errors::AppResult;

/// Retrieves rendered HTML for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body at `url`
    async fn fetch_page(&self, url: &str) -> AppResult<String>;
}
