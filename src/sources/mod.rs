//! Match listing sources
//!
//! - [`PageFetcher`] abstracts "HTML for a URL"
//! - [`HttpPageFetcher`] is the production implementation
//! - [`livesoccertv`] turns the listing site's pages into match records and
//!   raw channel mentions

pub mod http;
pub mod livesoccertv;
pub mod traits;

pub use http::HttpPageFetcher;
pub use traits::PageFetcher;
