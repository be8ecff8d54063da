// Scraper module: HTTP retrieval of dashboard pages and district discovery.

pub mod fetcher;
pub mod traits;

pub use fetcher::{discover_districts, is_error_page, DashboardFetcher};
pub use traits::Fetcher;
