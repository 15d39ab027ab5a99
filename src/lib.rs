pub mod delay;
pub mod logger;
pub mod query;
pub mod scraper;
pub mod view;
pub mod writer;

// Exporting types for convenience
pub use crate::query::{Query, QueryFilters, QueryOptions, SearchOptions};
pub use crate::scraper::{JobFetcher, JobRecord, LinkedinScraper, ScraperConfig};
pub use crate::view::JobView;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
