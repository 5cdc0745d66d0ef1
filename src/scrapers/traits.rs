use crate::models::PropertyPreview;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for property search scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Collect every listing preview matching the scraper's query
    async fn scrape(&self) -> Result<Vec<PropertyPreview>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
