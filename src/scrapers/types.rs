use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root of the realtor.com search pages
pub const REALTOR_SEARCH_BASE: &str = "https://www.realtor.com/realestateandhomes-search";

/// Search parameters for a property search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    pub city: String,
    /// Two letter state code, upper-cased in the URL
    pub state: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Listing type slug, e.g. `condo` or `single-family-home`
    pub property_type: String,
}

impl SearchQuery {
    /// Path of one result page, relative to the search base
    pub fn search_path(&self, page: u32) -> String {
        format!(
            "{}_{}/beds-{}/baths-{}/type-{}/pg-{}",
            self.city,
            self.state.to_uppercase(),
            self.bedrooms,
            self.bathrooms,
            self.property_type,
            page
        )
    }

    /// Full URL of one result page
    pub fn page_url(&self, base_url: &str, page: u32) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.search_path(page))
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            city: "Bakersfield".to_string(),
            state: "CA".to_string(),
            bedrooms: 3,
            bathrooms: 2,
            property_type: "condo".to_string(),
        }
    }
}

/// Transport and fan-out settings for a scrape run
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Search root the query path is appended to
    pub base_url: String,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Upper bound on result pages requested at the same time
    pub max_concurrent_pages: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: REALTOR_SEARCH_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 10,
            max_concurrent_pages: 8,
        }
    }
}
