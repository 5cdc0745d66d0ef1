use crate::models::{PropertyPreview, SearchResults};
use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::{FetchSettings, SearchQuery};
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Script element holding the server-rendered page state
const NEXT_DATA_SELECTOR: &str = "script#__NEXT_DATA__";

/// Location of the search payload inside the page state
const HOME_SEARCH_POINTER: &str = "/props/pageProps/searchResults/home_search";

const FIRST_PAGE_SEGMENT: &str = "pg-1";

/// Outcome of parsing one search page
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPage {
    Listing(SearchResults),
    /// The page carries no embedded search data
    NotListing,
}

/// Everything collected by one paginated search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub pages: u32,
    /// Result count reported by the first page
    pub total: u32,
    /// Page 1 first, then later pages in the order they completed
    pub results: Vec<PropertyPreview>,
}

/// Paginated scraper for realtor.com search results
pub struct RealtorScraper {
    client: Client,
    query: SearchQuery,
    settings: FetchSettings,
}

impl RealtorScraper {
    /// Create a scraper around a caller-owned client
    pub fn with_client(client: Client, query: SearchQuery, settings: FetchSettings) -> Self {
        Self {
            client,
            query,
            settings,
        }
    }

    /// Fetch one search page, returning the URL it resolved to after redirects
    pub async fn fetch_search_page(&self, url: Url) -> ScrapeResult<(Url, SearchPage)> {
        debug!("Fetching URL: {}", url);

        let response = self.client.get(url).send().await?;
        let final_url = response.url().clone();

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status: {}", final_url, status);
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let html = response.text().await?;
        debug!("Downloaded {} bytes of HTML from {}", html.len(), final_url);

        Ok((final_url, parse_search(&html)?))
    }

    /// Fetch page 1 of the query
    ///
    /// A first page without search data fails the run, since neither the
    /// page count nor any results can be known.
    pub async fn fetch_first_page(&self) -> ScrapeResult<(Url, SearchResults)> {
        let url = Url::parse(&self.query.page_url(&self.settings.base_url, 1))?;

        match self.fetch_search_page(url).await? {
            (final_url, SearchPage::Listing(results)) => Ok((final_url, results)),
            (final_url, SearchPage::NotListing) => {
                warn!("Page {} is not a property listing page", final_url);
                Err(ScrapeError::NotListingPage {
                    url: final_url.to_string(),
                })
            }
        }
    }

    /// Fetch pages `2..=page_count` concurrently
    ///
    /// Pages are returned in the order their requests complete. At most
    /// `max_concurrent_pages` requests are in flight; the first failure
    /// drops the remaining requests.
    pub async fn fetch_remaining_pages(
        &self,
        first_url: &Url,
        page_count: u32,
    ) -> ScrapeResult<Vec<SearchResults>> {
        let urls = (2..=page_count)
            .map(|page| page_url(first_url, page))
            .collect::<ScrapeResult<Vec<_>>>()?;

        stream::iter(urls)
            .map(|url| self.fetch_listing_page(url))
            .buffer_unordered(self.settings.max_concurrent_pages.max(1))
            .try_collect()
            .await
    }

    async fn fetch_listing_page(&self, url: Url) -> ScrapeResult<SearchResults> {
        match self.fetch_search_page(url).await? {
            (_, SearchPage::Listing(results)) => {
                debug!("Page returned {} results", results.results.len());
                Ok(results)
            }
            (final_url, SearchPage::NotListing) => {
                warn!("Page {} is not a property listing page", final_url);
                Err(ScrapeError::NotListingPage {
                    url: final_url.to_string(),
                })
            }
        }
    }

    /// Run the full paginated search for the configured query
    pub async fn scrape_search(&self) -> ScrapeResult<SearchOutcome> {
        let query = &self.query;
        info!(
            "Scraping first result page for {}br {}ba {} in {}, {}",
            query.bedrooms, query.bathrooms, query.property_type, query.city, query.state
        );

        let (first_url, first_page) = self.fetch_first_page().await?;
        let pages = compute_page_count(first_page.total, first_page.count);
        let total = first_page.total;
        info!("Found {} total pages ({} total properties)", pages, total);

        let mut results = first_page.results;
        for page in self.fetch_remaining_pages(&first_url, pages).await? {
            results.extend(page.results);
        }

        if results.len() != total as usize {
            warn!(
                "Site reported {} properties but {} were collected",
                total,
                results.len()
            );
        }
        info!(
            "Scraped search of {} results for {}, {}",
            results.len(),
            query.city,
            query.state
        );

        Ok(SearchOutcome {
            pages,
            total,
            results,
        })
    }
}

#[async_trait]
impl ScraperTrait for RealtorScraper {
    async fn scrape(&self) -> Result<Vec<PropertyPreview>> {
        let outcome = self.scrape_search().await?;
        debug!(
            "{} pages fetched, {} properties reported",
            outcome.pages, outcome.total
        );
        Ok(outcome.results)
    }

    fn source_name(&self) -> &'static str {
        "realtor.com"
    }
}

/// Extract the embedded search payload from a search page
pub fn parse_search(html: &str) -> ScrapeResult<SearchPage> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(NEXT_DATA_SELECTOR).map_err(|e| ScrapeError::Selector(e.to_string()))?;

    let Some(script) = document.select(&selector).next() else {
        return Ok(SearchPage::NotListing);
    };
    let text = script.text().collect::<String>();
    if text.trim().is_empty() {
        return Ok(SearchPage::NotListing);
    }

    let mut data: Value = serde_json::from_str(&text)?;
    let home_search = data
        .pointer_mut(HOME_SEARCH_POINTER)
        .map(Value::take)
        .ok_or_else(|| ScrapeError::UnexpectedShape("home_search missing".to_string()))?;

    Ok(SearchPage::Listing(serde_json::from_value(home_search)?))
}

/// Number of result pages, `ceil(total / count)`
///
/// Never less than one: the first page has already been fetched, and an
/// empty or inconsistent first page means there is nothing further to ask for.
pub fn compute_page_count(total: u32, count: u32) -> u32 {
    if count == 0 {
        if total > 0 {
            warn!("First page reports {} results but a page size of 0", total);
        }
        return 1;
    }
    total.div_ceil(count).max(1)
}

/// Rewrite the `pg-1` path segment of the first page URL for another page
///
/// Works on the encoded path so escapes in other segments are kept as they are.
pub fn page_url(first_url: &Url, page: u32) -> ScrapeResult<Url> {
    let mut segments: Vec<&str> = first_url.path().split('/').collect();
    let position = segments
        .iter()
        .rposition(|segment| *segment == FIRST_PAGE_SEGMENT)
        .ok_or_else(|| ScrapeError::MissingPageSegment {
            url: first_url.to_string(),
        })?;

    let replacement = format!("pg-{page}");
    segments[position] = &replacement;

    let mut url = first_url.clone();
    url.set_path(&segments.join("/"));
    Ok(url)
}
