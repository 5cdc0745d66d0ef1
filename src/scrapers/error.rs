use thiserror::Error;

/// Failures while scraping search result pages
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{url} is not a property listing page")]
    NotListingPage { url: String },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Failed to parse embedded page data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected page data shape: {0}")]
    UnexpectedShape(String),

    #[error("No pg-1 segment in {url}, cannot derive further pages")]
    MissingPageSegment { url: String },
}

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
