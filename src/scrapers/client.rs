use crate::scrapers::types::FetchSettings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE};
use reqwest::{redirect, Client};

/// Desktop Chrome identity; the search pages block obvious bots outright
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

/// Headers sent with every request
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US;en;q=0.9"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers
}

/// Build the HTTP client shared by every page request of one run
pub fn browser_client(settings: &FetchSettings) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(browser_headers())
        .redirect(redirect::Policy::limited(settings.redirect_limit))
        .timeout(settings.request_timeout)
        .build()
        .context("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_look_like_a_browser() {
        let headers = browser_headers();
        assert_eq!(headers.len(), 3);
        assert!(headers[ACCEPT].to_str().unwrap().starts_with("text/html"));
        assert_eq!(headers[ACCEPT_ENCODING], "gzip, deflate, br");
    }

    #[test]
    fn client_builds_from_default_settings() {
        assert!(browser_client(&FetchSettings::default()).is_ok());
    }
}
