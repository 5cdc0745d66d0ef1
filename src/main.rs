mod models;
mod output;
mod scrapers;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use output::OUTPUT_DIR;
use scrapers::client::browser_client;
use scrapers::types::{FetchSettings, SearchQuery};
use scrapers::{RealtorScraper, ScraperTrait};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scrape everything, then write it out. Nothing is written unless the scrape succeeded.
async fn run(scraper: &dyn ScraperTrait, output_dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    let properties = scraper
        .scrape()
        .await
        .with_context(|| format!("Scrape of {} failed", scraper.source_name()))?;

    info!("✅ Scraped {} properties", properties.len());

    for (i, property) in properties.iter().take(10).enumerate() {
        let id = property.property_id().unwrap_or_else(|| "unknown".to_string());
        let price = property
            .list_price()
            .map(|p| format!("${p:.0}"))
            .unwrap_or_else(|| "price n/a".to_string());
        println!("{}. {} ({})", i + 1, id, price);
        if let Some(permalink) = property.permalink() {
            println!("   {}", permalink);
        }
    }

    let path = output::write_results(output_dir, date, &properties).await?;
    info!("💾 Saved all properties to {}", path.display());

    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Home Scout - realtor.com search scraper");

    let settings = FetchSettings::default();
    let client = browser_client(&settings)?;
    let scraper = RealtorScraper::with_client(client, SearchQuery::default(), settings);

    run(&scraper, Path::new(OUTPUT_DIR), Local::now().date_naive()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyPreview;
    use async_trait::async_trait;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedScraper(Vec<&'static str>);

    #[async_trait]
    impl ScraperTrait for FixedScraper {
        async fn scrape(&self) -> Result<Vec<PropertyPreview>> {
            let previews = self
                .0
                .iter()
                .map(|id| serde_json::from_value(json!({"property_id": id, "list_price": 199_000})))
                .collect::<Result<Vec<PropertyPreview>, _>>()?;
            Ok(previews)
        }

        fn source_name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingScraper;

    #[async_trait]
    impl ScraperTrait for FailingScraper {
        async fn scrape(&self) -> Result<Vec<PropertyPreview>> {
            anyhow::bail!("blocked")
        }

        fn source_name(&self) -> &'static str {
            "failing"
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 2).unwrap()
    }

    #[tokio::test]
    async fn run_writes_dated_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");

        let path = run(&FixedScraper(vec!["a", "b"]), &dir, date())
            .await
            .unwrap();

        assert_eq!(path, dir.join("2024-11-02_homedata.json"));
        let written: Vec<PropertyPreview> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.len(), 2);
    }

    #[tokio::test]
    async fn failed_scrape_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");

        let err = run(&FailingScraper, &dir, date()).await.unwrap_err();

        assert!(err.to_string().contains("failing"));
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn search_page_without_listing_data_writes_nothing() {
        let server = MockServer::start().await;
        let settings = FetchSettings {
            base_url: format!("{}/realestateandhomes-search", server.uri()),
            ..FetchSettings::default()
        };
        let query = SearchQuery::default();
        Mock::given(method("GET"))
            .and(path(format!(
                "/realestateandhomes-search/{}",
                query.search_path(1)
            )))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><body><h1>Pardon our interruption</h1></body></html>",
                "text/html",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = browser_client(&settings).unwrap();
        let scraper = RealtorScraper::with_client(client, query, settings);
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");

        let err = run(&scraper, &dir, date()).await.unwrap_err();

        assert!(format!("{err:#}").contains("not a property listing page"));
        assert!(!dir.exists());
    }
}
