// src/services/scraper.rs

//! Rating scraper service.
//!
//! Fetches the configured listing page and extracts the star rating and
//! review count using fixed CSS selectors. A failed run leaves the cached
//! snapshot untouched; the widget keeps serving the last good value.

use std::sync::Arc;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{HttpConfig, RatingSelectors, RatingSnapshot};
use crate::storage::{ConfigStore, RatingStore};
use crate::utils::http;
use crate::utils::text::{parse_leading_float, parse_review_count};

/// Service that scrapes the listing page and persists the snapshot.
pub struct RatingScraper {
    client: reqwest::Client,
    selectors: RatingSelectors,
    config_store: Arc<dyn ConfigStore>,
    rating_store: Arc<dyn RatingStore>,
}

impl RatingScraper {
    /// Create a new scraper over the given stores.
    pub fn new(
        http_config: &HttpConfig,
        config_store: Arc<dyn ConfigStore>,
        rating_store: Arc<dyn RatingStore>,
    ) -> Result<Self> {
        Ok(Self {
            client: http::create_client(http_config)?,
            selectors: RatingSelectors::default(),
            config_store,
            rating_store,
        })
    }

    /// Scrape the configured listing page and persist the snapshot.
    ///
    /// Fails without a network call when no source URL is configured. The
    /// cached snapshot is only written on full success.
    pub async fn run(&self) -> Result<RatingSnapshot> {
        let config = self.config_store.get_config().await?;
        if config.source_url.is_empty() {
            return Err(AppError::config("Source URL is not set"));
        }

        let body = http::fetch_text(&self.client, &config.source_url).await?;

        // html5ever recovers from malformed markup, so parsing itself does
        // not fail; extraction fails when the target elements are missing.
        let snapshot = {
            let document = Html::parse_document(&body);
            self.extract(&document)?
        };

        self.rating_store.set(&snapshot).await?;
        Ok(snapshot)
    }

    /// Extract a fresh snapshot from a parsed listing page.
    fn extract(&self, document: &Html) -> Result<RatingSnapshot> {
        let compiled = self.selectors.compile()?;

        let rating_text =
            select_text(document, &compiled.rating, &self.selectors.rating_selector)?;
        let review_text = select_text(
            document,
            &compiled.review_count,
            &self.selectors.review_count_selector,
        )?;

        let rating = parse_leading_float(&rating_text);
        let review_count = parse_review_count(&review_text)?;

        Ok(RatingSnapshot::new(rating, review_count))
    }
}

/// Collect the text of the first element matching `selector`.
fn select_text(document: &Html, selector: &Selector, raw: &str) -> Result<String> {
    let element = document
        .select(selector)
        .next()
        .ok_or_else(|| AppError::extraction(format!("No element matches '{raw}'")))?;
    Ok(element.text().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use tempfile::TempDir;

    use crate::models::WidgetConfig;
    use crate::storage::LocalStorage;

    const LISTING_FIXTURE: &str = r#"<html><body>
        <h1>Example Extension</h1>
        <span class="Vq0ZA">4.7</span>
        <span class="qwG2Hd">1,234 ratings</span>
    </body></html>"#;

    fn test_http_config() -> HttpConfig {
        HttpConfig {
            user_agent: "test-agent".to_string(),
            timeout_secs: 5,
        }
    }

    fn scraper_for(storage: &Arc<LocalStorage>) -> RatingScraper {
        RatingScraper::new(&test_http_config(), storage.clone(), storage.clone()).unwrap()
    }

    async fn set_source_url(storage: &LocalStorage, url: &str) {
        storage
            .set_config(WidgetConfig {
                source_url: url.to_string(),
                ..WidgetConfig::default()
            })
            .await
            .unwrap();
    }

    /// Serve one canned HTTP response on a local socket.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/")
    }

    /// A URL whose port was just released, so connections are refused.
    fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }

    #[test]
    fn test_extract_reads_rating_and_review_count() {
        let tmp = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(tmp.path()));
        let scraper = scraper_for(&storage);

        let document = Html::parse_document(LISTING_FIXTURE);
        let snapshot = scraper.extract(&document).unwrap();

        assert_eq!(snapshot.rating, 4.7);
        assert_eq!(snapshot.review_count, 1234);
    }

    #[test]
    fn test_extract_fails_when_selector_misses() {
        let tmp = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(tmp.path()));
        let scraper = scraper_for(&storage);

        let document = Html::parse_document("<html><body><p>Nothing here</p></body></html>");
        let err = scraper.extract(&document).unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_extract_tolerates_malformed_markup() {
        let tmp = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(tmp.path()));
        let scraper = scraper_for(&storage);

        // Unclosed elements all over; the parser still recovers the spans.
        let html = r#"<body><div><span class="Vq0ZA">3.5</span>
            <td><span class="qwG2Hd">77 ratings</div>"#;
        let document = Html::parse_document(html);
        let snapshot = scraper.extract(&document).unwrap();

        assert_eq!(snapshot.rating, 3.5);
        assert_eq!(snapshot.review_count, 77);
    }

    #[tokio::test]
    async fn test_run_with_unset_url_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(tmp.path()));
        let scraper = scraper_for(&storage);

        let err = scraper.run().await.unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert!(RatingStore::get(storage.as_ref()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_run_preserves_snapshot_on_http_error() {
        let tmp = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(tmp.path()));

        let seeded = RatingSnapshot::new(4.2, 500);
        RatingStore::set(storage.as_ref(), &seeded).await.unwrap();

        let url = serve_once("HTTP/1.1 500 Internal Server Error", "");
        set_source_url(&storage, &url).await;

        let scraper = scraper_for(&storage);
        let err = scraper.run().await.unwrap_err();

        assert!(matches!(err, AppError::Fetch { .. }));
        let cached = RatingStore::get(storage.as_ref()).await.unwrap().unwrap();
        assert_eq!(cached, seeded);
    }

    #[tokio::test]
    async fn test_run_preserves_snapshot_on_connection_failure() {
        let tmp = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(tmp.path()));

        let seeded = RatingSnapshot::new(3.9, 42);
        RatingStore::set(storage.as_ref(), &seeded).await.unwrap();
        set_source_url(&storage, &dead_url()).await;

        let scraper = scraper_for(&storage);
        let err = scraper.run().await.unwrap_err();

        assert!(matches!(err, AppError::Fetch { .. }));
        let cached = RatingStore::get(storage.as_ref()).await.unwrap().unwrap();
        assert_eq!(cached, seeded);
    }

    #[tokio::test]
    async fn test_run_persists_snapshot_on_success() {
        let tmp = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(tmp.path()));

        let url = serve_once("HTTP/1.1 200 OK", LISTING_FIXTURE);
        set_source_url(&storage, &url).await;

        let scraper = scraper_for(&storage);
        let snapshot = scraper.run().await.unwrap();

        assert_eq!(snapshot.rating, 4.7);
        assert_eq!(snapshot.review_count, 1234);

        let cached = RatingStore::get(storage.as_ref()).await.unwrap().unwrap();
        assert_eq!(cached, snapshot);
    }
}
