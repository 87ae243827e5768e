//! Page driver backed by plain HTTP fetches and static DOM parsing

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{Browser, ContextOptions, Document, Element, PageContext, WaitUntil};
use crate::error::{ScraperError, ScraperResult};

/// Fetches pages with `reqwest` and queries them with `scraper`.
///
/// Each context keeps only its current document, so contexts are isolated
/// from each other while sharing one connection pool.
#[derive(Clone)]
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    /// # Errors
    ///
    /// Returns [`ScraperError::Network`] if the HTTP client cannot be built.
    pub fn new() -> ScraperResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn open_context(&self, options: &ContextOptions) -> ScraperResult<Box<dyn PageContext>> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            options: options.clone(),
            document: None,
        }))
    }
}

struct HttpPage {
    client: Client,
    options: ContextOptions,
    document: Option<Document>,
}

impl HttpPage {
    fn document(&self) -> ScraperResult<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| ScraperError::internal("page", "queried before any navigation"))
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.options.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

#[async_trait]
impl PageContext for HttpPage {
    async fn navigate(&mut self, url: &str, wait_until: WaitUntil) -> ScraperResult<()> {
        debug!("GET {url} ({wait_until:?})");

        let mut request = self
            .client
            .get(url)
            .timeout(self.options.timeout)
            .header(reqwest::header::USER_AGENT, &self.options.user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            );
        if let Some(locale) = &self.options.locale {
            request = request.header(reqwest::header::ACCEPT_LANGUAGE, locale);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ScraperError::Timeout {
                    what: url.to_string(),
                    timeout_ms: self.timeout_ms(),
                }
            } else {
                ScraperError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            self.document = None;
            return Err(ScraperError::navigation(url, format!("HTTP {status}")));
        }

        // The whole body is in once `text()` resolves, which is as idle as a
        // static fetch gets.
        let html = response.text().await?;
        self.document = Some(Document::new(html));
        Ok(())
    }

    async fn wait_for_any(&mut self, selectors: &[&str]) -> ScraperResult<usize> {
        // Nothing renders after the fetch, so absence now is absence for good.
        self.document()?
            .first_present(selectors)?
            .ok_or_else(|| ScraperError::Timeout {
                what: selectors.join(" | "),
                timeout_ms: self.timeout_ms(),
            })
    }

    async fn query_all(&self, selector: &str) -> ScraperResult<Vec<Element>> {
        self.document()?.query_all(selector)
    }

    async fn close(&mut self) -> ScraperResult<()> {
        self.document = None;
        Ok(())
    }
}
