//! In-memory browser serving canned HTML, plus page builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use listing_finder::browser::{Browser, ContextOptions, Document, Element, PageContext, WaitUntil};
use listing_finder::config::EngineConfig;
use listing_finder::{BrowserSession, ListingTools, ScraperError, ScraperFactory, ScraperResult};

#[derive(Default)]
struct State {
    pages: HashMap<String, String>,
    failures: HashMap<String, u32>,
    navigations: Vec<String>,
    cancel_on_navigate: Option<CancellationToken>,
    opened: usize,
    closed: usize,
}

#[derive(Clone, Default)]
pub struct FixtureBrowser {
    state: Arc<Mutex<State>>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, html: impl Into<String>) {
        self.state.lock().unwrap().pages.insert(url.to_string(), html.into());
    }

    /// The next `times` navigations to `url` fail.
    pub fn fail_first(&self, url: &str, times: u32) {
        self.state.lock().unwrap().failures.insert(url.to_string(), times);
    }

    /// Cancels `token` as soon as any page starts loading.
    pub fn cancel_on_navigate(&self, token: CancellationToken) {
        self.state.lock().unwrap().cancel_on_navigate = Some(token);
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn clear_navigations(&self) {
        self.state.lock().unwrap().navigations.clear();
    }

    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }
}

#[async_trait]
impl Browser for FixtureBrowser {
    async fn open_context(&self, _options: &ContextOptions) -> ScraperResult<Box<dyn PageContext>> {
        self.state.lock().unwrap().opened += 1;
        Ok(Box::new(FixturePage {
            state: Arc::clone(&self.state),
            document: None,
        }))
    }
}

struct FixturePage {
    state: Arc<Mutex<State>>,
    document: Option<Document>,
}

impl FixturePage {
    fn document(&self) -> ScraperResult<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| ScraperError::internal("fixture", "no page loaded"))
    }
}

#[async_trait]
impl PageContext for FixturePage {
    async fn navigate(&mut self, url: &str, _wait_until: WaitUntil) -> ScraperResult<()> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());
        if let Some(token) = &state.cancel_on_navigate {
            token.cancel();
        }

        if let Some(remaining) = state.failures.get_mut(url)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(ScraperError::navigation(url, "simulated network failure"));
        }

        match state.pages.get(url) {
            Some(html) => {
                self.document = Some(Document::new(html.clone()));
                Ok(())
            }
            None => Err(ScraperError::navigation(url, "HTTP 404 Not Found")),
        }
    }

    async fn wait_for_any(&mut self, selectors: &[&str]) -> ScraperResult<usize> {
        self.document()?
            .first_present(selectors)?
            .ok_or(ScraperError::Timeout {
                what: selectors.join(" | "),
                timeout_ms: 0,
            })
    }

    async fn query_all(&self, selector: &str) -> ScraperResult<Vec<Element>> {
        self.document()?.query_all(selector)
    }

    async fn close(&mut self) -> ScraperResult<()> {
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }
}

pub struct Engine {
    pub browser: FixtureBrowser,
    pub factory: Arc<ScraperFactory>,
    pub tools: ListingTools,
}

/// Engine over a fixture browser with retries but no backoff delays.
pub fn engine() -> Engine {
    let browser = FixtureBrowser::new();
    let config = EngineConfig::default().without_backoff();
    let session = Arc::new(BrowserSession::new(Arc::new(browser.clone()), &config));
    let factory = Arc::new(ScraperFactory::new(session, &config));
    let tools = ListingTools::new(Arc::clone(&factory));
    Engine {
        browser,
        factory,
        tools,
    }
}

pub fn card(href: &str, title: Option<&str>, price: &str, location_date: &str) -> String {
    let title = title.map(|t| format!("<h6>{t}</h6>")).unwrap_or_default();
    format!(
        r#"<div data-cy="l-card">
             <a href="{href}?reason=extended_search">{title}</a>
             <p data-testid="ad-price">{price}</p>
             <p data-testid="location-date">{location_date}</p>
             <img src="https://ireland.apollo.olxcdn.com/v1/files/{href}/image">
           </div>"#
    )
}

pub fn results_page(cards: &[String], total: Option<&str>, has_next: bool) -> String {
    let total = total
        .map(|t| format!(r#"<span data-testid="total-count">{t}</span>"#))
        .unwrap_or_default();
    let next = if has_next {
        r#"<a data-testid="pagination-forward" href="?page=2">next</a>"#
    } else {
        ""
    };
    format!(
        "<html><body>{total}<div data-testid=\"listing-grid\">{}</div>{next}</body></html>",
        cards.concat()
    )
}

pub fn no_results_page() -> String {
    r#"<html><body><div data-testid="listing-grid-empty">Nie znaleźliśmy ogłoszeń</div></body></html>"#
        .to_string()
}

pub fn detail_page(title: Option<&str>, seller_name: Option<&str>, verified: bool) -> String {
    let title = title
        .map(|t| format!(r#"<div data-cy="ad_title"><h4>{t}</h4></div>"#))
        .unwrap_or_default();
    let seller = seller_name
        .map(|n| format!(r#"<h4 data-testid="user-profile-user-name">{n}</h4><p data-testid="member-since">Na OLX od maj 2019</p>"#))
        .unwrap_or_default();
    let badge = if verified {
        r#"<span data-testid="verified-badge">Zweryfikowany</span>"#
    } else {
        ""
    };
    format!(
        r#"<html><body>
             {title}
             <div data-testid="ad-price-container"><h3>1 250 zł do negocjacji</h3></div>
             <div data-cy="ad_description"><div>Rama aluminiowa,
                 koła 29 cali.</div></div>
             <div data-testid="map-aside-section"><p>Kraków, Podgórze</p></div>
             <span data-cy="ad-posted-at">12 maja 2025</span>
             {seller}{badge}
           </body></html>"#
    )
}
