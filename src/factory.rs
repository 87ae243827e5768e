//! One scraper per site for the lifetime of a browser session

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::config::EngineConfig;
use crate::domains::{Domain, get_config};
use crate::error::ScraperResult;
use crate::retry::RetryPolicy;
use crate::scraper::BaseScraper;
use crate::session::BrowserSession;

pub struct ScraperFactory {
    session: Arc<BrowserSession>,
    retry: RetryPolicy,
    scrapers: Mutex<HashMap<Domain, Arc<BaseScraper>>>,
}

impl ScraperFactory {
    pub fn new(session: Arc<BrowserSession>, config: &EngineConfig) -> Self {
        Self {
            session,
            retry: RetryPolicy::from_config(config),
            scrapers: Mutex::new(HashMap::new()),
        }
    }

    /// Cached scraper for `domain`, created on first use.
    pub fn get_scraper(&self, domain: Domain) -> Arc<BaseScraper> {
        let mut scrapers = self.scrapers.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(scrapers.entry(domain).or_insert_with(|| {
            debug!("creating scraper for {domain}");
            Arc::new(BaseScraper::new(
                get_config(domain),
                Arc::clone(&self.session),
                self.retry,
            ))
        }))
    }

    /// Same as [`get_scraper`](Self::get_scraper) for an untrusted identifier.
    ///
    /// # Errors
    ///
    /// [`crate::ScraperError::UnsupportedDomain`] before anything is created.
    pub fn get_scraper_by_id(&self, domain: &str) -> ScraperResult<Arc<BaseScraper>> {
        Ok(self.get_scraper(domain.parse()?))
    }

    pub fn has_scraper(&self, domain: Domain) -> bool {
        self.scrapers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&domain)
    }

    /// Snapshot of the cached scrapers; later changes to the cache do not show.
    pub fn get_all_scrapers(&self) -> HashMap<Domain, Arc<BaseScraper>> {
        self.scrapers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forgets every cached scraper along with its URL cache.
    ///
    /// The browser session stays open; closing it is up to its owner.
    pub fn clear_cache(&self) {
        self.scrapers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
