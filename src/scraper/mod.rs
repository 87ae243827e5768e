//! Search and detail retrieval shared by every site

mod extract;
mod url;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::browser::{PageContext, WaitUntil};
use crate::domains::{Domain, DomainConfig};
use crate::error::{ScraperError, ScraperResult};
use crate::models::{Listing, SearchFilters, SearchResult, SellerInfo};
use crate::retry::{RetryPolicy, retry};
use crate::scrapers;
use crate::session::BrowserSession;

pub use url::build_search_url;
pub(crate) use url::canonical_listing_url;

/// Scraper for one site.
///
/// Remembers the URL of every listing it has seen in search results so detail
/// lookups can skip the search-by-id round trip.
pub struct BaseScraper {
    config: &'static DomainConfig,
    session: Arc<BrowserSession>,
    retry: RetryPolicy,
    url_cache: RwLock<HashMap<String, String>>,
}

impl BaseScraper {
    pub fn new(config: &'static DomainConfig, session: Arc<BrowserSession>, retry: RetryPolicy) -> Self {
        Self {
            config,
            session,
            retry,
            url_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn domain(&self) -> Domain {
        self.config.domain
    }

    pub fn config(&self) -> &'static DomainConfig {
        self.config
    }

    /// URL last seen for `listing_id` in search results.
    pub fn cached_url(&self, listing_id: &str) -> Option<String> {
        self.url_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(listing_id)
            .cloned()
    }

    pub fn cached_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .url_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    fn remember_url(&self, listing_id: &str, url: &str) {
        self.url_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(listing_id.to_string(), url.to_string());
    }

    /// Runs one results page search, retrying page failures.
    ///
    /// An empty results page is a success with no listings.
    pub async fn scrape(&self, filters: &SearchFilters, token: &CancellationToken) -> ScraperResult<SearchResult> {
        let url = build_search_url(self.config, filters)?;
        info!("Searching {} (page {}): {url}", self.config.name, filters.page);

        let url = url.as_str();
        let result = retry(&self.retry, move || {
            self.session
                .with_page(self.config.language, token, async move |page| {
                    self.search_page(page, url, filters, token).await
                })
        })
        .await?;

        info!(
            "Found {} listings on {} ({} total, {} pages)",
            result.listings.len(),
            self.config.name,
            result.total_count,
            result.total_pages
        );
        Ok(result)
    }

    async fn search_page(
        &self,
        page: &mut dyn PageContext,
        url: &str,
        filters: &SearchFilters,
        token: &CancellationToken,
    ) -> ScraperResult<SearchResult> {
        let selectors = &self.config.selectors.search;

        page.navigate(url, WaitUntil::NetworkIdle).await?;
        settle(page, &[selectors.result_card, selectors.no_results]).await?;
        if token.is_cancelled() {
            return Err(ScraperError::Cancelled);
        }

        let limit = usize::try_from(filters.limit).unwrap_or(usize::MAX);
        let mut listings = Vec::new();
        for card in page.query_all(selectors.result_card).await? {
            if listings.len() >= limit {
                break;
            }

            let Some(fields) = extract::parse_card(self.config, &card) else {
                debug!("skipping result card without title or link");
                continue;
            };
            let Some(listing_url) = canonical_listing_url(self.config.base_url, &fields.href) else {
                debug!("skipping result card with unusable link {}", fields.href);
                continue;
            };

            let id = scrapers::extract_listing_id(self.config.domain, &listing_url);
            if scrapers::is_listing_url(self.config.domain, &listing_url) {
                self.remember_url(&id, &listing_url);
            }

            listings.push(Listing {
                id,
                domain: self.config.domain,
                title: fields.title,
                price: fields.price,
                location: fields.location,
                category: None,
                image_url: fields.image_url,
                url: listing_url,
                published_at: fields.published_at,
                description: None,
                seller: None,
                scraped_at: Utc::now(),
            });
        }

        let total_count = text_of(page, selectors.total_count)
            .await
            .map_or(0, |text| extract::parse_total_count(&text));
        let has_next_page = matches!(page.query(selectors.next_page).await, Ok(Some(_)));

        Ok(SearchResult::paginate(listings, total_count, filters.page, has_next_page))
    }

    /// Fetches the full listing page for `listing_id`.
    ///
    /// The URL comes from the search cache, or else from a search by id.
    /// Fields missing from the page are left empty; only page-level failures
    /// fail the call.
    ///
    /// # Errors
    ///
    /// [`ScraperError::NotFound`] when neither knows the listing.
    pub async fn get_listing_details(&self, listing_id: &str, token: &CancellationToken) -> ScraperResult<Listing> {
        let url = match self.cached_url(listing_id) {
            Some(url) => {
                debug!("{listing_id}: using cached URL {url}");
                url
            }
            None => {
                let found = self
                    .session
                    .with_page(self.config.language, token, async |page| {
                        Ok(scrapers::find_listing_url(self.config, listing_id, page).await)
                    })
                    .await?;
                if found.is_empty() {
                    return Err(ScraperError::NotFound {
                        listing_id: listing_id.to_string(),
                        domain: self.config.domain.to_string(),
                    });
                }
                found
            }
        };

        info!("Fetching listing {listing_id} from {url}");
        let url = url.as_str();
        retry(&self.retry, move || {
            self.session
                .with_page(self.config.language, token, async move |page| {
                    self.detail_page(page, url, listing_id, token).await
                })
        })
        .await
    }

    async fn detail_page(
        &self,
        page: &mut dyn PageContext,
        url: &str,
        listing_id: &str,
        token: &CancellationToken,
    ) -> ScraperResult<Listing> {
        let selectors = &self.config.selectors.detail;

        page.navigate(url, WaitUntil::NetworkIdle).await?;
        settle(page, &[selectors.title]).await?;
        if token.is_cancelled() {
            return Err(ScraperError::Cancelled);
        }

        let title = text_of(page, selectors.title).await.unwrap_or_else(|| {
            debug!("{listing_id}: no title on {url}");
            String::new()
        });
        let price = text_of(page, selectors.price)
            .await
            .and_then(|text| extract::parse_price(self.config, &text));
        let description = text_of(page, selectors.description).await;
        let location = text_of(page, selectors.location).await;
        let published_at = text_of(page, selectors.published_at).await;
        let seller = self.seller_info(page).await;

        Ok(Listing {
            id: listing_id.to_string(),
            domain: self.config.domain,
            title,
            price,
            location,
            category: None,
            image_url: None,
            url: url.to_string(),
            published_at,
            description,
            seller,
            scraped_at: Utc::now(),
        })
    }

    /// Seller block, omitted when it shows neither a name nor a badge.
    async fn seller_info(&self, page: &mut dyn PageContext) -> Option<SellerInfo> {
        let selectors = &self.config.selectors.detail.seller;

        let name = text_of(page, selectors.name).await;
        let verified = matches!(page.query(selectors.verified_badge).await, Ok(Some(_)));
        if name.is_none() && !verified {
            return None;
        }

        Some(SellerInfo {
            name,
            phone: text_of(page, selectors.phone).await,
            verified,
            member_since: text_of(page, selectors.member_since).await,
        })
    }
}

/// Waits for the page to show one of `selectors`. A timeout is not an error:
/// the page is read as it is.
async fn settle(page: &mut dyn PageContext, selectors: &[&str]) -> ScraperResult<()> {
    match page.wait_for_any(selectors).await {
        Ok(_) => Ok(()),
        Err(ScraperError::Timeout { what, .. }) => {
            debug!("none of [{what}] appeared - reading the page as is");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Text of the first match, `None` when absent, empty or unreadable.
async fn text_of(page: &dyn PageContext, selector: &str) -> Option<String> {
    match page.query(selector).await {
        Ok(Some(el)) => Some(el.text().to_string()).filter(|text| !text.is_empty()),
        Ok(None) => None,
        Err(e) => {
            debug!("could not read {selector}: {e}");
            None
        }
    }
}

