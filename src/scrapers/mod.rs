//! Locale-specific scraping procedures.
//!
//! Everything else about a site is data in [`crate::domains`]; only listing-id
//! parsing and the search-by-id path differ in code, dispatched on [`Domain`].

mod olx_bg;
mod olx_pl;
mod olx_pt;
mod olx_ro;
mod olx_ua;

use tracing::{debug, warn};

use crate::browser::{PageContext, Projection, WaitUntil};
use crate::domains::{Domain, DomainConfig};
use crate::error::{ScraperError, ScraperResult};
use crate::scraper::canonical_listing_url;

fn parse_listing_id(domain: Domain, url: &str) -> Option<String> {
    match domain {
        Domain::OlxPl => olx_pl::parse_listing_id(url),
        Domain::OlxBg => olx_bg::parse_listing_id(url),
        Domain::OlxRo => olx_ro::parse_listing_id(url),
        Domain::OlxUa => olx_ua::parse_listing_id(url),
        Domain::OlxPt => olx_pt::parse_listing_id(url),
    }
}

fn id_search_path(domain: Domain, listing_id: &str) -> String {
    match domain {
        Domain::OlxPl => olx_pl::id_search_path(listing_id),
        Domain::OlxBg => olx_bg::id_search_path(listing_id),
        Domain::OlxRo => olx_ro::id_search_path(listing_id),
        Domain::OlxUa => olx_ua::id_search_path(listing_id),
        Domain::OlxPt => olx_pt::id_search_path(listing_id),
    }
}

/// Listing id for `url`.
///
/// URLs that do not follow the site's listing pattern get a synthetic
/// `gen-<md5>` id so the listing is still returned. The same URL always maps
/// to the same id.
pub fn extract_listing_id(domain: Domain, url: &str) -> String {
    parse_listing_id(domain, url).unwrap_or_else(|| {
        debug!("no listing id in {url} - using a generated one");
        format!("gen-{:x}", md5::compute(url))
    })
}

/// Whether `url` points at a single listing rather than a results page.
pub fn is_listing_url(domain: Domain, url: &str) -> bool {
    parse_listing_id(domain, url).is_some()
}

/// Looks a listing up through the site search and returns its URL.
///
/// Returns an empty string when the listing cannot be located, including on
/// navigation failures; the caller decides what "not found" means.
pub async fn find_listing_url(
    config: &DomainConfig,
    listing_id: &str,
    page: &mut dyn PageContext,
) -> String {
    match locate_listing(config, listing_id, page).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            debug!("{listing_id} not present in {} search results", config.domain);
            String::new()
        }
        Err(e) => {
            warn!("lookup of {listing_id} on {} failed: {e}", config.domain);
            String::new()
        }
    }
}

async fn locate_listing(
    config: &DomainConfig,
    listing_id: &str,
    page: &mut dyn PageContext,
) -> ScraperResult<Option<String>> {
    let selectors = &config.selectors.search;
    let search_url = format!("{}{}", config.base_url, id_search_path(config.domain, listing_id));

    page.navigate(&search_url, WaitUntil::NetworkIdle).await?;
    match page.wait_for_any(&[selectors.result_card, selectors.no_results]).await {
        Ok(_) | Err(ScraperError::Timeout { .. }) => {}
        Err(e) => return Err(e),
    }

    let needle = format!("-{listing_id}.");
    for card in page.query_all(selectors.result_card).await? {
        let Some(href) = card.extract(selectors.link, Projection::Attr("href"))? else {
            continue;
        };
        if href.contains(&needle) {
            return Ok(canonical_listing_url(config.base_url, &href));
        }
    }
    Ok(None)
}
