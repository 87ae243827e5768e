//! Search URL building and link resolution

use reqwest::Url;

use crate::domains::DomainConfig;
use crate::error::{ScraperError, ScraperResult};
use crate::models::{SearchFilters, SortBy};

/// Builds the results-page URL for `filters`.
///
/// Category, price bounds, sort and page only appear as query parameters
/// when set to something other than their defaults.
///
/// # Errors
///
/// [`ScraperError::Internal`] if the configured base URL does not parse.
pub fn build_search_url(config: &DomainConfig, filters: &SearchFilters) -> ScraperResult<String> {
    let patterns = &config.url_patterns;
    let path = patterns.search_path(filters.location.as_deref(), filters.query.as_deref());

    let mut url = Url::parse(config.base_url)
        .and_then(|base| base.join(&path))
        .map_err(|e| ScraperError::internal("search url", format!("{}{path}: {e}", config.base_url)))?;

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(category) = &filters.category {
        params.push((patterns.category_param, category.clone()));
    }
    if let Some(min_price) = filters.min_price {
        params.push((patterns.min_price_param, format_price(min_price)));
    }
    if let Some(max_price) = filters.max_price {
        params.push((patterns.max_price_param, format_price(max_price)));
    }
    if filters.sort_by != SortBy::Relevance
        && let Some(sort) = patterns.sort_value(filters.sort_by)
    {
        params.push((patterns.sort_param, sort.to_string()));
    }
    if filters.page > 1 {
        params.push((patterns.page_param, filters.page.to_string()));
    }

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url.into())
}

/// Resolves `href` against the site origin.
pub(crate) fn absolute_url(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = if href.starts_with("//") {
        Url::parse(&format!("https:{href}"))
    } else {
        Url::parse(base_url).and_then(|base| base.join(href))
    };
    resolved.ok().map(Into::into)
}

/// Canonical listing URL: absolute, without tracking query or fragment.
pub(crate) fn canonical_listing_url(base_url: &str, href: &str) -> Option<String> {
    let mut url = Url::parse(&absolute_url(base_url, href)?).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    Some(url.into())
}

fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
