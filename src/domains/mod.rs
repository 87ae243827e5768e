//! Per-site configuration for the OLX marketplaces

mod registry;
mod slug;

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;
use crate::models::SortBy;

pub use slug::{SlugRules, slugify};

/// One locale variant of the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Domain {
    #[serde(rename = "olx.pl")]
    OlxPl,
    #[serde(rename = "olx.bg")]
    OlxBg,
    #[serde(rename = "olx.ro")]
    OlxRo,
    #[serde(rename = "olx.ua")]
    OlxUa,
    #[serde(rename = "olx.pt")]
    OlxPt,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Self::OlxPl,
        Self::OlxBg,
        Self::OlxRo,
        Self::OlxUa,
        Self::OlxPt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OlxPl => "olx.pl",
            Self::OlxBg => "olx.bg",
            Self::OlxRo => "olx.ro",
            Self::OlxUa => "olx.ua",
            Self::OlxPt => "olx.pt",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| ScraperError::UnsupportedDomain {
                domain: s.to_string(),
                supported: list_supported_domains()
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// CSS selectors for a results page and for each card on it.
#[derive(Debug, Clone, Copy)]
pub struct SearchSelectors {
    pub result_card: &'static str,
    pub title: &'static str,
    pub price: &'static str,
    /// Combined "location - date" line of a card.
    pub location: &'static str,
    pub image: &'static str,
    pub link: &'static str,
    pub next_page: &'static str,
    pub total_count: &'static str,
    pub no_results: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SellerSelectors {
    pub name: &'static str,
    pub verified_badge: &'static str,
    pub member_since: &'static str,
    pub phone: &'static str,
}

/// CSS selectors for a single listing page.
#[derive(Debug, Clone, Copy)]
pub struct DetailSelectors {
    pub title: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub location: &'static str,
    pub published_at: &'static str,
    pub seller: SellerSelectors,
}

#[derive(Debug, Clone, Copy)]
pub struct Selectors {
    pub search: SearchSelectors,
    pub detail: DetailSelectors,
}

/// How a site lays out its search URLs.
#[derive(Debug, Clone, Copy)]
pub struct UrlPatterns {
    /// Language prefix placed before every search path (`/uk` on olx.ua).
    pub path_prefix: &'static str,
    /// Segment used when no location narrows the search.
    pub listing_segment: &'static str,
    /// Prefix of the free-text segment, e.g. `q-`.
    pub query_prefix: &'static str,
    pub slug: SlugRules,
    pub min_price_param: &'static str,
    pub max_price_param: &'static str,
    pub category_param: &'static str,
    pub page_param: &'static str,
    pub sort_param: &'static str,
    /// Sort modes absent here (relevance) emit no sort parameter.
    pub sort_values: &'static [(SortBy, &'static str)],
}

impl UrlPatterns {
    /// Search path for an optional location and query.
    ///
    /// The query segment nests under the location segment when both are given;
    /// without a location it nests under the flat listing segment.
    pub fn search_path(&self, location: Option<&str>, query: Option<&str>) -> String {
        let location = location
            .map(|l| slugify(l, &self.slug))
            .filter(|s| !s.is_empty());
        let query = query
            .map(|q| slugify(q, &self.slug))
            .filter(|s| !s.is_empty());

        let mut path = format!(
            "{}/{}/",
            self.path_prefix,
            location.as_deref().unwrap_or(self.listing_segment)
        );
        if let Some(query) = query {
            path.push_str(self.query_prefix);
            path.push_str(&query);
            path.push('/');
        }
        path
    }

    pub fn sort_value(&self, sort: SortBy) -> Option<&'static str> {
        self.sort_values
            .iter()
            .find(|(mode, _)| *mode == sort)
            .map(|(_, value)| *value)
    }
}

/// Everything locale-specific about one site.
#[derive(Debug)]
pub struct DomainConfig {
    pub domain: Domain,
    pub name: &'static str,
    pub base_url: &'static str,
    pub currency: &'static str,
    pub language: &'static str,
    /// Lower-case text marking a price as negotiable.
    pub negotiable_marker: &'static str,
    /// Splits a card's "location - date" line.
    pub location_date_separator: &'static str,
    pub selectors: Selectors,
    pub url_patterns: UrlPatterns,
}

pub fn get_config(domain: Domain) -> &'static DomainConfig {
    registry::config_for(domain)
}

/// Looks up a config from an untrusted identifier.
///
/// # Errors
///
/// Returns [`ScraperError::UnsupportedDomain`] for anything outside the fixed set.
pub fn get_config_by_id(domain: &str) -> Result<&'static DomainConfig, ScraperError> {
    Ok(get_config(domain.parse()?))
}

pub fn list_supported_domains() -> &'static [Domain] {
    &Domain::ALL
}

pub fn is_supported(candidate: &str) -> bool {
    candidate.parse::<Domain>().is_ok()
}
