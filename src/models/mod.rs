//! Data models for classified-ad listings and search requests

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::Domain;

/// Listings shown per results page, identical on every OLX site.
pub const PAGE_SIZE: u32 = 40;

pub const MAX_LIMIT: u32 = 50;

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Relevance,
    Date,
    PriceAsc,
    PriceDesc,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [Self::Relevance, Self::Date, Self::PriceAsc, Self::PriceDesc];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sort| sort.as_str() == raw)
    }
}

/// Validated search parameters for a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub domain: Domain,
    pub query: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortBy,
}

impl SearchFilters {
    /// Filters for a plain text search, everything else at its default.
    pub fn query(domain: Domain, query: impl Into<String>) -> Self {
        Self {
            domain,
            query: Some(query.into()),
            category: None,
            location: None,
            min_price: None,
            max_price: None,
            page: 1,
            limit: 20,
            sort_by: SortBy::Relevance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub amount: f64,
    pub currency: String,
    pub negotiable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_since: Option<String>,
}

/// A single classified ad, from a results card or a detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub domain: Domain,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerInfo>,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub listings: Vec<Listing>,
    pub total_count: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
}

impl SearchResult {
    /// Pagination summary for one results page.
    ///
    /// `total_pages` is derived from [`PAGE_SIZE`] and never drops below 1.
    pub fn paginate(listings: Vec<Listing>, total_count: u64, current_page: u32, has_next_page: bool) -> Self {
        let pages = total_count.div_ceil(u64::from(PAGE_SIZE)).max(1);
        Self {
            listings,
            total_count,
            current_page,
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
            has_next_page,
        }
    }
}
