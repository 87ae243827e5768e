use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::domains::{Domain, list_supported_domains};
use crate::error::ScraperResult;
use crate::execution::{Tool, ToolInput, execute};
use crate::factory::ScraperFactory;
use crate::models::{MAX_LIMIT, SearchFilters, SearchResult, SortBy};

use super::args;

const MAX_TEXT_LEN: usize = 200;

/// Arguments of `search_listings` as sent by the caller.
///
/// Fields stay raw JSON until [`ToolInput::validate`] so type mismatches are
/// reported alongside every other violation.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchListingsArgs {
    /// Site to search.
    #[schemars(with = "Domain")]
    pub domain: Option<Value>,
    /// Free-text query.
    #[schemars(with = "Option<String>", length(min = 1, max = 200))]
    pub query: Option<Value>,
    /// Site category id.
    #[schemars(with = "Option<String>")]
    pub category: Option<Value>,
    /// City or region name.
    #[schemars(with = "Option<String>")]
    pub location: Option<Value>,
    #[schemars(with = "Option<f64>", range(min = 0))]
    pub min_price: Option<Value>,
    #[schemars(with = "Option<f64>", range(min = 0))]
    pub max_price: Option<Value>,
    /// Results page, 1 when omitted.
    #[schemars(with = "Option<i64>", range(min = 1))]
    pub page: Option<Value>,
    /// Listings to return, 20 when omitted.
    #[schemars(with = "Option<i64>", range(min = 1, max = 50))]
    pub limit: Option<Value>,
    #[schemars(with = "Option<SortBy>")]
    pub sort_by: Option<Value>,
}

impl ToolInput for SearchListingsArgs {
    type Validated = SearchFilters;

    fn validate(self) -> Result<SearchFilters, Vec<String>> {
        let mut violations = Vec::new();

        let domain = args::required("domain", self.domain, &mut violations);
        let domain = args::string("domain", domain, &mut violations).and_then(|raw| {
            let parsed = raw.parse::<Domain>().ok();
            if parsed.is_none() {
                violations.push(format!(
                    "domain: must be one of {}",
                    list_supported_domains()
                        .iter()
                        .map(|d| d.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            parsed
        });

        let query = args::string("query", self.query, &mut violations);
        let query = non_blank("query", query, &mut violations);
        let category = args::string("category", self.category, &mut violations);
        let category = non_blank("category", category, &mut violations);
        let location = args::string("location", self.location, &mut violations);
        let location = non_blank("location", location, &mut violations);
        if query.is_none() && category.is_none() && location.is_none() {
            violations.push("query: one of query, category or location is required".to_string());
        }

        let min_price = args::number("minPrice", self.min_price, &mut violations);
        let max_price = args::number("maxPrice", self.max_price, &mut violations);
        for (field, price) in [("minPrice", min_price), ("maxPrice", max_price)] {
            if let Some(price) = price
                && !(price.is_finite() && price >= 0.0)
            {
                violations.push(format!("{field}: must be a non-negative number"));
            }
        }
        if let (Some(min), Some(max)) = (min_price, max_price)
            && max < min
        {
            violations.push("maxPrice: must be greater than or equal to minPrice".to_string());
        }

        let page = args::integer("page", self.page, &mut violations).unwrap_or(1);
        if page < 1 {
            violations.push("page: must be at least 1".to_string());
        }
        let limit = args::integer("limit", self.limit, &mut violations).unwrap_or(20);
        if !(1..=i64::from(MAX_LIMIT)).contains(&limit) {
            violations.push(format!("limit: must be between 1 and {MAX_LIMIT}"));
        }

        let sort_by = match args::string("sortBy", self.sort_by, &mut violations) {
            None => Some(SortBy::Relevance),
            Some(raw) => SortBy::parse(&raw),
        };
        if sort_by.is_none() {
            violations.push(format!(
                "sortBy: must be one of {}",
                SortBy::ALL.map(SortBy::as_str).join(", ")
            ));
        }

        match (domain, sort_by) {
            (Some(domain), Some(sort_by)) if violations.is_empty() => Ok(SearchFilters {
                domain,
                query,
                category,
                location,
                min_price,
                max_price,
                page: u32::try_from(page).unwrap_or(u32::MAX),
                limit: u32::try_from(limit).unwrap_or(MAX_LIMIT),
                sort_by,
            }),
            _ => Err(violations),
        }
    }
}

fn non_blank(field: &str, value: Option<String>, violations: &mut Vec<String>) -> Option<String> {
    let value = value?.trim().to_string();
    if value.is_empty() {
        violations.push(format!("{field}: must not be blank"));
        None
    } else if value.chars().count() > MAX_TEXT_LEN {
        violations.push(format!("{field}: must be at most {MAX_TEXT_LEN} characters"));
        None
    } else {
        Some(value)
    }
}

/// `search_listings`: one page of search results from a site.
pub struct SearchListingsTool {
    factory: Arc<ScraperFactory>,
}

impl Tool for SearchListingsTool {
    const NAME: &'static str = "search_listings";
    const DESCRIPTION: &'static str =
        "Search classified ads on an OLX site by text, category or location with optional price range, sorting and paging.";

    type Input = SearchListingsArgs;
    type Output = SearchResult;
}

impl SearchListingsTool {
    pub fn new(factory: Arc<ScraperFactory>) -> Self {
        Self { factory }
    }

    pub async fn execute(&self, args: Value, token: Option<&CancellationToken>) -> ScraperResult<SearchResult> {
        execute::<SearchListingsArgs, _>(Self::NAME, args, token, async |filters, token| {
            self.factory
                .get_scraper(filters.domain)
                .scrape(&filters, token)
                .await
        })
        .await
    }
}
