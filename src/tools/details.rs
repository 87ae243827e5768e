use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::domains::Domain;
use crate::error::ScraperResult;
use crate::execution::{Tool, ToolInput, execute};
use crate::factory::ScraperFactory;
use crate::models::Listing;

use super::args;

const MAX_LISTING_ID_LEN: usize = 100;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetListingDetailsArgs {
    #[schemars(with = "Domain")]
    pub domain: Option<Value>,
    /// Id as returned by `search_listings`.
    #[schemars(with = "String", length(min = 1, max = 100))]
    pub listing_id: Option<Value>,
    /// Accepted for compatibility; images are never downloaded.
    #[schemars(with = "Option<bool>")]
    pub include_images: Option<Value>,
    /// Accepted for compatibility; seller info is always attempted.
    #[schemars(with = "Option<bool>")]
    pub include_seller_info: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub domain: Domain,
    pub listing_id: String,
    pub include_images: bool,
    pub include_seller_info: bool,
}

impl ToolInput for GetListingDetailsArgs {
    type Validated = DetailRequest;

    fn validate(self) -> Result<DetailRequest, Vec<String>> {
        let mut violations = Vec::new();

        let domain = args::required("domain", self.domain, &mut violations);
        let domain = args::string("domain", domain, &mut violations).and_then(|raw| {
            raw.parse::<Domain>()
                .map_err(|e| violations.push(format!("domain: {e}")))
                .ok()
        });

        let listing_id = args::required("listingId", self.listing_id, &mut violations);
        let listing_id = args::string("listingId", listing_id, &mut violations)
            .map(|id| id.trim().to_string());
        match &listing_id {
            Some(id) if id.is_empty() => violations.push("listingId: must not be blank".to_string()),
            Some(id) if id.len() > MAX_LISTING_ID_LEN => {
                violations.push(format!("listingId: must be at most {MAX_LISTING_ID_LEN} characters"));
            }
            Some(id) if id.chars().any(char::is_whitespace) => {
                violations.push("listingId: must not contain whitespace".to_string());
            }
            _ => {}
        }

        let include_images = args::boolean("includeImages", self.include_images, &mut violations);
        let include_seller_info =
            args::boolean("includeSellerInfo", self.include_seller_info, &mut violations);

        match (domain, listing_id) {
            (Some(domain), Some(listing_id)) if violations.is_empty() => Ok(DetailRequest {
                domain,
                listing_id,
                include_images: include_images.unwrap_or(false),
                include_seller_info: include_seller_info.unwrap_or(true),
            }),
            _ => Err(violations),
        }
    }
}

/// `get_listing_details`: the full page of one listing.
pub struct GetListingDetailsTool {
    factory: Arc<ScraperFactory>,
}

impl Tool for GetListingDetailsTool {
    const NAME: &'static str = "get_listing_details";
    const DESCRIPTION: &'static str =
        "Fetch the full details of a listing, including description and seller, by the id returned from search_listings.";

    type Input = GetListingDetailsArgs;
    type Output = Listing;
}

impl GetListingDetailsTool {
    pub fn new(factory: Arc<ScraperFactory>) -> Self {
        Self { factory }
    }

    pub async fn execute(&self, args: Value, token: Option<&CancellationToken>) -> ScraperResult<Listing> {
        execute::<GetListingDetailsArgs, _>(Self::NAME, args, token, async |request, token| {
            self.factory
                .get_scraper(request.domain)
                .get_listing_details(&request.listing_id, token)
                .await
        })
        .await
    }
}
