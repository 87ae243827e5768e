//! Classified-ad extraction across the OLX marketplaces.
//!
//! [`tools::ListingTools`] is the entry point: it validates raw JSON
//! arguments, picks the scraper for the requested site from a
//! [`factory::ScraperFactory`] and returns typed results. Pages are loaded
//! through a [`browser::Browser`], one isolated context per operation.

pub mod browser;
pub mod config;
pub mod domains;
pub mod error;
pub mod execution;
pub mod factory;
pub mod models;
pub mod retry;
pub mod scraper;
pub mod scrapers;
pub mod session;
pub mod tools;

pub use domains::{Domain, DomainConfig, get_config, is_supported, list_supported_domains};
pub use error::{ScraperError, ScraperResult};
pub use factory::ScraperFactory;
pub use models::{Listing, SearchFilters, SearchResult};
pub use scraper::BaseScraper;
pub use session::BrowserSession;
pub use tools::ListingTools;
