use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use listing_finder::browser::HttpBrowser;
use listing_finder::config::EngineConfig;
use listing_finder::{BrowserSession, ListingTools, ScraperFactory};

const USAGE: &str = "usage: listing-finder <search_listings|get_listing_details|tools> '<json arguments>'";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(tool) = args.next() else {
        bail!(USAGE);
    };

    if tool == "tools" {
        println!("{}", serde_json::to_string_pretty(&ListingTools::descriptors())?);
        return Ok(());
    }

    let raw_args = args.next().unwrap_or_else(|| "{}".to_string());
    let raw_args: serde_json::Value =
        serde_json::from_str(&raw_args).context("arguments must be a JSON object")?;

    let config = EngineConfig::from_env();
    let browser = Arc::new(HttpBrowser::new()?);
    let session = Arc::new(BrowserSession::new(browser, &config));
    let tools = ListingTools::new(Arc::new(ScraperFactory::new(session, &config)));

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted - cancelling");
            ctrl_c.cancel();
        }
    });

    match tools.call(&tool, raw_args, Some(&token)).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            error!("{tool} failed: {e}");
            bail!(e)
        }
    }
}
