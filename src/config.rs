//! # Engine Configuration
//!
//! Runtime knobs for the scraping engine: page timeout, retry policy and the
//! browser identity presented to the sites.
//!
//! ## Environment Configuration
//!
//! The library never reads the environment on its own. The binary calls
//! [`EngineConfig::from_env`], which understands:
//!
//! - `SCRAPER_PAGE_TIMEOUT_MS`: navigation and element-wait timeout
//! - `SCRAPER_MAX_ATTEMPTS`: attempts per page operation (first try included)
//! - `SCRAPER_BACKOFF_BASE_MS`: delay before the second attempt
//! - `SCRAPER_BACKOFF_CAP_MS`: upper bound for any single backoff delay
//! - `SCRAPER_USER_AGENT`: user agent sent with every page request
//!
//! Unset variables keep their defaults. Values that do not parse are logged
//! and ignored.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Settings shared by every scraper created from one session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound for a navigation or an element wait.
    pub page_timeout: Duration,
    /// Attempts per page operation, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for every further attempt.
    pub backoff_base: Duration,
    /// No single backoff delay exceeds this.
    pub backoff_cap: Duration,
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            backoff_cap: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from `SCRAPER_*` environment variables on top of
    /// the defaults.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use listing_finder::config::EngineConfig;
    ///
    /// // Works with or without any SCRAPER_* variable set
    /// let config = EngineConfig::from_env();
    /// assert!(config.max_attempts >= 1);
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = env_number::<u64>("SCRAPER_PAGE_TIMEOUT_MS") {
            config.page_timeout = Duration::from_millis(ms);
        }
        if let Some(attempts) = env_number::<u32>("SCRAPER_MAX_ATTEMPTS") {
            config.max_attempts = attempts.max(1);
        }
        if let Some(ms) = env_number::<u64>("SCRAPER_BACKOFF_BASE_MS") {
            config.backoff_base = Duration::from_millis(ms);
        }
        if let Some(ms) = env_number::<u64>("SCRAPER_BACKOFF_CAP_MS") {
            config.backoff_cap = Duration::from_millis(ms);
        }
        if let Ok(user_agent) = std::env::var("SCRAPER_USER_AGENT")
            && !user_agent.trim().is_empty()
        {
            config.user_agent = user_agent;
        }

        config
    }

    /// Same policy without any waiting between attempts.
    #[must_use]
    pub fn without_backoff(mut self) -> Self {
        self.backoff_base = Duration::ZERO;
        self.backoff_cap = Duration::ZERO;
        self
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{key}={raw:?} is not a valid number - keeping the default");
            None
        }
    }
}
