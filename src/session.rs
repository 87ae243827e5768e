//! Session-scoped page runner

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::browser::{Browser, ContextOptions, PageContext};
use crate::config::EngineConfig;
use crate::error::{ScraperError, ScraperResult};

/// One browser shared by every scraper of a factory.
///
/// Each [`with_page`](Self::with_page) call gets its own context, so
/// concurrent operations never share page state.
pub struct BrowserSession {
    browser: Arc<dyn Browser>,
    options: ContextOptions,
}

impl BrowserSession {
    pub fn new(browser: Arc<dyn Browser>, config: &EngineConfig) -> Self {
        Self {
            browser,
            options: ContextOptions {
                timeout: config.page_timeout,
                user_agent: config.user_agent.clone(),
                locale: None,
            },
        }
    }

    /// Runs `f` on a fresh page and closes the page on every exit path.
    ///
    /// `locale` becomes the page's `Accept-Language`. A token that is already
    /// cancelled once the page is open fails the call without running `f`.
    /// No retries happen here.
    pub async fn with_page<T>(
        &self,
        locale: &str,
        token: &CancellationToken,
        f: impl AsyncFnOnce(&mut dyn PageContext) -> ScraperResult<T>,
    ) -> ScraperResult<T> {
        let options = ContextOptions {
            locale: Some(locale.to_string()),
            ..self.options.clone()
        };
        let mut page = self.browser.open_context(&options).await?;

        let result = if token.is_cancelled() {
            Err(ScraperError::Cancelled)
        } else {
            f(page.as_mut()).await
        };

        if let Err(e) = page.close().await {
            warn!("failed to close page context: {e}");
        } else {
            debug!("page context closed");
        }

        result
    }
}
