//! Browser-driver capability consumed by the scrapers.
//!
//! The engine only needs to open an isolated page, navigate it, wait for
//! markup, query elements and close it again. [`HttpBrowser`] is the bundled
//! driver; anything implementing [`Browser`] can replace it.

mod http;

use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::error::{ScraperError, ScraperResult};

pub use http::HttpBrowser;

/// Per-context settings applied by the session when a page is opened.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Bounds every navigation and element wait on the page.
    pub timeout: Duration,
    pub user_agent: String,
    /// `Accept-Language` tag, e.g. `pl`.
    pub locale: Option<String>,
}

/// Load state a navigation waits for before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    DomContentLoaded,
    NetworkIdle,
}

/// What to pull out of a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection<'a> {
    Text,
    Attr(&'a str),
}

/// A browser able to hand out isolated pages.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn open_context(&self, options: &ContextOptions) -> ScraperResult<Box<dyn PageContext>>;
}

/// One isolated page. Dropping it must release whatever it holds.
#[async_trait]
pub trait PageContext: Send + Sync {
    async fn navigate(&mut self, url: &str, wait_until: WaitUntil) -> ScraperResult<()>;

    /// Waits until any of `selectors` matches and returns its index.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Timeout`] when nothing matched within the page timeout.
    async fn wait_for_any(&mut self, selectors: &[&str]) -> ScraperResult<usize>;

    async fn query_all(&self, selector: &str) -> ScraperResult<Vec<Element>>;

    async fn query(&self, selector: &str) -> ScraperResult<Option<Element>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn close(&mut self) -> ScraperResult<()>;
}

/// Owned snapshot of a matched DOM node.
#[derive(Debug, Clone)]
pub struct Element {
    html: String,
    text: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    fn snapshot(el: ElementRef<'_>) -> Self {
        Self {
            html: el.html(),
            text: collapse_whitespace(&el.text().collect::<String>()),
            attrs: el
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Visible text with whitespace runs collapsed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Projects the first descendant matching `selector`.
    ///
    /// Empty text and empty attributes count as absent.
    pub fn extract(&self, selector: &str, projection: Projection<'_>) -> ScraperResult<Option<String>> {
        let selector = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.html);
        let value = fragment.select(&selector).next().and_then(|el| match projection {
            Projection::Text => Some(collapse_whitespace(&el.text().collect::<String>())),
            Projection::Attr(name) => el.value().attr(name).map(|v| v.trim().to_string()),
        });
        Ok(value.filter(|v| !v.is_empty()))
    }
}

/// A loaded HTML document that drivers without a live DOM query against.
#[derive(Debug, Clone)]
pub struct Document {
    html: String,
}

impl Document {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn query_all(&self, selector: &str) -> ScraperResult<Vec<Element>> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(document.select(&selector).map(Element::snapshot).collect())
    }

    /// Index of the first selector with at least one match.
    pub fn first_present(&self, selectors: &[&str]) -> ScraperResult<Option<usize>> {
        let document = Html::parse_document(&self.html);
        for (index, raw) in selectors.iter().enumerate() {
            let selector = parse_selector(raw)?;
            if document.select(&selector).next().is_some() {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

fn parse_selector(selector: &str) -> ScraperResult<Selector> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"
        <div data-cy="l-card" id="c1">
            <a href="/d/oferta/rower-CID767-IDabc12.html?reason=search">
                <h6>  Rower
                    górski </h6>
            </a>
            <img src="" data-src="//img.olx/1.jpg">
        </div>"#;

    #[test]
    fn element_snapshot_keeps_text_and_attributes() {
        let doc = Document::new(CARD);
        let cards = doc.query_all(r#"div[data-cy="l-card"]"#).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].attr("id"), Some("c1"));
        assert_eq!(cards[0].text(), "Rower górski");
    }

    #[test]
    fn extract_projects_text_and_attributes() {
        let card = Document::new(CARD).query_all("div").unwrap().remove(0);
        assert_eq!(
            card.extract("h6", Projection::Text).unwrap().as_deref(),
            Some("Rower górski")
        );
        assert_eq!(
            card.extract("a", Projection::Attr("href")).unwrap().as_deref(),
            Some("/d/oferta/rower-CID767-IDabc12.html?reason=search")
        );
        assert_eq!(card.extract("img", Projection::Attr("src")).unwrap(), None);
        assert_eq!(card.extract("h4", Projection::Text).unwrap(), None);
    }

    #[test]
    fn invalid_selector_is_reported() {
        let err = Document::new(CARD).query_all("div[[").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidSelector { .. }));
    }

    #[test]
    fn first_present_reports_the_matching_selector() {
        let doc = Document::new(r#"<p data-cy="no-results">Nic</p>"#);
        let found = doc
            .first_present(&[r#"div[data-cy="l-card"]"#, r#"[data-cy="no-results"]"#])
            .unwrap();
        assert_eq!(found, Some(1));
        assert_eq!(doc.first_present(&["table"]).unwrap(), None);
    }
}
