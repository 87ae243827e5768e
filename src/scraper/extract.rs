//! Field extraction from result cards and listing pages

use std::sync::LazyLock;

use regex::Regex;

use crate::browser::{Element, Projection};
use crate::domains::DomainConfig;
use crate::models::Price;

use super::url::absolute_url;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:[ \u{a0}\u{202f}.]\d{3})+(?:,\d{1,2})?|\d+(?:[.,]\d{1,2})?")
        .expect("valid regex")
});

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:[ \u{a0}\u{202f}.,]\d{3})+|\d+").expect("valid regex"));

/// Raw fields of one result card.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CardFields {
    pub title: String,
    pub href: String,
    pub price: Option<Price>,
    pub location: Option<String>,
    pub published_at: Option<String>,
    pub image_url: Option<String>,
}

/// Reads a card, or `None` when its title or link is missing.
///
/// Every other field degrades to `None` on its own.
pub(crate) fn parse_card(config: &DomainConfig, card: &Element) -> Option<CardFields> {
    let selectors = &config.selectors.search;

    let title = card.extract(selectors.title, Projection::Text).ok().flatten()?;
    let href = card
        .extract(selectors.link, Projection::Attr("href"))
        .ok()
        .flatten()
        .or_else(|| card.attr("href").map(str::to_string))?;

    let price = card
        .extract(selectors.price, Projection::Text)
        .ok()
        .flatten()
        .and_then(|text| parse_price(config, &text));

    let (location, published_at) = card
        .extract(selectors.location, Projection::Text)
        .ok()
        .flatten()
        .map_or((None, None), |text| {
            split_location_date(&text, config.location_date_separator)
        });

    let image_url = image_source(card, selectors.image)
        .and_then(|src| absolute_url(config.base_url, &src.replace("{width}", "800")));

    Some(CardFields {
        title,
        href,
        price,
        location,
        published_at,
        image_url,
    })
}

// Lazy-loaded images keep the real source in data-src.
fn image_source(card: &Element, selector: &str) -> Option<String> {
    ["data-src", "src"].into_iter().find_map(|attr| {
        card.extract(selector, Projection::Attr(attr))
            .ok()
            .flatten()
            .filter(|src| !src.starts_with("data:"))
    })
}

/// Parses texts like `"1 234,50 zł"`, `"2.500 €"` or `"350 лв. Договаряне"`.
pub(crate) fn parse_price(config: &DomainConfig, text: &str) -> Option<Price> {
    let matched = AMOUNT_RE.find(text)?.as_str();
    let normalized: String = matched
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();

    // A dot followed by exactly three digits groups thousands; a comma or a
    // shorter dot fraction marks decimals.
    let normalized = match normalized.rsplit_once(['.', ',']) {
        Some((whole, fraction)) if fraction.len() == 3 && !normalized.contains(',') => {
            format!("{}{fraction}", whole.replace('.', ""))
        }
        Some((whole, fraction)) => format!("{}.{fraction}", whole.replace(['.', ','], "")),
        None => normalized,
    };

    let amount = normalized.parse::<f64>().ok()?;
    Some(Price {
        amount,
        currency: config.currency.to_string(),
        negotiable: text.to_lowercase().contains(config.negotiable_marker),
    })
}

/// Splits `"Warszawa, Mokotów - Dzisiaj o 12:30"` into location and date.
pub(crate) fn split_location_date(text: &str, separator: &str) -> (Option<String>, Option<String>) {
    let non_empty = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
    match text.rsplit_once(separator) {
        Some((location, date)) => (non_empty(location), non_empty(date)),
        None => (non_empty(text), None),
    }
}

/// First integer in a "found N listings" line; 0 when there is none.
pub(crate) fn parse_total_count(text: &str) -> u64 {
    INTEGER_RE
        .find(text)
        .map(|m| m.as_str().chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
