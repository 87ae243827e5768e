//! olx.ua: `/d/uk/obyavlenie/<slug>-ID<token>.html`.
//!
//! Russian-language links drop the `uk/` part and older ones the `/d` prefix;
//! both still resolve, so both are accepted.

use std::sync::LazyLock;

use regex::Regex;

static LISTING_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/d)?/(?:uk/)?obyavlenie/[^/?#]*-(ID[0-9A-Za-z]+)\.html").expect("valid regex")
});

pub(super) fn parse_listing_id(url: &str) -> Option<String> {
    LISTING_ID_RE.captures(url).map(|caps| caps[1].to_string())
}

pub(super) fn id_search_path(listing_id: &str) -> String {
    format!("/uk/list/q-{listing_id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_current_and_legacy_paths() {
        for url in [
            "https://www.olx.ua/d/uk/obyavlenie/velosiped-IDUa7x2.html",
            "https://www.olx.ua/d/obyavlenie/velosiped-IDUa7x2.html",
            "https://www.olx.ua/obyavlenie/velosiped-IDUa7x2.html#a1b2",
        ] {
            assert_eq!(parse_listing_id(url).as_deref(), Some("IDUa7x2"), "{url}");
        }
    }

    #[test]
    fn id_search_uses_ukrainian_listing_path() {
        assert_eq!(id_search_path("IDUa7x2"), "/uk/list/q-IDUa7x2/");
    }
}
