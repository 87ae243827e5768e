//! olx.pl: `/d/oferta/<slug>-CID<cat>-ID<token>.html`

use std::sync::LazyLock;

use regex::Regex;

static LISTING_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/d/oferta/[^/?#]*-(ID[0-9A-Za-z]+)\.html").expect("valid regex")
});

pub(super) fn parse_listing_id(url: &str) -> Option<String> {
    LISTING_ID_RE.captures(url).map(|caps| caps[1].to_string())
}

pub(super) fn id_search_path(listing_id: &str) -> String {
    format!("/oferty/q-{listing_id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_before_html_suffix() {
        assert_eq!(
            parse_listing_id("https://www.olx.pl/d/oferta/rower-gorski-CID767-IDabc12.html")
                .as_deref(),
            Some("IDabc12")
        );
    }

    #[test]
    fn search_pages_have_no_id() {
        assert_eq!(parse_listing_id("https://www.olx.pl/oferty/q-rower/"), None);
    }
}
