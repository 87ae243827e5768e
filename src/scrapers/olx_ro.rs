//! olx.ro: `/d/oferta/<slug>-ID<token>.html`, category id optional

use std::sync::LazyLock;

use regex::Regex;

static LISTING_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/d/oferta/[^/?#]*?-(ID[0-9A-Za-z]+)\.html").expect("valid regex")
});

pub(super) fn parse_listing_id(url: &str) -> Option<String> {
    LISTING_ID_RE.captures(url).map(|caps| caps[1].to_string())
}

pub(super) fn id_search_path(listing_id: &str) -> String {
    format!("/oferte/q-{listing_id}/")
}
