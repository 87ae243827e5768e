//! olx.bg: `/d/ad/<slug>-CID<cat>-ID<token>.html`

use std::sync::LazyLock;

use regex::Regex;

static LISTING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/ad/[^/?#]*-(ID[0-9A-Za-z]+)\.html").expect("valid regex"));

pub(super) fn parse_listing_id(url: &str) -> Option<String> {
    LISTING_ID_RE.captures(url).map(|caps| caps[1].to_string())
}

pub(super) fn id_search_path(listing_id: &str) -> String {
    format!("/ads/q-{listing_id}/")
}
