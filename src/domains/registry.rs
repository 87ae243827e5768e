use crate::models::SortBy;

use super::{
    DetailSelectors, Domain, DomainConfig, SearchSelectors, Selectors, SellerSelectors,
    SlugRules, UrlPatterns,
};

// All five sites run the same frontend, so the markup hooks are shared.
const OLX_SELECTORS: Selectors = Selectors {
    search: SearchSelectors {
        result_card: r#"div[data-cy="l-card"]"#,
        title: r#"[data-cy="ad-card-title"] h4, [data-cy="ad-card-title"] h6, h6"#,
        price: r#"[data-testid="ad-price"]"#,
        location: r#"[data-testid="location-date"]"#,
        image: "img",
        link: "a[href]",
        next_page: r#"[data-testid="pagination-forward"]"#,
        total_count: r#"[data-testid="total-count"]"#,
        no_results: r#"[data-testid="listing-grid-empty"], [data-cy="no-results"]"#,
    },
    detail: DetailSelectors {
        title: r#"[data-cy="ad_title"] h4, [data-testid="ad_title"] h4, h1"#,
        price: r#"[data-testid="ad-price-container"] h3"#,
        description: r#"[data-cy="ad_description"] div, [data-testid="ad_description"] div"#,
        location: r#"[data-testid="map-aside-section"] p"#,
        published_at: r#"[data-cy="ad-posted-at"]"#,
        seller: SellerSelectors {
            name: r#"[data-testid="user-profile-user-name"]"#,
            verified_badge: r#"[data-testid="trader-title"], [data-testid="verified-badge"]"#,
            member_since: r#"[data-testid="member-since"]"#,
            phone: r#"[data-testid="contact-phone"]"#,
        },
    },
};

const OLX_SORT_VALUES: &[(SortBy, &str)] = &[
    (SortBy::Date, "created_at:desc"),
    (SortBy::PriceAsc, "filter_float_price:asc"),
    (SortBy::PriceDesc, "filter_float_price:desc"),
];

const fn olx_patterns(
    path_prefix: &'static str,
    listing_segment: &'static str,
    slug: SlugRules,
) -> UrlPatterns {
    UrlPatterns {
        path_prefix,
        listing_segment,
        query_prefix: "q-",
        slug,
        min_price_param: "search[filter_float_price:from]",
        max_price_param: "search[filter_float_price:to]",
        category_param: "search[category_id]",
        page_param: "page",
        sort_param: "search[order]",
        sort_values: OLX_SORT_VALUES,
    }
}

const POLISH_SLUG: SlugRules = SlugRules {
    folds: &[
        ('ą', "a"),
        ('ć', "c"),
        ('ę', "e"),
        ('ł', "l"),
        ('ń', "n"),
        ('ó', "o"),
        ('ś', "s"),
        ('ź', "z"),
        ('ż', "z"),
    ],
    dropped: &[],
};

const ROMANIAN_SLUG: SlugRules = SlugRules {
    folds: &[
        ('ă', "a"),
        ('â', "a"),
        ('î', "i"),
        ('ș', "s"),
        ('ş', "s"),
        ('ț', "t"),
        ('ţ', "t"),
    ],
    dropped: &[],
};

const PORTUGUESE_SLUG: SlugRules = SlugRules {
    folds: &[
        ('á', "a"),
        ('à', "a"),
        ('â', "a"),
        ('ã', "a"),
        ('ç', "c"),
        ('é', "e"),
        ('ê', "e"),
        ('í', "i"),
        ('ó', "o"),
        ('ô', "o"),
        ('õ', "o"),
        ('ú', "u"),
        ('ü', "u"),
    ],
    dropped: &[],
};

const BULGARIAN_SLUG: SlugRules = SlugRules {
    folds: &[('ѝ', "и")],
    dropped: &[],
};

// Apostrophes sit inside Ukrainian words, so they vanish instead of splitting.
const UKRAINIAN_SLUG: SlugRules = SlugRules {
    folds: &[],
    dropped: &['\'', '\u{2019}', '\u{02bc}'],
};

static OLX_PL: DomainConfig = DomainConfig {
    domain: Domain::OlxPl,
    name: "OLX Polska",
    base_url: "https://www.olx.pl",
    currency: "PLN",
    language: "pl",
    negotiable_marker: "do negocjacji",
    location_date_separator: " - ",
    selectors: OLX_SELECTORS,
    url_patterns: olx_patterns("", "oferty", POLISH_SLUG),
};

static OLX_BG: DomainConfig = DomainConfig {
    domain: Domain::OlxBg,
    name: "OLX България",
    base_url: "https://www.olx.bg",
    currency: "BGN",
    language: "bg",
    negotiable_marker: "договаряне",
    location_date_separator: " - ",
    selectors: OLX_SELECTORS,
    url_patterns: olx_patterns("", "ads", BULGARIAN_SLUG),
};

static OLX_RO: DomainConfig = DomainConfig {
    domain: Domain::OlxRo,
    name: "OLX România",
    base_url: "https://www.olx.ro",
    currency: "RON",
    language: "ro",
    negotiable_marker: "negociabil",
    location_date_separator: " - ",
    selectors: OLX_SELECTORS,
    url_patterns: olx_patterns("", "oferte", ROMANIAN_SLUG),
};

static OLX_UA: DomainConfig = DomainConfig {
    domain: Domain::OlxUa,
    name: "OLX Україна",
    base_url: "https://www.olx.ua",
    currency: "UAH",
    language: "uk",
    negotiable_marker: "договірна",
    location_date_separator: " - ",
    selectors: OLX_SELECTORS,
    url_patterns: olx_patterns("/uk", "list", UKRAINIAN_SLUG),
};

static OLX_PT: DomainConfig = DomainConfig {
    domain: Domain::OlxPt,
    name: "OLX Portugal",
    base_url: "https://www.olx.pt",
    currency: "EUR",
    language: "pt",
    negotiable_marker: "negociável",
    location_date_separator: " - ",
    selectors: OLX_SELECTORS,
    url_patterns: olx_patterns("", "ads", PORTUGUESE_SLUG),
};

pub(super) fn config_for(domain: Domain) -> &'static DomainConfig {
    match domain {
        Domain::OlxPl => &OLX_PL,
        Domain::OlxBg => &OLX_BG,
        Domain::OlxRo => &OLX_RO,
        Domain::OlxUa => &OLX_UA,
        Domain::OlxPt => &OLX_PT,
    }
}
