use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use listing_finder::ScraperError;
use listing_finder::browser::{Browser, ContextOptions, HttpBrowser, WaitUntil};

const PAGE: &str = r#"<html><body>
    <div data-cy="l-card"><a href="/d/oferta/a-IDa1.html"><h6>Rower</h6></a></div>
    <div data-cy="l-card"><a href="/d/oferta/b-IDa2.html"><h6>Hulajnoga</h6></a></div>
</body></html>"#;

fn options(locale: Option<&str>) -> ContextOptions {
    ContextOptions {
        timeout: Duration::from_secs(5),
        user_agent: "listing-finder-test".to_string(),
        locale: locale.map(str::to_string),
    }
}

#[tokio::test]
async fn navigates_and_queries_fetched_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oferty/"))
        .and(header("user-agent", "listing-finder-test"))
        .and(header("accept-language", "pl"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let browser = HttpBrowser::new().unwrap();
    let mut page = browser.open_context(&options(Some("pl"))).await.unwrap();
    page.navigate(&format!("{}/oferty/", server.uri()), WaitUntil::NetworkIdle)
        .await
        .unwrap();

    let cards = page.query_all(r#"div[data-cy="l-card"]"#).await.unwrap();
    let titles: Vec<&str> = cards.iter().map(|c| c.text()).collect();
    assert_eq!(titles, vec!["Rower", "Hulajnoga"]);

    let index = page
        .wait_for_any(&["[data-testid=\"listing-grid-empty\"]", "div[data-cy=\"l-card\"]"])
        .await
        .unwrap();
    assert_eq!(index, 1);

    page.close().await.unwrap();
    assert!(page.query_all("div").await.is_err());
}

#[tokio::test]
async fn missing_markup_times_out_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let browser = HttpBrowser::new().unwrap();
    let mut page = browser.open_context(&options(None)).await.unwrap();
    page.navigate(&server.uri(), WaitUntil::DomContentLoaded).await.unwrap();

    let err = page.wait_for_any(&["h1"]).await.unwrap_err();
    assert!(matches!(err, ScraperError::Timeout { timeout_ms: 5000, .. }), "{err:?}");
    assert_eq!(page.query("h1").await.unwrap().map(|e| e.text().to_string()), None);
}

#[tokio::test]
async fn error_status_is_a_navigation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let browser = HttpBrowser::new().unwrap();
    let mut page = browser.open_context(&options(Some("ro"))).await.unwrap();
    let err = page
        .navigate(&format!("{}/oferte/", server.uri()), WaitUntil::NetworkIdle)
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::Navigation { .. }), "{err:?}");
    assert!(err.to_string().contains("500"), "{err}");
}

#[tokio::test]
async fn slow_responses_hit_the_page_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let browser = HttpBrowser::new().unwrap();
    let short = ContextOptions {
        timeout: Duration::from_millis(100),
        ..options(None)
    };
    let mut page = browser.open_context(&short).await.unwrap();
    let err = page
        .navigate(&server.uri(), WaitUntil::NetworkIdle)
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::Timeout { timeout_ms: 100, .. }), "{err:?}");
}
