//! Search providers and discovery feeding the coordinator

use crate::common::{html, mount_page, session};
use lead_ripple::crawler::{Coordinator, HarvestRequest, Pause, RecordingSleeper};
use lead_ripple::discovery::{
    BingProvider, DiscoveryError, SearchProvider, SerpApiProvider, SiteDiscovery,
};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_serpapi_sends_query_and_reads_organic_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google"))
        .and(query_param("q", "yacht charter Miami"))
        .and(query_param("api_key", "serp-key"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"link": "https://acme-yachts.com/fleet"},
                {"title": "no link here"},
                {"link": "https://blue-water.co.uk/"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = SerpApiProvider::new(Client::new(), "serp-key").with_base_url(server.uri());
    let links = provider.search("yacht charter Miami").await.unwrap();

    assert_eq!(
        links,
        vec![
            "https://acme-yachts.com/fleet".to_string(),
            "https://blue-water.co.uk/".to_string()
        ]
    );
}

#[tokio::test]
async fn test_bing_sends_key_header_and_reads_web_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v7.0/search"))
        .and(header("Ocp-Apim-Subscription-Key", "bing-key"))
        .and(query_param("q", "marina"))
        .and(query_param("count", "10"))
        .and(query_param("mkt", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webPages": {"value": [{"url": "https://marina.example.org/"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = BingProvider::new(Client::new(), "bing-key").with_base_url(server.uri());
    let links = provider.search("marina").await.unwrap();

    assert_eq!(links, vec!["https://marina.example.org/".to_string()]);
}

#[tokio::test]
async fn test_bing_without_web_pages_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_type": "SearchResponse"})))
        .mount(&server)
        .await;

    let provider = BingProvider::new(Client::new(), "bing-key").with_base_url(server.uri());
    assert!(provider.search("nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "garbage"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let provider = SerpApiProvider::new(Client::new(), "serp-key").with_base_url(server.uri());

    assert!(matches!(
        provider.search("broken").await,
        Err(DiscoveryError::Status(500))
    ));
    assert!(matches!(
        provider.search("garbage").await,
        Err(DiscoveryError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_failed_query_does_not_stop_discovery() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "charter Miami"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "charter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [{"link": "https://acme-yachts.com/"}, {"link": "not a url"}]
        })))
        .mount(&server)
        .await;

    let provider = SerpApiProvider::new(Client::new(), "serp-key").with_base_url(server.uri());
    let sleeper = Arc::new(RecordingSleeper::new());
    let discovery = SiteDiscovery::new(Some(Box::new(provider)), sleeper.clone());

    let found = discovery
        .discover(&["charter".to_string()], &["Miami".to_string()], 50)
        .await;

    assert_eq!(found.len(), 1);
    assert!(found.contains("https://acme-yachts.com/"));
    // One fixed pause after each of the two queries
    assert_eq!(sleeper.recorded().len(), 2);
}

#[tokio::test]
async fn test_discovered_site_becomes_a_lead() {
    let site = MockServer::start().await;
    mount_page(
        &site,
        "/",
        html(
            "Blue Water Charters",
            "<p>Bookings: charter@bluewater.example</p><p>Office address: 12 Harbour Rd, Miami</p>",
        ),
    )
    .await;

    let search = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [{"link": format!("{}/fleet?page=2", site.uri())}]
        })))
        .mount(&search)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let provider = SerpApiProvider::new(Client::new(), "serp-key").with_base_url(search.uri());
    let discovery = SiteDiscovery::new(Some(Box::new(provider)), sleeper.clone())
        .with_query_pause(Pause::none());
    let coordinator = Coordinator::new(session(sleeper), discovery);

    let request = HarvestRequest {
        keywords: vec!["charter".to_string()],
        regions: vec!["Miami".to_string()],
        seeds: vec![],
        target: 5,
        region_filter: Some("miami".to_string()),
        max_results: 20,
    };
    let report = coordinator.run(&request).await;

    assert_eq!(report.stats.candidates, 1);
    assert_eq!(report.leads.len(), 1);
    let lead = &report.leads[0];
    assert_eq!(lead.name, "Blue Water Charters");
    assert_eq!(lead.email, "charter@bluewater.example");
    assert_eq!(lead.website, site.uri());
    assert!(lead.location.contains("Harbour Rd"));
}
