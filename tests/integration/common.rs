use lead_ripple::config::UserAgentConfig;
use lead_ripple::crawler::{
    build_http_client, CrawlSession, CrawlSettings, HttpFetcher, RecordingSleeper, RetryPolicy,
    Throttle,
};
use lead_ripple::robots::RobotsGate;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/bot".to_string(),
        contact_email: "bot@example.com".to_string(),
    }
}

pub fn fetcher(sleeper: Arc<RecordingSleeper>, max_retries: u32) -> HttpFetcher {
    HttpFetcher::new(
        build_http_client(&agent()).expect("client"),
        RetryPolicy::default().with_max_retries(max_retries),
        sleeper,
    )
}

/// A session without politeness pauses and without retries
pub fn session(sleeper: Arc<RecordingSleeper>) -> CrawlSession {
    CrawlSession::new(
        fetcher(sleeper, 0),
        RobotsGate::new("TestBot", Duration::from_secs(5)),
        CrawlSettings::default(),
    )
    .with_throttle(Throttle::disabled())
}

pub fn html(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

pub async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

pub async fn mount_robots(server: &MockServer, content: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .mount(server)
        .await;
}

/// Paths the server was asked for, in order
pub async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}
