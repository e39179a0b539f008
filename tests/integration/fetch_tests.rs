//! Network client and robots gate behavior

use crate::common::{fetcher, mount_robots};
use lead_ripple::crawler::{FetchOutcome, RecordingSleeper};
use lead_ripple::robots::RobotsGate;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_fetch_success_sends_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/bot; bot@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let outcome = fetcher(sleeper.clone(), 2)
        .fetch(&format!("{}/", server.uri()), TIMEOUT)
        .await;

    match outcome {
        FetchOutcome::Success {
            final_url,
            status_code,
            body,
        } => {
            assert_eq!(final_url, format!("{}/", server.uri()));
            assert_eq!(status_code, 200);
            assert_eq!(body, "hello");
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert!(sleeper.recorded().is_empty());
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let server = MockServer::start().await;
    let target = format!("{}/new", server.uri());
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let outcome = fetcher(Arc::new(RecordingSleeper::new()), 0)
        .fetch(&format!("{}/old", server.uri()), TIMEOUT)
        .await;

    match outcome {
        FetchOutcome::Success { final_url, body, .. } => {
            assert_eq!(final_url, format!("{}/new", server.uri()));
            assert_eq!(body, "moved");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let outcome = fetcher(sleeper.clone(), 2)
        .fetch(&format!("{}/flaky", server.uri()), TIMEOUT)
        .await;

    assert!(matches!(outcome, FetchOutcome::Success { status_code: 200, .. }));
    assert_eq!(sleeper.recorded(), vec![Duration::from_millis(600)]);
}

#[tokio::test]
async fn test_throttled_backoff_then_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let outcome = fetcher(sleeper.clone(), 2)
        .fetch(&format!("{}/busy", server.uri()), TIMEOUT)
        .await;

    match outcome {
        FetchOutcome::Unavailable { attempts, error } => {
            assert_eq!(attempts, 3);
            assert!(error.contains("429"));
        }
        other => panic!("expected unavailable, got {:?}", other),
    }
    // No pause after the final attempt
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
}

#[tokio::test]
async fn test_forbidden_counts_as_throttled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let outcome = fetcher(sleeper.clone(), 1)
        .fetch(&format!("{}/", server.uri()), TIMEOUT)
        .await;

    assert!(matches!(outcome, FetchOutcome::Unavailable { attempts: 2, .. }));
    assert_eq!(sleeper.recorded(), vec![Duration::from_secs(2)]);
}

#[tokio::test]
async fn test_connection_failure_backs_off_increasingly() {
    // Bind and drop a listener to get a port with nothing behind it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let sleeper = Arc::new(RecordingSleeper::new());
    let outcome = fetcher(sleeper.clone(), 2)
        .fetch(&format!("http://127.0.0.1:{}/", port), TIMEOUT)
        .await;

    assert!(matches!(outcome, FetchOutcome::Unavailable { attempts: 3, .. }));
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_millis(600), Duration::from_millis(1600)]
    );
}

#[tokio::test]
async fn test_robots_cached_per_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher(Arc::new(RecordingSleeper::new()), 2);
    let gate = RobotsGate::new("TestBot", TIMEOUT);
    let origin = format!("{}/", server.uri());

    assert!(gate.is_allowed(&fetcher, &origin, "/contact").await);
    assert!(!gate.is_allowed(&fetcher, &origin, "/private").await);
    assert!(!gate.is_allowed(&fetcher, &origin, "/private/page?x=1").await);
    assert_eq!(gate.cache().len(), 1);
}

#[tokio::test]
async fn test_robots_agent_specific_group() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: TestBot\nDisallow: /\n\nUser-agent: *\nAllow: /",
    )
    .await;

    let fetcher = fetcher(Arc::new(RecordingSleeper::new()), 0);
    let gate = RobotsGate::new("TestBot", TIMEOUT);
    assert!(!gate.is_allowed(&fetcher, &format!("{}/", server.uri()), "/").await);

    let other = RobotsGate::new("OtherBot", TIMEOUT);
    assert!(other.is_allowed(&fetcher, &format!("{}/", server.uri()), "/").await);
}

#[tokio::test]
async fn test_robots_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::new());
    let fetcher = fetcher(sleeper.clone(), 2);
    let gate = RobotsGate::new("TestBot", TIMEOUT);

    assert!(gate.is_allowed(&fetcher, &format!("{}/", server.uri()), "/anything").await);
    // robots.txt is fetched once, without retry pauses
    assert!(sleeper.recorded().is_empty());
}
