//! Domain crawl and harvest coordination end-to-end
//!
//! Mock servers all live on 127.0.0.1, so every server normalizes to the
//! same domain. Tests that need several distinct leads use one server.

use crate::common::{html, mount_page, mount_robots, requested_paths, session};
use lead_ripple::crawler::{Coordinator, HarvestRequest, RecordingSleeper};
use lead_ripple::discovery::SiteDiscovery;
use lead_ripple::state::{Lead, SkipReason, FALLBACK_LOCAL_PARTS};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coordinator() -> Coordinator {
    let sleeper = Arc::new(RecordingSleeper::new());
    Coordinator::new(session(sleeper.clone()), SiteDiscovery::new(None, sleeper))
}

fn request(seeds: Vec<String>, target: usize, region_filter: Option<&str>) -> HarvestRequest {
    HarvestRequest {
        keywords: vec![],
        regions: vec![],
        seeds,
        target,
        region_filter: region_filter.map(str::to_string),
        max_results: 200,
    }
}

/// A small site: phone on the home page, email and address on /contact
async fn mount_acme(server: &MockServer) {
    mount_page(
        server,
        "/",
        html(
            "Acme Yachts | Home",
            r#"<p>Call us on +1 (555) 123-4567</p>
               <a href="/team">Team</a>
               <a href="https://elsewhere.org/partner">Partner</a>"#,
        ),
    )
    .await;
    mount_page(
        server,
        "/contact",
        html(
            "Contact - Acme Yachts",
            "<p>Write to Sales@Acme.example</p><p>Headquarters: 100 Ocean Dr, Miami, FL 33139</p>",
        ),
    )
    .await;
    mount_page(server, "/team", html("Team", "<p>Our crew</p>")).await;
}

#[tokio::test]
async fn test_crawl_domain_collects_contacts() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /about").await;
    mount_acme(&server).await;

    let session = session(Arc::new(RecordingSleeper::new()));
    let lead = session
        .crawl_domain(&format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(lead.name, "Acme Yachts");
    assert_eq!(lead.website, server.uri());
    assert_eq!(lead.phone, "+1 (555) 123-4567");
    assert_eq!(lead.email, "sales@acme.example");
    assert!(lead.location.contains("Ocean Dr"));
    assert_eq!(lead.source_page, format!("{}/", server.uri()));

    let paths = requested_paths(&server).await;
    // Expansion followed the same-domain link found on the home page
    assert!(paths.contains(&"/team".to_string()));
    // Disallowed by robots.txt, never fetched
    assert!(!paths.iter().any(|p| p.starts_with("/about")));
    assert!(paths.contains(&"/en/about".to_string()));
    assert!(!paths.contains(&"/partner".to_string()));
    // robots.txt is fetched once for the whole crawl
    assert_eq!(paths.iter().filter(|p| *p == "/robots.txt").count(), 1);
}

#[tokio::test]
async fn test_crawl_stops_expanding_after_enough_emails() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(
            "Marina Group",
            r#"<p>info@marina.example, sales@marina.example</p><a href="/deep">Deep</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/deep", html("Deep", "")).await;

    let session = session(Arc::new(RecordingSleeper::new()));
    let lead = session
        .crawl_domain(&format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(lead.email, "info@marina.example");
    assert!(!requested_paths(&server).await.contains(&"/deep".to_string()));
}

#[tokio::test]
async fn test_unreachable_domain_still_produces_fallback_lead() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let start = format!("{}/", server.uri());
    let session = session(Arc::new(RecordingSleeper::new()));
    let lead = session.crawl_domain(&start).await.unwrap();

    assert_eq!(lead.website, server.uri());
    assert_eq!(lead.phone, "");
    assert_eq!(lead.location, "");
    assert_eq!(lead.source_page, start);
    assert!(!lead.name.is_empty());
    assert!(FALLBACK_LOCAL_PARTS
        .iter()
        .any(|local| lead.email == format!("{}@127.0.0.1", local)));
}

#[tokio::test]
async fn test_links_resolve_against_requested_url_after_redirect() {
    let server = MockServer::start().await;
    let moved = format!("{}/deep/home", server.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", moved.as_str()))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/deep/home",
        html("Harbour Works", r#"<a href="team">Team</a>"#),
    )
    .await;
    mount_page(&server, "/team", html("Team", "<p>hello@harbour.example</p>")).await;

    let session = session(Arc::new(RecordingSleeper::new()));
    let lead = session
        .crawl_domain(&format!("{}/", server.uri()))
        .await
        .unwrap();

    let paths = requested_paths(&server).await;
    assert!(paths.contains(&"/team".to_string()));
    assert!(!paths.contains(&"/deep/team".to_string()));
    assert_eq!(lead.email, "hello@harbour.example");
    assert_eq!(lead.source_page, format!("{}/team", server.uri()));
}

#[tokio::test]
async fn test_company_name_sources() {
    // Title too short to use: og:site_name wins
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><head><title>X</title><meta property="og:site_name" content="Acme Marine"></head><body></body></html>"#
            .to_string(),
    )
    .await;
    let session = session(Arc::new(RecordingSleeper::new()));
    let lead = session
        .crawl_domain(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert_eq!(lead.name, "Acme Marine");

    // No usable metadata anywhere: first label of the domain
    let bare = MockServer::start().await;
    mount_page(&bare, "/", "<html><body><p>Welcome</p></body></html>".to_string()).await;
    let lead = session
        .crawl_domain(&format!("{}/", bare.uri()))
        .await
        .unwrap();
    assert_eq!(lead.name, "127");
    assert!(lead.has_identity());
}

#[tokio::test]
async fn test_page_ceiling_is_respected() {
    let server = MockServer::start().await;
    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html("Link Farm", &links))
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let session = session(Arc::new(RecordingSleeper::new()));
    session
        .crawl_domain(&format!("{}/", server.uri()))
        .await
        .unwrap();

    let pages = requested_paths(&server)
        .await
        .into_iter()
        .filter(|p| p != "/robots.txt")
        .count();
    assert_eq!(pages, session.settings().max_pages);
}

#[tokio::test]
async fn test_duplicate_candidates_yield_one_lead() {
    let server = MockServer::start().await;
    mount_acme(&server).await;

    let seeds = vec![
        format!("{}/contact", server.uri()),
        format!("{}/team", server.uri()),
        format!("{}/", server.uri()),
    ];
    let report = coordinator().run(&request(seeds, 10, None)).await;

    assert_eq!(report.stats.candidates, 1);
    assert_eq!(report.leads.len(), 1);
    assert!(!report.stats.target_reached);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_second_root_of_produced_domain_is_skipped() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_acme(&first).await;
    mount_acme(&second).await;

    let seeds = vec![format!("{}/", first.uri()), format!("{}/", second.uri())];
    let report = coordinator().run(&request(seeds, 10, None)).await;

    assert_eq!(report.stats.candidates, 2);
    assert_eq!(report.leads.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].1, SkipReason::AlreadyProduced);
    assert_eq!(report.stats.skipped.get("already_produced"), Some(&1));
}

#[tokio::test]
async fn test_target_stops_iteration() {
    let mut servers = Vec::new();
    for _ in 0..5 {
        let server = MockServer::start().await;
        mount_acme(&server).await;
        servers.push(server);
    }
    let mut roots: Vec<String> = servers.iter().map(|s| format!("{}/", s.uri())).collect();
    roots.sort();

    let report = coordinator()
        .run(&request(roots.clone(), 1, None))
        .await;

    assert_eq!(report.leads.len(), 1);
    assert_eq!(report.stats.processed, 1);
    assert!(report.stats.target_reached);
    assert_eq!(report.leads[0].website, roots[0].trim_end_matches('/'));

    for server in &servers {
        let root = format!("{}/", server.uri());
        let touched = !requested_paths(server).await.is_empty();
        assert_eq!(touched, root == roots[0], "unexpected traffic on {}", root);
    }
}

#[tokio::test]
async fn test_region_filter() {
    let server = MockServer::start().await;
    mount_acme(&server).await;
    let seeds = vec![format!("{}/", server.uri())];

    let report = coordinator()
        .run(&request(seeds.clone(), 10, Some("monaco")))
        .await;
    assert!(report.leads.is_empty());
    assert_eq!(report.skipped[0].1, SkipReason::RegionMismatch);

    let report = coordinator()
        .run(&request(seeds.clone(), 10, Some("MIAMI")))
        .await;
    assert_eq!(report.leads.len(), 1);

    let report = coordinator()
        .run(&request(seeds, 10, Some("(unclosed")))
        .await;
    assert_eq!(report.leads.len(), 1);
}

#[tokio::test]
async fn test_progress_reports_every_candidate() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_acme(&first).await;
    mount_acme(&second).await;

    let seeds = vec![format!("{}/", first.uri()), format!("{}/", second.uri())];
    let mut calls: Vec<(usize, usize, Option<Lead>)> = Vec::new();
    coordinator()
        .run_with_progress(&request(seeds, 10, None), |done, total, lead| {
            calls.push((done, total, lead.cloned()))
        })
        .await;

    assert_eq!(calls.len(), 2);
    assert_eq!((calls[0].0, calls[0].1), (1, 2));
    assert!(calls[0].2.is_some());
    assert_eq!((calls[1].0, calls[1].1), (2, 2));
    assert!(calls[1].2.is_none());
}
