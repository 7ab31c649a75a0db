//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_crawler::config::{build_config, load_http_config, Config, HttpConfig};
use site_crawler::crawler::{crawl, Coordinator};
use site_crawler::output::{format_report, write_report};
use std::collections::HashMap;
use std::io::Write;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML response linking to each of `links`
fn html_page(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>\n", href, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>\n{}</body></html>", anchors))
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Mounts a page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, route: &str, links: &[&str], times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(links))
        .expect(times)
        .mount(server)
        .await;
}

/// Creates a test configuration for a mock server
fn create_test_config(server: &MockServer, max_pages: usize, max_concurrency: usize) -> Config {
    build_config(&server.uri(), max_pages, max_concurrency, HttpConfig::default())
        .expect("mock server URI should be a valid base URL")
}

/// The page identity prefix of a mock server, e.g. "127.0.0.1:41234"
fn host_of(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

fn expected(entries: &[(String, usize)]) -> HashMap<String, usize> {
    entries.iter().cloned().collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_single_host() {
    let server = MockServer::start().await;
    let host = host_of(&server);

    mount_page(&server, "/", &["/a", "/b", "https://external.example/x"], 1).await;
    mount_page(&server, "/a", &["/", "/b"], 1).await;
    mount_page(&server, "/b", &["a"], 1).await;

    let config = create_test_config(&server, 10, 3);
    let coordinator = Coordinator::new(&config).unwrap();
    let outcome = coordinator.run().await.unwrap();

    assert_eq!(
        outcome.pages,
        expected(&[
            (host.clone(), 2),
            (format!("{}/a", host), 2),
            (format!("{}/b", host), 2),
        ])
    );
    assert_eq!(outcome.stats.pages_fetched, 3);
    assert!(outcome.stats.external_skipped >= 1);
    assert_eq!(coordinator.outstanding_work(), 0);
    assert_eq!(coordinator.budget_available(), 3);
}

#[tokio::test]
async fn test_failing_pages_are_counted_not_followed() {
    let server = MockServer::start().await;
    let host = host_of(&server);

    mount_page(&server, "/", &["/missing", "/data.json", "/ok"], 1).await;
    mount_page(&server, "/ok", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"links": ["/hidden"]}"#)
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 10, 2);
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.pages.len(), 4);
    assert_eq!(outcome.pages.get(&format!("{}/missing", host)), Some(&1));
    assert_eq!(outcome.pages.get(&format!("{}/data.json", host)), Some(&1));
    assert!(!outcome.pages.contains_key(&format!("{}/hidden", host)));
    assert_eq!(outcome.stats.fetch_failures, 2);
    assert_eq!(outcome.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_page_limit_stops_new_pages() {
    let server = MockServer::start().await;
    let host = host_of(&server);

    mount_page(&server, "/", &["/a", "/b"], 1).await;
    mount_page(&server, "/a", &["/"], 1).await;
    mount_page(&server, "/b", &[], 0).await;

    let config = create_test_config(&server, 2, 1);
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(
        outcome.pages,
        expected(&[(host.clone(), 2), (format!("{}/a", host), 1)])
    );
    assert_eq!(outcome.stats.limit_refused, 1);
}

#[tokio::test]
async fn test_unreachable_seed_produces_report() {
    let server = MockServer::start().await;
    let host = host_of(&server);

    let config = create_test_config(&server, 5, 2);
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.pages, expected(&[(host.clone(), 1)]));

    let report = format_report(&outcome.pages, &server.uri());
    assert!(report.contains(&format!("REPORT for {}", server.uri())));
    assert!(report.ends_with(&format!("Found 1 internal link to {}\n", host)));
}

#[tokio::test]
async fn test_report_written_to_file() {
    let server = MockServer::start().await;
    let host = host_of(&server);

    mount_page(&server, "/", &["/x", "/y", "/x"], 1).await;
    mount_page(&server, "/x", &["/y"], 1).await;
    mount_page(&server, "/y", &[], 1).await;

    let config = create_test_config(&server, 10, 1);
    let outcome = crawl(&config).await.unwrap();

    let report = format_report(&outcome.pages, &server.uri());
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.txt");
    write_report(&report, &report_path).unwrap();

    let written = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(written, report);

    let lines: Vec<&str> = written.lines().skip(4).collect();
    assert_eq!(
        lines,
        [
            format!("Found 2 internal links to {}/x", host),
            format!("Found 2 internal links to {}/y", host),
            format!("Found 1 internal link to {}", host),
        ]
    );
}

#[tokio::test]
async fn test_user_agent_from_config_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "census-bot/2.0"))
        .respond_with(html_page(&[]))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[http]\nuser-agent = \"census-bot/2.0\"\ntimeout-secs = 5\nconnect-timeout-secs = 2").unwrap();

    let http = load_http_config(file.path()).unwrap();
    assert_eq!(http.timeout_secs, 5);

    let config = build_config(&server.uri(), 5, 1, http).unwrap();
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stats.pages_fetched, 1);
    assert_eq!(outcome.stats.fetch_failures, 0);
}
