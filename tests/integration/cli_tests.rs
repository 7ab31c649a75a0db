//! Command-line tests for the `crawler` binary
//!
//! These run the built executable and check exit codes and output streams.

use std::process::{Command, Output};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crawler(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crawler"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run crawler binary")
}

#[test]
fn test_missing_arguments_exit_1() {
    let output = crawler(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_non_numeric_limits_exit_1() {
    assert_eq!(crawler(&["https://example.com", "ten", "2"]).status.code(), Some(1));
    assert_eq!(crawler(&["https://example.com", "10", "-3"]).status.code(), Some(1));
}

#[test]
fn test_invalid_configuration_exit_1() {
    assert_eq!(crawler(&["not a url", "10", "2"]).status.code(), Some(1));
    assert_eq!(crawler(&["ftp://example.com", "10", "2"]).status.code(), Some(1));
    assert_eq!(crawler(&["https://example.com", "0", "2"]).status.code(), Some(1));
}

#[test]
fn test_help_and_version_exit_0() {
    let help = crawler(&["--help"]);
    assert_eq!(help.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&help.stdout).contains("MAX_CONCURRENCY"));

    let version = crawler(&["--version"]);
    assert_eq!(version.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&version.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_report_on_stdout_and_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/">home</a></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.txt");
    let uri = server.uri();
    let report_arg = report_path.to_string_lossy().into_owned();

    let output = tokio::task::spawn_blocking(move || {
        crawler(&[uri.as_str(), "5", "2", "--output", report_arg.as_str(), "-q"])
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let host = server.uri().trim_start_matches("http://").to_string();
    assert!(stdout.contains(&format!("REPORT for {}", server.uri())));
    assert!(stdout.contains(&format!("Found 2 internal links to {}\n", host)));
    assert_eq!(std::fs::read_to_string(&report_path).unwrap(), stdout);
}
