mod common;

use common::{config_for, StubServer};
use repo_dashboard::config::RepoId;
use repo_dashboard::github::GitHubClient;
use repo_dashboard::DashboardError;
use std::net::TcpListener;

fn repo_id() -> RepoId {
    "octocat/hello-world".parse().unwrap()
}

#[tokio::test]
async fn test_html_gateway_error_keeps_status() {
    let server = StubServer::start(502, "text/html", "<html><body>Bad Gateway</body></html>");
    let client = GitHubClient::new(&server.config()).expect("Failed to create client");

    match client.fetch_repository(&repo_id()).await {
        Err(DashboardError::Transport { status, message }) => {
            assert_eq!(status, 502);
            assert!(message.contains("Bad Gateway"));
        }
        other => panic!("Expected Transport error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_failing_status_is_requested_once() {
    let server = StubServer::start(503, "text/plain", "Service Unavailable");
    let client = GitHubClient::new(&server.config()).expect("Failed to create client");

    let result = client.fetch_repository(&repo_id()).await;

    assert!(matches!(result, Err(DashboardError::Transport { status: 503, .. })));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_unknown_user_maps_to_transport_error() {
    let server = StubServer::start(
        404,
        "application/json",
        r#"{"message":"Not Found","documentation_url":"https://docs.github.com/rest"}"#,
    );
    let client = GitHubClient::new(&server.config()).expect("Failed to create client");

    match client.fetch_user_repositories("nobody").await {
        Err(DashboardError::Transport { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("Expected Transport error, got: {:?}", other),
    }
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_successful_listing_is_decoded() {
    let server = StubServer::start(
        200,
        "application/json",
        r#"[{"name":"hello-world","owner":{"login":"octocat"},"html_url":"https://github.com/octocat/hello-world"}]"#,
    );
    let client = GitHubClient::new(&server.config()).expect("Failed to create client");

    let repos = client
        .fetch_user_repositories("octocat")
        .await
        .expect("Failed to list repositories");

    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].owner_login, "octocat");
}

#[tokio::test]
async fn test_connection_refused_is_one_line() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("Failed to read address")
    };
    let client = GitHubClient::new(&config_for(addr)).expect("Failed to create client");

    match client.fetch_repository(&repo_id()).await {
        Err(DashboardError::Request(message)) => {
            assert!(!message.is_empty());
            assert!(!message.contains('\n'), "message spans lines: {:?}", message);
            assert!(!message.contains("Found at"));
        }
        other => panic!("Expected Request error, got: {:?}", other),
    }
}
