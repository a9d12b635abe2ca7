use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use repo_report::error::FetchError;
use repo_report::github::{GithubClient, PrState, RepoSource, fetch_repo_data};
use repo_report::util::config::{GithubSettings, RepoTarget};

/// Canned response for one request path.
struct Route {
    path: &'static str,
    status: &'static str,
    body: &'static str,
}

/// Serve `routes` on a loopback port and record every request head.
async fn serve(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(routes);

    let recorded = seen.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        return;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let head = String::from_utf8_lossy(&buf).to_string();
                let path = head.split_whitespace().nth(1).unwrap_or("").to_string();
                recorded.lock().unwrap().push(head);

                let (status, body) = routes
                    .iter()
                    .find(|r| r.path == path)
                    .map(|r| (r.status, r.body))
                    .unwrap_or(("404 Not Found", r#"{"message":"Not Found"}"#));
                let resp = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), seen)
}

fn target() -> RepoTarget {
    RepoTarget::new("octo", "widgets").unwrap()
}

fn client(api_url: &str) -> GithubClient {
    let settings = GithubSettings {
        token: "secret-token".into(),
        api_url: api_url.into(),
        timeout: Duration::from_secs(5),
    };
    GithubClient::new(&settings, &target()).unwrap()
}

#[tokio::test]
async fn test_fetch_sends_auth_and_accept_headers() {
    let (url, seen) = serve(vec![Route {
        path: "/repos/octo/widgets/pulls?state=all",
        status: "200 OK",
        body: r#"[{"number":1,"title":"a","state":"open"}]"#,
    }])
    .await;

    let prs = client(&url).fetch_pull_requests().await.unwrap();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].state, PrState::Open);

    let requests = seen.lock().unwrap();
    let head = requests[0].to_lowercase();
    assert!(head.starts_with("get /repos/octo/widgets/pulls?state=all "));
    assert!(head.contains("authorization: token secret-token"));
    assert!(head.contains("accept: application/vnd.github.v3+json"));
}

#[tokio::test]
async fn test_fetch_data_returns_body_unchanged() {
    let (url, _) = serve(vec![Route {
        path: "/repos/octo/widgets/contributors",
        status: "200 OK",
        body: r#"[{"login":"alice","contributions":3,"extra":{"nested":true}}]"#,
    }])
    .await;

    let value = client(&url)
        .fetch_data("/repos/octo/widgets/contributors")
        .await
        .unwrap();
    assert_eq!(value[0]["login"], "alice");
    assert_eq!(value[0]["extra"]["nested"], true);
}

#[tokio::test]
async fn test_not_found_is_status_error() {
    let (url, _) = serve(vec![]).await;

    let err = client(&url).fetch_collaborators().await.unwrap_err();
    match err {
        FetchError::Status {
            url,
            status,
            status_text,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
            assert!(url.ends_with("/repos/octo/widgets/collaborators?affiliation=all"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let (url, _) = serve(vec![Route {
        path: "/repos/octo/widgets/pulls?state=all",
        status: "200 OK",
        body: "not json",
    }])
    .await;

    let err = client(&url).fetch_pull_requests().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_no_content_is_empty_list() {
    let (url, _) = serve(vec![Route {
        path: "/repos/octo/widgets/contributors",
        status: "204 No Content",
        body: "",
    }])
    .await;

    let contributors = client(&url).fetch_contributors().await.unwrap();
    assert!(contributors.is_empty());
}

#[tokio::test]
async fn test_fetch_repo_data_joins_all_three() {
    let (url, seen) = serve(vec![
        Route {
            path: "/repos/octo/widgets/pulls?state=all",
            status: "200 OK",
            body: r#"[{"state":"open"},{"state":"closed","merged_at":"2024-01-02T03:04:05Z"}]"#,
        },
        Route {
            path: "/repos/octo/widgets/contributors",
            status: "200 OK",
            body: r#"[{"login":"alice","contributions":7}]"#,
        },
        Route {
            path: "/repos/octo/widgets/collaborators?affiliation=all",
            status: "200 OK",
            body: r#"[{"login":"alice","permissions":{"admin":true,"push":true}},{"login":"bob"}]"#,
        },
    ])
    .await;

    let data = fetch_repo_data(&client(&url)).await.unwrap();
    assert_eq!(data.pull_requests.len(), 2);
    assert!(data.pull_requests[1].is_merged());
    assert_eq!(data.contributors[0].contributions, 7);
    assert!(data.collaborators[0].permissions.admin);
    assert!(!data.collaborators[1].permissions.admin);
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and hold the connection without answering.
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let settings = GithubSettings {
        token: "t".into(),
        api_url: format!("http://{addr}"),
        timeout: Duration::from_millis(200),
    };
    let client = GithubClient::new(&settings, &target()).unwrap();

    let err = client.fetch_pull_requests().await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }));
}
