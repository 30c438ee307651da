// SPDX-License-Identifier: MIT

//! HTTP-level tests for the Mountain Project gateway against a local
//! one-shot server.

use cragsync::error::AppError;
use cragsync::models::SourceCredential;
use cragsync::services::{MountainProjectClient, SourceGateway};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const EXPORT_BODY: &str = "\
Date,Route,Rating,Notes,URL,Pitches,Location,Style,Lead Style,Route Type,Length
2023-01-15,The Nose,5.9,,https://example.com/r/1,1,Yosemite > El Capitan,Lead,Onsight,Trad,80
";

/// Serve exactly one request with the given status line and body, then
/// return the server's base URL.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = [0u8; 2048];
        let _ = socket.read(&mut request).await;
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: text/csv\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("write response");
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_resolves_profile_against_base_url() {
    let base = serve_once("200 OK", EXPORT_BODY).await;
    let client = MountainProjectClient::new(base);

    let records = client.fetch_ticks("user/12345/jane-doe").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Route"], "The Nose");
}

#[tokio::test]
async fn test_gateway_fetches_absolute_profile_url() {
    let base = serve_once("200 OK", EXPORT_BODY).await;
    let client = MountainProjectClient::new("https://www.mountainproject.com");

    let credential = SourceCredential::ProfileUrl(format!("{}/user/12345/jane-doe", base));
    let records = client.fetch(&credential).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_forbidden_export_is_authentication_error() {
    let base = serve_once("403 Forbidden", "").await;
    let client = MountainProjectClient::new(base);

    let err = client.fetch_ticks("user/12345/jane-doe").await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
}

#[tokio::test]
async fn test_server_error_is_source_unavailable() {
    let base = serve_once("500 Internal Server Error", "").await;
    let client = MountainProjectClient::new(base);

    let err = client.fetch_ticks("user/12345/jane-doe").await.unwrap_err();
    assert!(matches!(err, AppError::SourceUnavailable(_)));
}
