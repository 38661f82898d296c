//! 4byte directory client against a local HTTP server
//!
//! The server mimics the `/api/v1/signatures/` endpoint: it answers by
//! `hex_signature` and can be told to fail.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use alloy_primitives::Selector;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use vault_insights::domain::{sort_oldest_first, SignatureDirectory};
use vault_insights::infrastructure::{DirectoryOptions, FourByteDirectory};

async fn signatures(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("hex_signature").map(String::as_str) {
        Some("0x42966c68") => (
            StatusCode::OK,
            Json(json!({
                "count": 3,
                "results": [
                    { "id": 3, "created_at": "2021-09-14T02:21:55.372935Z", "text_signature": "collate_propagate_storage(bytes16)" },
                    { "id": 9, "text_signature": "undated(uint256)" },
                    { "id": 1, "created_at": "2018-05-12T21:11:49.484318Z", "text_signature": "burn(uint256)" }
                ]
            })),
        ),
        Some("0xdeadbeef") => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "down for maintenance" })),
        ),
        _ => (StatusCode::OK, Json(json!({ "count": 0, "results": [] }))),
    }
}

async fn serve() -> SocketAddr {
    let app = Router::new().route("/api/v1/signatures/", get(signatures));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

fn directory(addr: SocketAddr) -> FourByteDirectory {
    FourByteDirectory::new(DirectoryOptions {
        endpoint: format!("http://{addr}/api/v1/signatures/"),
        timeout: Some(Duration::from_secs(5)),
        ..DirectoryOptions::default()
    })
    .expect("client")
}

fn selector(hex_selector: &str) -> Selector {
    Selector::from_slice(&hex::decode(hex_selector).unwrap())
}

#[tokio::test]
async fn test_lookup_sorts_oldest_first() {
    let addr = serve().await;
    let mut entries = directory(addr)
        .lookup(None, selector("42966c68"))
        .await
        .expect("lookup");
    assert_eq!(entries.len(), 3);

    sort_oldest_first(&mut entries);
    let texts: Vec<&str> = entries.iter().map(|e| e.text_signature.as_str()).collect();
    assert_eq!(
        texts,
        vec!["burn(uint256)", "collate_propagate_storage(bytes16)", "undated(uint256)"]
    );
    assert!(entries[2].created_at.is_none());
}

#[tokio::test]
async fn test_non_2xx_is_an_error() {
    let addr = serve().await;
    let err = directory(addr)
        .lookup(None, selector("deadbeef"))
        .await
        .expect_err("503 must fail");
    assert!(err.to_string().contains("503"), "{err:#}");
}

#[tokio::test]
async fn test_empty_results() {
    let addr = serve().await;
    let entries = directory(addr)
        .lookup(None, selector("12345678"))
        .await
        .expect("lookup");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_per_network_endpoint() {
    let addr = serve().await;
    let mut options = DirectoryOptions {
        endpoint: "http://127.0.0.1:1/unreachable/".into(),
        ..DirectoryOptions::default()
    };
    options
        .network_endpoints
        .insert(1337, format!("http://{addr}/api/v1/signatures/"));
    let directory = FourByteDirectory::new(options).expect("client");

    let entries = directory
        .lookup(Some(1337), selector("42966c68"))
        .await
        .expect("lookup");
    assert_eq!(entries.len(), 3);
    assert!(directory.lookup(None, selector("42966c68")).await.is_err());
}
