//! End-to-end tests for the lead capture endpoints
//!
//! Drives the real server on an ephemeral port and asserts the externally
//! observable status codes and error strings.

use retreat_api::infra::Metrics;
use retreat_api::io::http;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

async fn spawn_server() -> (String, watch::Sender<bool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let metrics = Arc::new(Metrics::new());

    tokio::spawn(async move {
        // No CRM configured: accepted leads are logged locally
        let _ = http::serve(listener, metrics, None, shutdown_rx).await;
    });

    (format!("http://{addr}"), shutdown_tx)
}

#[tokio::test]
async fn test_contact_missing_name_returns_400() {
    let (base, _shutdown) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/contact"))
        .json(&serde_json::json!({"email": "test@example.com", "message": "Hi"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Name is required");
}

#[tokio::test]
async fn test_contact_without_crm_returns_dev_marker() {
    let (base, _shutdown) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/contact"))
        .json(&serde_json::json!({
            "name": "Maya Lindqvist",
            "email": "maya@example.com",
            "message": "I'd like to join the May retreat.",
            "retreatSlug": "amalfi-coastline"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["_dev"].as_str().unwrap().contains("GHL not configured"));
}

#[tokio::test]
async fn test_subscribe_invalid_email_returns_400() {
    let (base, _shutdown) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/subscribe"))
        .json(&serde_json::json!({"email": "notanemail"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid email format");
}

#[tokio::test]
async fn test_malformed_body_returns_500() {
    let (base, _shutdown) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/contact"))
        .header("Content-Type", "application/json")
        .body("this is not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_health_and_metrics() {
    let (base, _shutdown) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = client.get(format!("{base}/metrics")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains("retreat_leads_received_total"));
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (base, _shutdown) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{base}/api/nope")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (base, _shutdown) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, format!("{base}/api/subscribe"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers().get("Access-Control-Allow-Origin").unwrap(),
        "*"
    );
}
