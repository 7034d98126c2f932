//! Status endpoints, fallback routing, request ids and CORS.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;

use modred_backend::blockchain::IpRegistry;

mod common;
use common::MockRegistry;

#[tokio::test]
async fn test_index_lists_endpoints() {
    let server = common::spawn_server(common::test_config(), None).await;

    let res = common::client().get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "ModredIP Backend API");
    assert_eq!(body["status"], "running");
    assert_eq!(body["endpoints"]["register"], "/api/register");
}

#[tokio::test]
async fn test_health() {
    let mut config = common::test_config();
    config.listener.environment = "staging".to_string();
    let server = common::spawn_server(config, None).await;

    let res = common::client().get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "staging");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_readiness_follows_chain() {
    let server = common::spawn_server(common::test_config(), None).await;
    let res = common::client().get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["checks"]["blockchain"], false);
    assert_eq!(body["checks"]["yakoa"], true);

    let registry: Arc<dyn IpRegistry> = Arc::new(MockRegistry::default());
    let server = common::spawn_server(common::test_config(), Some(registry)).await;
    let res = common::client().get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["ipfs"], false);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = common::spawn_server(common::test_config(), None).await;

    for path in ["/nope", "/api/nope"] {
        let res = common::client().get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 404);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Not found");
        assert_eq!(body["message"], format!("Route {} not found", path));
    }
}

#[tokio::test]
async fn test_request_id_assigned_and_propagated() {
    let server = common::spawn_server(common::test_config(), None).await;
    let client = common::client();

    let res = client.get(server.url("/health")).send().await.unwrap();
    let id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(id.len(), 36);

    let res = client
        .get(server.url("/health"))
        .header("x-request-id", "caller-id-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "caller-id-1");
}

#[tokio::test]
async fn test_cors_allowlist_outside_development() {
    let mut config = common::test_config();
    config.listener.environment = "production".to_string();
    config.cors.frontend_url = Some("https://app.example.com/".to_string());
    let server = common::spawn_server(config, None).await;
    let client = common::client();

    let res = client
        .get(server.url("/health"))
        .header("origin", "https://app.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "https://app.example.com"
    );
    assert_eq!(res.headers().get("access-control-allow-credentials").unwrap(), "true");

    let res = client
        .get(server.url("/health"))
        .header("origin", "https://evil.example.com")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_mirrors_in_development() {
    let server = common::spawn_server(common::test_config(), None).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, server.url("/api/register"))
        .header("origin", "http://anything.local:8080")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "http://anything.local:8080"
    );
}

#[tokio::test]
async fn test_request_metrics_cover_fallback() {
    // Current-thread runtime: the server task sees this thread's recorder.
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let server = common::spawn_server(common::test_config(), None).await;
    let client = common::client();
    client.get(server.url("/health")).send().await.unwrap();
    client.get(server.url("/nope")).send().await.unwrap();

    let rendered = handle.render();
    let requests: Vec<&str> = rendered
        .lines()
        .filter(|l| l.starts_with("http_requests_total{"))
        .collect();
    assert!(requests
        .iter()
        .any(|l| l.contains(r#"path="/health""#) && l.contains(r#"status="200""#)));
    assert!(requests
        .iter()
        .any(|l| l.contains(r#"path="unmatched""#) && l.contains(r#"status="404""#)));
}
