//! End-to-end tests for `POST /api/register`.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::{json, Value};

use modred_backend::blockchain::IpRegistry;

mod common;
use common::{MockRegistry, WriteMode, CONTRACT};

fn register_body() -> Value {
    json!({
        "ipHash": "ipfs://QmHash",
        "metadata": json!({
            "name": "Sunset",
            "description": "A photo",
            "creator": "0xD4A6166D966F4821CE8658807466DD0B0BB92AE9"
        }).to_string(),
        "isEncrypted": false,
        "modredIpContractAddress": CONTRACT,
    })
}

#[tokio::test]
async fn test_register_new_asset() {
    let yakoa = MockServer::start_async().await;
    let token = yakoa
        .mock_async(|when, then| {
            when.method(POST)
                .path("/token")
                .header("x-api-key", "test-yakoa-key")
                .json_body_partial(
                    r#"{
                        "id": "0x8f0a1ac6ca4f8cb0417112069c0f4dc93b9f0217:7",
                        "creator_id": "0xd4a6166d966f4821ce8658807466dd0b0bb92ae9",
                        "license_parents": []
                    }"#,
                );
            then.status(200)
                .json_body(json!({ "id": "0x8f0a1ac6ca4f8cb0417112069c0f4dc93b9f0217:7" }));
        })
        .await;

    let mut config = common::test_config();
    config.yakoa.base_url = Some(yakoa.base_url());
    let registry: Arc<dyn IpRegistry> = Arc::new(MockRegistry::minting(7));
    let server = common::spawn_server(config, Some(registry)).await;

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&register_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "IP Asset successfully registered on Etherlink and Yakoa");
    assert_eq!(body["etherlink"]["ipAssetId"], "7");
    assert_eq!(body["etherlink"]["blockNumber"], "4242");
    assert_eq!(body["etherlink"]["ipHash"], "ipfs://QmHash");
    assert_eq!(body["etherlink"]["txHash"], common::tx_hash().to_string());
    assert_eq!(body["yakoa"]["alreadyRegistered"], false);
    token.assert_async().await;
}

#[tokio::test]
async fn test_register_already_in_yakoa() {
    let yakoa = MockServer::start_async().await;
    yakoa
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(409).json_body(json!({ "detail": "Token already exists" }));
        })
        .await;
    let existing = yakoa
        .mock_async(|when, then| {
            when.method(GET)
                .path("/token/0x8f0a1ac6ca4f8cb0417112069c0f4dc93b9f0217:7");
            then.status(200).json_body(json!({
                "id": "0x8f0a1ac6ca4f8cb0417112069c0f4dc93b9f0217:7",
                "infringements": { "status": "completed" }
            }));
        })
        .await;

    let mut config = common::test_config();
    config.yakoa.base_url = Some(yakoa.base_url());
    let registry: Arc<dyn IpRegistry> = Arc::new(MockRegistry::minting(7));
    let server = common::spawn_server(config, Some(registry)).await;

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&register_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "IP Asset registered on Etherlink, already exists in Yakoa");
    assert_eq!(body["yakoa"]["alreadyRegistered"], true);
    assert_eq!(body["yakoa"]["id"], "0x8f0a1ac6ca4f8cb0417112069c0f4dc93b9f0217:7");
    existing.assert_async().await;
}

#[tokio::test]
async fn test_register_without_extracted_id_skips_yakoa() {
    let yakoa = MockServer::start_async().await;
    let token = yakoa
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200);
        })
        .await;

    let mut config = common::test_config();
    config.yakoa.base_url = Some(yakoa.base_url());
    let registry: Arc<dyn IpRegistry> = Arc::new(MockRegistry::default());
    let server = common::spawn_server(config, Some(registry)).await;

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&register_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Registration successful (IP Asset ID not extracted)");
    assert_eq!(body["etherlink"]["ipAssetId"], Value::Null);
    assert!(body.get("yakoa").is_none());
    assert_eq!(token.hits_async().await, 0);
}

#[tokio::test]
async fn test_register_missing_parameters() {
    let registry = Arc::new(MockRegistry::minting(1));
    let server = common::spawn_server(common::test_config(), Some(registry.clone())).await;
    let client = common::client();

    let mut incomplete = register_body();
    incomplete.as_object_mut().unwrap().remove("isEncrypted");

    let blank_hash = json!({
        "ipHash": "",
        "metadata": "x",
        "isEncrypted": true,
        "modredIpContractAddress": CONTRACT,
    });

    for body in [incomplete, blank_hash, json!({})] {
        let res = client
            .post(server.url("/api/register"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body["error"],
            "Missing required parameters: ipHash, metadata, isEncrypted, modredIpContractAddress"
        );
    }

    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_register_chain_failure() {
    let registry: Arc<dyn IpRegistry> = Arc::new(MockRegistry {
        write_mode: WriteMode::Revert,
        ..Default::default()
    });
    let server = common::spawn_server(common::test_config(), Some(registry)).await;

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&register_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Registration failed");
    assert!(body["details"].as_str().unwrap().contains("reverted"));
}

#[tokio::test]
async fn test_register_without_signer() {
    let registry: Arc<dyn IpRegistry> = Arc::new(MockRegistry {
        write_mode: WriteMode::NoSigner,
        ..Default::default()
    });
    let server = common::spawn_server(common::test_config(), Some(registry)).await;

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&register_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Blockchain service unavailable");
}

#[tokio::test]
async fn test_register_with_chain_disabled() {
    let server = common::spawn_server(common::test_config(), None).await;

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&register_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Blockchain service unavailable");
}

#[tokio::test]
async fn test_yakoa_failure_keeps_receipt() {
    let yakoa = MockServer::start_async().await;
    yakoa
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(422).json_body(json!({ "detail": "invalid media" }));
        })
        .await;

    let mut config = common::test_config();
    config.yakoa.base_url = Some(yakoa.base_url());
    let registry: Arc<dyn IpRegistry> = Arc::new(MockRegistry::minting(7));
    let server = common::spawn_server(config, Some(registry)).await;

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&register_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Yakoa registration failed");
    assert_eq!(body["details"]["detail"], "invalid media");
    assert_eq!(body["etherlink"]["ipAssetId"], "7");
}

#[tokio::test]
async fn test_register_rejects_malformed_contract() {
    let registry = Arc::new(MockRegistry::minting(1));
    let server = common::spawn_server(common::test_config(), Some(registry.clone())).await;

    let mut body = register_body();
    body["modredIpContractAddress"] = json!("0x1234");

    let res = common::client()
        .post(server.url("/api/register"))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid contract address" }));
    assert!(registry.calls().is_empty());
}
