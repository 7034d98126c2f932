//! File and metadata pinning through Pinata.

use httpmock::prelude::*;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

mod common;

fn pinata_config(pinata: &MockServer) -> modred_backend::AppConfig {
    let mut config = common::test_config();
    config.pinata.jwt = "test-jwt".to_string();
    config.pinata.api_url = pinata.base_url();
    config
}

#[tokio::test]
async fn test_upload_file() {
    let pinata = MockServer::start_async().await;
    let pin = pinata
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pinning/pinFileToIPFS")
                .header("authorization", "Bearer test-jwt")
                .body_contains("sunset.png")
                .body_contains("Uploaded via ModredIP");
            then.status(200).json_body(json!({
                "IpfsHash": "QmFileCid",
                "PinSize": 4,
                "Timestamp": "2025-01-01T00:00:00Z"
            }));
        })
        .await;

    let server = common::spawn_server(pinata_config(&pinata), None).await;

    let form = Form::new().part(
        "file",
        Part::bytes(b"\x89PNG".to_vec())
            .file_name("sunset.png")
            .mime_str("image/png")
            .unwrap(),
    );
    let res = common::client()
        .post(server.url("/api/ipfs/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": true,
            "cid": "QmFileCid",
            "ipfsUrl": "ipfs://QmFileCid",
            "gatewayUrl": "https://gateway.pinata.cloud/ipfs/QmFileCid"
        })
    );
    pin.assert_async().await;
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let pinata = MockServer::start_async().await;
    let server = common::spawn_server(pinata_config(&pinata), None).await;

    let form = Form::new().text("note", "no file here");
    let res = common::client()
        .post(server.url("/api/ipfs/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing required field: file");
}

#[tokio::test]
async fn test_pinata_rejection_is_bad_gateway() {
    let pinata = MockServer::start_async().await;
    pinata
        .mock_async(|when, then| {
            when.method(POST).path("/pinning/pinFileToIPFS");
            then.status(401).body("invalid jwt");
        })
        .await;
    let server = common::spawn_server(pinata_config(&pinata), None).await;

    let form = Form::new().part("file", Part::bytes(b"data".to_vec()).file_name("a.txt"));
    let res = common::client()
        .post(server.url("/api/ipfs/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "IPFS upload failed");
    assert!(body["details"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_upload_metadata() {
    let pinata = MockServer::start_async().await;
    let pin = pinata
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pinning/pinJSONToIPFS")
                .header("authorization", "Bearer test-jwt")
                .json_body_partial(
                    r#"{
                        "pinataContent": {
                            "name": "Sunset",
                            "image": "ipfs://QmFileCid",
                            "properties": { "ipHash": "ipfs://QmFileCid", "isEncrypted": false }
                        },
                        "pinataMetadata": { "name": "Sunset-metadata" }
                    }"#,
                );
            then.status(200).json_body(json!({ "IpfsHash": "QmMetaCid" }));
        })
        .await;
    let server = common::spawn_server(pinata_config(&pinata), None).await;

    let res = common::client()
        .post(server.url("/api/ipfs/metadata"))
        .json(&json!({ "ipHash": "ipfs://QmFileCid", "name": "Sunset" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["cid"], "QmMetaCid");
    assert_eq!(body["ipfsUrl"], "ipfs://QmMetaCid");
    assert_eq!(body["metadata"]["description"], "No description provided");
    pin.assert_async().await;
}

#[tokio::test]
async fn test_metadata_requires_ip_hash() {
    let pinata = MockServer::start_async().await;
    let server = common::spawn_server(pinata_config(&pinata), None).await;

    let res = common::client()
        .post(server.url("/api/ipfs/metadata"))
        .json(&json!({ "name": "Sunset" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing required parameter: ipHash");
}

#[tokio::test]
async fn test_ipfs_unavailable_without_jwt() {
    let server = common::spawn_server(common::test_config(), None).await;

    let res = common::client()
        .post(server.url("/api/ipfs/metadata"))
        .json(&json!({ "ipHash": "ipfs://QmFileCid" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "IPFS service unavailable");
}

#[tokio::test]
async fn test_malformed_content_type_falls_back_to_octet_stream() {
    use modred_backend::ipfs::{PinataClient, Upload};

    let pinata = MockServer::start_async().await;
    let pin = pinata
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pinning/pinFileToIPFS")
                .body_contains("application/octet-stream");
            then.status(200).json_body(json!({ "IpfsHash": "QmRawCid" }));
        })
        .await;

    let config = pinata_config(&pinata);
    let client = PinataClient::from_config(&config.pinata, &config.timeouts)
        .unwrap()
        .unwrap();

    let upload = Upload {
        file_name: "blob.bin".to_string(),
        content_type: "notamime".to_string(),
        bytes: b"data".to_vec(),
    };
    assert_eq!(client.pin_file(upload).await.unwrap(), "QmRawCid");

    // Same through the HTTP route, with a hand-built multipart body.
    let server = common::spawn_server(config, None).await;
    let boundary = "modredboundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"blob.bin\"\r\n\
         Content-Type: notamime\r\n\r\ndata\r\n--{b}--\r\n",
        b = boundary
    );
    let res = common::client()
        .post(server.url("/api/ipfs/upload"))
        .header("content-type", format!("multipart/form-data; boundary={}", boundary))
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["cid"], "QmRawCid");
    assert_eq!(pin.hits_async().await, 2);
}
