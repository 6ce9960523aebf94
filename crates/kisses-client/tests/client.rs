//! Client tests against a mocked kisses service.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kisses_client::{ClientError, GenerateRequest, KissesClient, WalrusArchiver};

const ADMIN_SECRET: &str = "test-admin-secret";

async fn mock_client() -> (MockServer, KissesClient) {
    let server = MockServer::start().await;
    let client = KissesClient::new(server.uri(), ADMIN_SECRET);
    (server, client)
}

#[tokio::test]
async fn reads_a_balance() {
    let (server, client) = mock_client().await;

    Mock::given(method("GET"))
        .and(path("/credit"))
        .and(query_param("user_id", "0xabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kisses": 10})))
        .mount(&server)
        .await;

    let balance = client.get_balance("0xabc").await.unwrap();
    assert_eq!(balance, 10);
}

#[tokio::test]
async fn lists_creator_balances_in_server_order() {
    let (server, client) = mock_client().await;

    // preserve_order keeps the server's descending-balance ordering.
    Mock::given(method("GET"))
        .and(path("/credit"))
        .and(query_param("user_id", "/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bob/modelY": 4,
            "alice/modelX": 2,
        })))
        .mount(&server)
        .await;

    let balances = client.list_creator_balances().await.unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].creator, "bob");
    assert_eq!(balances[0].model, "modelY");
    assert_eq!(balances[0].kisses, 4);
    assert_eq!(balances[1].creator, "alice");
    assert_eq!(balances[1].kisses, 2);
}

#[tokio::test]
async fn charges_a_generation() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/credit"))
        .and(body_partial_json(json!({
            "admin_secret": ADMIN_SECRET,
            "model_creator": "alice",
            "model_name": "modelX",
            "user_address": "0xabc",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Transaction successful",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client
        .charge_generation("alice", "modelX", "0xabc")
        .await
        .unwrap();
    assert!(receipt.success);
}

#[tokio::test]
async fn insufficient_balance_maps_to_typed_error() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/credit"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "code": "insufficient_kisses",
                "message": "Insufficient kisses: balance=3, required=10",
                "details": {"balance": 3, "required": 10},
            }
        })))
        .mount(&server)
        .await;

    let err = client
        .charge_generation("alice", "modelX", "0xabc")
        .await
        .unwrap_err();
    match err {
        ClientError::InsufficientKisses { balance, required } => {
            assert_eq!(balance, 3);
            assert_eq!(required, 10);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_account_maps_to_typed_error() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/credit"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": "account_not_found",
                "message": "Account not found: 0xghost",
            }
        })))
        .mount(&server)
        .await;

    let err = client
        .charge_generation("alice", "modelX", "0xghost")
        .await
        .unwrap_err();
    match err {
        ClientError::AccountNotFound { account } => assert_eq!(account, "0xghost"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn generate_charged_returns_the_image() {
    let (server, client) = mock_client().await;

    Mock::given(method("POST"))
        .and(path("/credit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Transaction successful",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prompt": "the moon in the style of TOK",
            "image": {"b64_json": "aGVsbG8="},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateRequest::new("the moon", "flux-tarot-v1", 42);
    let response = client
        .generate_charged(&request, "multimodalart", "flux-tarot-v1", "0xabc")
        .await
        .unwrap();
    assert_eq!(response.prompt, "the moon in the style of TOK");
}

#[tokio::test]
async fn generate_charged_refunds_when_generation_fails() {
    let (server, client) = mock_client().await;

    // Refund calls carry "refund": true; the plain charge omits the field.
    Mock::given(method("POST"))
        .and(path("/credit"))
        .and(body_partial_json(json!({"refund": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Refund successful",
        })))
        .expect(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/credit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Transaction successful",
        })))
        .expect(1)
        .with_priority(5)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "error": {
                "code": "upstream_error",
                "message": "Image generation failed",
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateRequest::new("the moon", "flux-tarot-v1", 42);
    let err = client
        .generate_charged(&request, "multimodalart", "flux-tarot-v1", "0xabc")
        .await
        .unwrap_err();
    match err {
        ClientError::Api { code, status, .. } => {
            assert_eq!(code, "upstream_error");
            assert_eq!(status, 502);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn archives_a_blob_and_builds_the_public_url() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/blobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "newlyCreated": {"blobObject": {"blobId": "blob-1"}},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let archiver = WalrusArchiver::new(server.uri(), "https://agg.example", 1);
    let url = archiver.store(b"jpeg bytes").await.unwrap();
    assert_eq!(url, "https://agg.example/v1/blob-1");
}

#[tokio::test]
async fn archiver_retries_transient_publisher_failures() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/blobs"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/blobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"blobId": "blob-2"})))
        .expect(1)
        .with_priority(5)
        .mount(&server)
        .await;

    let archiver = WalrusArchiver::new(server.uri(), "https://agg.example", 1);
    let url = archiver.store(b"jpeg bytes").await.unwrap();
    assert_eq!(url, "https://agg.example/v1/blob-2");
}
