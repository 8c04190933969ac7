//! Integration tests for `EnrichClient` using wiremock HTTP mocks.

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use offerbase_enrich::{
    enrich_batch, enrich_record, EnrichClient, EnrichError, EnrichSettings, ModelRotation,
};

fn test_client(base_url: &str) -> EnrichClient {
    EnrichClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

/// Settings with zeroed delays so retry paths run instantly under test.
fn fast_settings() -> EnrichSettings {
    EnrichSettings {
        max_retries: 2,
        retry_delay_ms: 0,
        pause_ms: 0,
    }
}

fn completion_body(content: &serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content.to_string()
                },
                "finish_reason": "stop"
            }
        ]
    })
}

fn sample_record() -> serde_json::Map<String, serde_json::Value> {
    match json!({
        "discount_id": "d-1",
        "title": "Spa weekend",
        "description": "20% off spa weekends",
        "price": "N/A"
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn complete_json_returns_model_output() {
    let server = MockServer::start().await;

    let enriched = json!({
        "discount_id": "d-1",
        "title": "Spa weekend",
        "price": 20,
        "discount_type": "percentage"
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "model-a" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&enriched)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .complete_json("model-a", "system", "user")
        .await
        .expect("should parse completion");

    assert_eq!(result["price"], json!(20));
    assert_eq!(result["discount_type"], json!("percentage"));
}

#[tokio::test]
async fn rate_limit_surfaces_as_rate_limited_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "rate_limit_exceeded", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.complete_json("model-a", "system", "user").await;

    assert!(
        matches!(result, Err(EnrichError::RateLimited(ref msg)) if msg == "rate_limit_exceeded"),
        "expected RateLimited, got: {result:?}"
    );
}

#[tokio::test]
async fn api_error_carries_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "model not found" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.complete_json("nope", "system", "user").await;

    assert!(
        matches!(result, Err(EnrichError::Api(ref msg)) if msg.contains("model not found")),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn non_object_completion_content_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&json!([1, 2]))))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.complete_json("model-a", "system", "user").await;

    assert!(
        matches!(result, Err(EnrichError::Api(_))),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn enrich_record_rotates_models_on_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "model-a" })))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "rate_limit_exceeded" }
        })))
        .mount(&server)
        .await;

    let enriched = json!({ "discount_id": "d-1", "price": 20 });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "model-b" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&enriched)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut rotation = ModelRotation::new(&["model-a".to_string(), "model-b".to_string()]);

    let result = enrich_record(&client, &mut rotation, &sample_record(), fast_settings()).await;

    let enriched = result.expect("second model should succeed");
    assert_eq!(enriched["price"], json!(20));
    // The rotation stays on the model that worked.
    assert_eq!(rotation.current(), "model-b");
}

#[tokio::test]
async fn enrich_record_gives_up_after_full_rotation_of_rate_limits() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "rate_limit_exceeded" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut rotation = ModelRotation::new(&["model-a".to_string(), "model-b".to_string()]);

    let result = enrich_record(&client, &mut rotation, &sample_record(), fast_settings()).await;
    assert!(result.is_none(), "all models rate-limited; expected None");
}

#[tokio::test]
async fn enrich_record_returns_none_after_retry_exhaustion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        // One initial attempt plus max_retries.
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut rotation = ModelRotation::new(&["model-a".to_string()]);

    let result = enrich_record(&client, &mut rotation, &sample_record(), fast_settings()).await;
    assert!(result.is_none(), "expected None after retry exhaustion");
}

#[tokio::test]
async fn enrich_batch_excludes_failed_records() {
    let server = MockServer::start().await;

    let good = json!({ "discount_id": "d-good", "price": 10 });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("d-good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&good)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let records: Vec<serde_json::Map<String, serde_json::Value>> =
        [json!({ "discount_id": "d-good" }), json!({ "discount_id": "d-bad" })]
            .into_iter()
            .map(|v| match v {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect();

    let client = test_client(&server.uri());
    let mut rotation = ModelRotation::new(&["model-a".to_string()]);

    let report = enrich_batch(&client, &mut rotation, records, fast_settings()).await;

    assert_eq!(report.total, 2);
    assert_eq!(report.enriched.len(), 1);
    assert_eq!(report.enriched[0]["discount_id"], json!("d-good"));
    assert_eq!(report.skipped_ids, vec!["d-bad".to_string()]);
}
