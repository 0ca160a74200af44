//! Integration tests for `AnthropicGateway` using wiremock HTTP mocks.

use std::time::Duration;

use propgen_core::RetryPolicy;
use propgen_llm::{AnthropicGateway, CallOptions, GatewayConfig, LlmError, LlmGateway};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_gateway(base_url: &str, max_retries: u32) -> AnthropicGateway {
    let mut config = GatewayConfig::with_key("test-key");
    config.base_url = base_url.to_string();
    config.timeout_secs = 5;
    config.retry = RetryPolicy::new(max_retries, Duration::from_millis(1));
    AnthropicGateway::new(config).expect("gateway construction should not fail")
}

fn ok_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_1",
        "type": "message",
        "model": "claude-sonnet-4-20250514",
        "content": [
            {"type": "thinking", "thinking": "Let me weigh the competitors...", "signature": "sig"},
            {"type": "text", "text": text}
        ],
        "usage": {"input_tokens": 5000, "output_tokens": 2000}
    })
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map_or(0, |requests| requests.len())
}

#[tokio::test]
async fn research_call_sends_thinking_budget_and_returns_text_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "thinking": {"type": "enabled", "budget_tokens": 10000},
            "messages": [{"role": "user", "content": "Research Acme Roofing"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("{\"ok\":true}")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri(), 3);
    let response = gateway
        .call_for_research("You are an analyst.\n\n\n\n", "  Research Acme Roofing  ", &CallOptions::default())
        .await
        .expect("research call should succeed");

    assert_eq!(response.content, "{\"ok\":true}");
    assert_eq!(response.thinking(), ["Let me weigh the competitors..."]);
    assert_eq!(response.usage.input_tokens, 5000);
    assert_eq!(response.usage.output_tokens, 2000);
    assert!(response.usage.thinking_tokens > 0, "input exceeds the tiny prompt estimate");
    assert!(response.cost > Decimal::ZERO);
    assert_eq!(response.model, "claude-sonnet-4-20250514");
}

#[tokio::test]
async fn content_call_uses_content_temperature_without_thinking() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"temperature": 0.5, "max_tokens": 8000})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("proposal")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri(), 3);
    let response = gateway
        .call_for_content("system", "user", &CallOptions::default())
        .await
        .expect("content call should succeed");
    assert_eq!(response.usage.thinking_tokens, 0);

    let requests = server.received_requests().await.unwrap_or_default();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.get("thinking").is_none());
}

#[tokio::test]
async fn premium_option_switches_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "claude-opus-4-1-20250805"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "claude-opus-4-1-20250805",
            "content": [{"type": "text", "text": "x"}],
            "usage": {"input_tokens": 1000000, "output_tokens": 0}
        })))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri(), 0);
    let response = gateway
        .call_for_content("s", "u", &CallOptions::premium(true))
        .await
        .expect("premium call should succeed");
    // 1M input tokens at $15 → £11.85
    assert_eq!(response.cost, Decimal::new(1185, 2));
}

#[tokio::test]
async fn server_errors_are_retried_exactly_max_retries_times() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "type": "error",
            "error": {"type": "api_error", "message": "Internal server error"}
        })))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri(), 3);
    let err = gateway
        .call_for_content("s", "u", &CallOptions::default())
        .await
        .expect_err("should fail after retries");

    assert!(matches!(err, LlmError::Api { status: 500, ref message } if message == "Internal server error"));
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn auth_permission_and_bad_request_fail_without_retry() {
    for status in [401u16, 403, 400] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;

        let gateway = test_gateway(&server.uri(), 3);
        let err = gateway
            .call_for_research("s", "u", &CallOptions::default())
            .await
            .expect_err("should fail immediately");

        assert_eq!(err.status(), Some(status));
        assert_eq!(request_count(&server).await, 1, "status {status}");
    }
}

#[tokio::test]
async fn rate_limit_then_success_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("done")))
        .with_priority(2)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri(), 3);
    let response = gateway
        .call_for_content("s", "u", &CallOptions::default())
        .await
        .expect("should recover after rate limiting");
    assert_eq!(response.content, "done");
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn response_without_text_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "thinking", "thinking": "hmm"}],
            "usage": {"input_tokens": 1, "output_tokens": 1}
        })))
        .mount(&server)
        .await;

    let gateway = test_gateway(&server.uri(), 3);
    let err = gateway
        .call_for_research("s", "u", &CallOptions::default())
        .await
        .expect_err("empty text should fail");
    assert!(matches!(err, LlmError::EmptyResponse));
    assert_eq!(request_count(&server).await, 1);
}
