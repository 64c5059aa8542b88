//! Completion endpoint behavior.
//!
//! The generator must resolve to a string for every combination of HTTP
//! status, body shape and delay — a user always gets either the reply or a
//! fixed fallback, and the endpoint is called exactly once per turn.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use banter_agent::generate::{
    ResponseGenerator, FALLBACK_ERROR, FALLBACK_TIMEOUT, FALLBACK_UNAVAILABLE,
};
use banter_agent::provider::{ChatMessage, OpenAiCompatProvider, Role};
use banter_core::config::PersonaConfig;

fn persona() -> PersonaConfig {
    PersonaConfig {
        model: "test-model".to_string(),
        system_prompt: "You are a test bot.".to_string(),
        name: None,
    }
}

fn generator(base_url: &str, api_token: Option<&str>, timeout: Duration) -> ResponseGenerator {
    let provider = Arc::new(OpenAiCompatProvider::new(
        api_token.map(String::from),
        base_url.to_string(),
    ));
    ResponseGenerator::new(provider, persona(), timeout)
}

fn user(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::User,
        content: content.to_string(),
    }
}

fn ok_body(content: &str) -> serde_json::Value {
    json!({ "choices": [{ "message": { "content": content } }] })
}

#[tokio::test]
async fn ok_response_returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "content": "hello" } },
                { "message": { "content": "unused second choice" } },
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let g = generator(&server.uri(), None, Duration::from_secs(5));
    assert_eq!(g.generate(&[user("hi")]).await, "hello");
}

#[tokio::test]
async fn bearer_token_and_referer_are_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer TEST_TOKEN"))
        .and(header("referer", "roblox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let g = generator(&server.uri(), Some("TEST_TOKEN"), Duration::from_secs(5));
    assert_eq!(g.generate(&[user("hi")]).await, "ok");
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let g = generator(&server.uri(), None, Duration::from_secs(5));
    g.generate(&[user("hi")]).await;

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn malformed_body_yields_generic_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let g = generator(&server.uri(), None, Duration::from_secs(5));
    assert_eq!(g.generate(&[user("hi")]).await, FALLBACK_ERROR);
}

#[tokio::test]
async fn empty_choices_yields_generic_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let g = generator(&server.uri(), None, Duration::from_secs(5));
    assert_eq!(g.generate(&[user("hi")]).await, FALLBACK_ERROR);
}

#[tokio::test]
async fn server_error_yields_unavailable_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let g = generator(&server.uri(), None, Duration::from_secs(5));
    assert_eq!(g.generate(&[user("hi")]).await, FALLBACK_UNAVAILABLE);
}

#[tokio::test]
async fn slow_endpoint_yields_timeout_fallback_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body("too late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let g = generator(&server.uri(), None, Duration::from_millis(100));
    assert_eq!(g.generate(&[user("hi")]).await, FALLBACK_TIMEOUT);

    // Distinct fallback, and the abandoned call is never re-attempted.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_yields_generic_fallback() {
    // Port 0 is never connectable, so this fails at the transport layer.
    let g = generator("http://127.0.0.1:0", None, Duration::from_secs(5));
    assert_eq!(g.generate(&[user("hi")]).await, FALLBACK_ERROR);
}

#[tokio::test]
async fn system_prompt_is_first_for_every_window_length() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("ok")))
        .mount(&server)
        .await;

    let g = generator(&server.uri(), None, Duration::from_secs(5));
    for window_len in 0..=5usize {
        let window: Vec<ChatMessage> = (0..window_len)
            .map(|i| user(&format!("message {i}")))
            .collect();
        g.generate(&window).await;
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
    for (window_len, request) in requests.iter().enumerate() {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), window_len + 1);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are a test bot.");
        // Window order survives the wire encoding.
        for (i, entry) in messages.iter().skip(1).enumerate() {
            assert_eq!(entry["content"], format!("message {i}"));
        }
    }
}
