//! End-to-end tests for the Anthropic adapter against a mock server.

mod support;

use serde_json::json;
use unigen::{FinishReason, GenError, Message, Request, Role, Schema, Tool, generate};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{mock_options, recording_streamer};

fn text_request() -> Request {
    Request::new(
        "claude-3-5-haiku-latest",
        vec![Message::text(Role::Human, "hi")],
    )
}

#[tokio::test]
async fn blocking_call_maps_headers_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-haiku-latest",
            "max_tokens": 2048,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "content": [{"type": "text", "text": "Hello there"}],
            "stop_reason": "end_turn",
            "usage": {
                "input_tokens": 12,
                "output_tokens": 6,
                "cache_creation_input_tokens": 2,
                "cache_read_input_tokens": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = generate(&text_request(), &mock_options(server.uri()))
        .await
        .unwrap();

    assert_eq!(response.text(), "Hello there");
    assert_eq!(response.finish_reason, FinishReason::Stop);

    let usage = response.usage.unwrap();
    assert_eq!(usage.cache_creation_tokens, 2);
    assert_eq!(usage.cached_tokens, 1);
    assert_eq!(usage.total_tokens, 18);
    assert!(usage.cost > 0.0);
}

#[tokio::test]
async fn schema_requests_prepend_the_instruction_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "{\"name\":\"Alice\"}"}],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let schema = Schema::parse(r#"{"type":"object","properties":{"name":{"type":"string"}}}"#)
        .unwrap();
    let request = text_request().with_response_schema(schema.clone());
    let response = generate(&request, &mock_options(server.uri())).await.unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&response.text()).unwrap();
    assert!(schema.validate(&parsed).is_ok());
}

#[tokio::test]
async fn forced_tool_call_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"tool_choice": {"type": "any"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "type": "tool_use",
                "id": "toolu_1",
                "name": "get_weather",
                "input": {"city": "Tokyo"}
            }],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 30, "output_tokens": 12}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = text_request()
        .with_tools(vec![Tool::new("get_weather", "Get the weather")])
        .with_must_call_tool(true);
    let response = generate(&request, &mock_options(server.uri())).await.unwrap();

    assert_eq!(response.finish_reason, FinishReason::ToolUse);
    assert_eq!(response.tool_calls().len(), 1);
}

#[tokio::test]
async fn streaming_call_assembles_text_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    include_str!("fixtures/anthropic/text_stream.sse"),
                    "text/event-stream",
                ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (streamer, seen) = recording_streamer();
    let options = mock_options(server.uri()).with_streamer(streamer);
    let response = generate(&text_request(), &options).await.unwrap();

    assert_eq!(response.text(), "Hello, world");
    assert_eq!(*seen.lock().unwrap(), vec!["Hello", ", world"]);
    let usage = response.usage.unwrap();
    assert_eq!(usage.input_tokens, 10);
    assert_eq!(usage.output_tokens, 4);
    assert_eq!(usage.total_tokens, 14);
}

#[tokio::test]
async fn streamer_rejection_fails_the_whole_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    include_str!("fixtures/anthropic/text_stream.sse"),
                    "text/event-stream",
                ),
        )
        .mount(&server)
        .await;

    let streamer: unigen::Streamer = std::sync::Arc::new(|_| {
        Err(GenError::InvalidInput("sink closed".to_string()))
    });
    let options = mock_options(server.uri()).with_streamer(streamer);

    let result = generate(&text_request(), &options).await;
    assert!(matches!(result, Err(GenError::StreamerError(_))));
}

#[tokio::test]
async fn overloaded_api_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let result = generate(&text_request(), &mock_options(server.uri())).await;
    match result {
        Err(GenError::ApiError { code, .. }) => assert_eq!(code, 529),
        other => panic!("unexpected result: {other:?}"),
    }
}
