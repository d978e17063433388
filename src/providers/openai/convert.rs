//! Translation between the unified chat model and the Chat Completions wire
//! format.

use serde_json::{Value, json};

use crate::error::GenError;
use crate::types::{
    ContentPart, FinishReason, Message, MessageContent, Request, Response, Role, Usage,
};

use super::types::{ChatCompletionResponse, OpenAiUsage};

pub(super) fn build_request_body(request: &Request, use_search: bool) -> Result<Value, GenError> {
    let messages = request
        .messages
        .iter()
        .map(convert_message)
        .collect::<Result<Vec<_>, _>>()?;

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "max_completion_tokens": request.config.max_tokens.unwrap_or(2048),
    });

    if let Some(temperature) = request.config.temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(top_p) = request.config.top_p {
        body["top_p"] = json!(top_p);
    }
    if let Some(presence) = request.config.presence_penalty {
        body["presence_penalty"] = json!(presence);
    }
    if let Some(frequency) = request.config.frequency_penalty {
        body["frequency_penalty"] = json!(frequency);
    }
    if !request.config.stop_sequences.is_empty() {
        body["stop"] = json!(request.config.stop_sequences);
    }

    if !request.tools.is_empty() {
        let tools: Vec<Value> = request
            .tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool
                            .input_schema
                            .as_ref()
                            .map(|s| s.as_value().clone())
                            .unwrap_or_else(|| json!({"type": "object"})),
                    },
                })
            })
            .collect();
        body["tools"] = json!(tools);
        if request.must_call_tool {
            body["tool_choice"] = json!("required");
        }
    }

    if let Some(schema) = &request.response_schema {
        body["response_format"] = json!({
            "type": "json_schema",
            "json_schema": {
                "name": "response",
                "schema": schema.as_value(),
            },
        });
    }

    if use_search {
        body["web_search_options"] = json!({});
    }

    Ok(body)
}

/// One unified message maps to exactly one wire message.
fn convert_message(message: &Message) -> Result<Value, GenError> {
    match &message.content {
        MessageContent::ToolCall(call) => Ok(json!({
            "role": "assistant",
            "tool_calls": [{
                "id": call.id,
                "type": "function",
                "function": {"name": call.name, "arguments": call.arguments},
            }],
        })),
        MessageContent::ToolResponse(resp) => Ok(json!({
            "role": "tool",
            "tool_call_id": resp.id,
            "content": resp.result,
        })),
        MessageContent::Parts(parts) => {
            if parts.is_empty() {
                return Err(GenError::NoValidContent);
            }
            let content: Vec<Value> = parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => json!({"type": "text", "text": text}),
                    ContentPart::Image { data_url } => {
                        json!({"type": "image_url", "image_url": {"url": data_url}})
                    }
                    ContentPart::File { data_url } => {
                        json!({"type": "file", "file": {"file_data": data_url}})
                    }
                })
                .collect();
            Ok(json!({"role": wire_role(message.role), "content": content}))
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::Human => "user",
        Role::Ai => "assistant",
        Role::Tool => "tool",
    }
}

pub(super) fn response_from(
    chat: ChatCompletionResponse,
    model: &str,
) -> Result<Response, GenError> {
    let Some(choice) = chat.choices.into_iter().next() else {
        return Err(GenError::ParseError("no choices in response".to_string()));
    };

    let mut messages = Vec::new();
    if let Some(content) = choice.message.content
        && !content.is_empty()
    {
        messages.push(Message::text(Role::Ai, content));
    }
    if let Some(calls) = choice.message.tool_calls {
        for call in calls {
            messages.push(Message::tool_call(
                call.function.name,
                call.id,
                call.function.arguments,
            ));
        }
    }

    Ok(Response {
        model: model.to_string(),
        finish_reason: map_finish_reason(choice.finish_reason.as_deref()),
        messages,
        metadata: Default::default(),
        usage: chat.usage.as_ref().map(usage_from),
    })
}

pub(super) fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::MaxTokens,
        Some("tool_calls") | Some("function_call") => FinishReason::ToolUse,
        Some("content_filter") => FinishReason::Safety,
        _ => FinishReason::Unknown,
    }
}

pub(super) fn usage_from(wire: &OpenAiUsage) -> Usage {
    Usage {
        input_tokens: wire.prompt_tokens,
        output_tokens: wire.completion_tokens,
        reasoning_tokens: wire
            .completion_tokens_details
            .as_ref()
            .map_or(0, |d| d.reasoning_tokens),
        cache_creation_tokens: 0,
        cached_tokens: wire
            .prompt_tokens_details
            .as_ref()
            .map_or(0, |d| d.cached_tokens),
        total_tokens: wire.total_tokens,
        cost: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::types::{GenerationConfig, Tool};

    fn request(messages: Vec<Message>) -> Request {
        Request::new("gpt-4o-mini", messages)
    }

    #[test]
    fn body_defaults_max_tokens() {
        let body =
            build_request_body(&request(vec![Message::text(Role::Human, "hi")]), false).unwrap();
        assert_eq!(body["max_completion_tokens"], 2048);
        assert!(body.get("temperature").is_none());
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn body_carries_set_config_values() {
        let req = request(vec![Message::text(Role::Human, "hi")]).with_config(GenerationConfig {
            max_tokens: Some(100),
            temperature: Some(0.5),
            top_p: Some(0.9),
            presence_penalty: Some(0.1),
            frequency_penalty: Some(0.2),
            stop_sequences: vec!["END".to_string()],
        });
        let body = build_request_body(&req, false).unwrap();

        assert_eq!(body["max_completion_tokens"], 100);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["top_p"], 0.9);
        assert_eq!(body["stop"][0], "END");
    }

    #[test]
    fn tool_forcing_requires_tool_choice() {
        let req = request(vec![Message::text(Role::Human, "weather?")])
            .with_tools(vec![Tool::new("get_weather", "Get the weather")])
            .with_must_call_tool(true);
        let body = build_request_body(&req, false).unwrap();

        assert_eq!(body["tools"][0]["function"]["name"], "get_weather");
        assert_eq!(body["tools"][0]["function"]["parameters"]["type"], "object");
        assert_eq!(body["tool_choice"], "required");
    }

    #[test]
    fn response_schema_becomes_response_format() {
        let schema = Schema::parse(r#"{"type":"object","properties":{"a":{"type":"string"}}}"#)
            .unwrap();
        let req = request(vec![Message::text(Role::Human, "hi")]).with_response_schema(schema);
        let body = build_request_body(&req, false).unwrap();

        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["type"],
            "object"
        );
    }

    #[test]
    fn search_adds_web_search_options() {
        let body =
            build_request_body(&request(vec![Message::text(Role::Human, "hi")]), true).unwrap();
        assert!(body.get("web_search_options").is_some());
    }

    #[test]
    fn tool_messages_map_to_wire_shapes() {
        let call = convert_message(&Message::tool_call("f", "call_1", "{}")).unwrap();
        assert_eq!(call["role"], "assistant");
        assert_eq!(call["tool_calls"][0]["id"], "call_1");

        let resp = convert_message(&Message::tool_response("f", "call_1", "42")).unwrap();
        assert_eq!(resp["role"], "tool");
        assert_eq!(resp["tool_call_id"], "call_1");
        assert_eq!(resp["content"], "42");
    }

    #[test]
    fn empty_parts_are_rejected() {
        let msg = Message {
            role: Role::Human,
            content: MessageContent::Parts(vec![]),
        };
        assert!(matches!(
            convert_message(&msg),
            Err(GenError::NoValidContent)
        ));
    }

    #[test]
    fn finish_reasons_follow_the_vendor_table() {
        assert_eq!(map_finish_reason(Some("stop")), FinishReason::Stop);
        assert_eq!(map_finish_reason(Some("length")), FinishReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("tool_calls")), FinishReason::ToolUse);
        assert_eq!(
            map_finish_reason(Some("function_call")),
            FinishReason::ToolUse
        );
        assert_eq!(
            map_finish_reason(Some("content_filter")),
            FinishReason::Safety
        );
        assert_eq!(map_finish_reason(Some("eldritch")), FinishReason::Unknown);
        assert_eq!(map_finish_reason(None), FinishReason::Unknown);
    }

    #[test]
    fn response_folds_text_and_tool_calls() {
        let wire: ChatCompletionResponse = serde_json::from_str(
            r#"{
                "choices": [{
                    "message": {
                        "content": "checking",
                        "tool_calls": [
                            {"id": "call_1", "type": "function",
                             "function": {"name": "get_weather", "arguments": "{\"city\":\"Tokyo\"}"}}
                        ]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {
                    "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15,
                    "prompt_tokens_details": {"cached_tokens": 3},
                    "completion_tokens_details": {"reasoning_tokens": 2}
                }
            }"#,
        )
        .unwrap();

        let resp = response_from(wire, "gpt-4o-mini").unwrap();
        assert_eq!(resp.finish_reason, FinishReason::ToolUse);
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.text(), "checking");
        assert_eq!(resp.tool_calls().len(), 1);

        let usage = resp.usage.unwrap();
        assert_eq!(usage.input_tokens, 10);
        assert_eq!(usage.cached_tokens, 3);
        assert_eq!(usage.reasoning_tokens, 2);
    }

    #[test]
    fn empty_choices_is_a_parse_error() {
        let wire: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            response_from(wire, "gpt-4o-mini"),
            Err(GenError::ParseError(_))
        ));
    }
}
