//! Translation between the unified chat model and the Messages wire format.

use serde_json::{Value, json};

use crate::dataurl;
use crate::error::GenError;
use crate::types::{
    ContentPart, FinishReason, Message, MessageContent, Request, Response, Role, Usage,
};

use super::types::{AnthropicUsage, MessagesResponse};

/// Instruction prepended as a user turn when a response schema is set; the
/// Messages API has no native structured-output switch.
const STRUCTURED_OUTPUT_PROMPT: &str = "Respond with a single JSON object that conforms to the \
following JSON Schema. Output only the JSON object, with no surrounding text or code fences.";

pub(super) fn build_request_body(request: &Request, use_search: bool) -> Result<Value, GenError> {
    let mut messages = Vec::new();

    if let Some(schema) = &request.response_schema {
        messages.push(json!({
            "role": "user",
            "content": [{
                "type": "text",
                "text": format!("{STRUCTURED_OUTPUT_PROMPT}\n\n{}", schema.to_json()),
            }],
        }));
    }

    for message in &request.messages {
        messages.push(convert_message(message)?);
    }

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "max_tokens": request.config.max_tokens.unwrap_or(2048),
    });

    if let Some(temperature) = request.config.temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(top_p) = request.config.top_p {
        body["top_p"] = json!(top_p);
    }
    if !request.config.stop_sequences.is_empty() {
        body["stop_sequences"] = json!(request.config.stop_sequences);
    }

    let mut tools: Vec<Value> = request
        .tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "input_schema": tool
                    .input_schema
                    .as_ref()
                    .map(|s| s.as_value().clone())
                    .unwrap_or_else(|| json!({"type": "object"})),
            })
        })
        .collect();
    if use_search {
        tools.push(json!({"type": "web_search_20250305", "name": "web_search"}));
    }
    if !tools.is_empty() {
        body["tools"] = json!(tools);
    }
    if request.must_call_tool && !request.tools.is_empty() {
        body["tool_choice"] = json!({"type": "any"});
    }

    Ok(body)
}

/// One unified message maps to one wire message.
///
/// The Messages API accepts no system turns in this layout; system messages
/// become `system:`-prefixed user turns so instruction text survives in
/// multi-turn transcripts.
fn convert_message(message: &Message) -> Result<Value, GenError> {
    match &message.content {
        MessageContent::ToolCall(call) => {
            let input: Value = serde_json::from_str(&call.arguments)
                .map_err(|e| GenError::InvalidInput(format!("tool call arguments: {e}")))?;
            Ok(json!({
                "role": "assistant",
                "content": [{
                    "type": "tool_use",
                    "id": call.id,
                    "name": call.name,
                    "input": input,
                }],
            }))
        }
        MessageContent::ToolResponse(resp) => Ok(json!({
            "role": "user",
            "content": [{
                "type": "tool_result",
                "tool_use_id": resp.id,
                "content": resp.result,
            }],
        })),
        MessageContent::Parts(parts) => {
            if parts.is_empty() {
                return Err(GenError::NoValidContent);
            }
            let mut blocks = Vec::new();
            for part in parts {
                match part {
                    ContentPart::Text { text } => {
                        let text = if message.role == Role::System {
                            format!("system: {text}")
                        } else {
                            text.clone()
                        };
                        blocks.push(json!({"type": "text", "text": text}));
                    }
                    ContentPart::Image { data_url } => {
                        let (media_type, data) = dataurl::split(data_url)?;
                        blocks.push(json!({
                            "type": "image",
                            "source": {"type": "base64", "media_type": media_type, "data": data},
                        }));
                    }
                    ContentPart::File { data_url } => {
                        let (media_type, data) = dataurl::split(data_url)?;
                        blocks.push(json!({
                            "type": "document",
                            "source": {"type": "base64", "media_type": media_type, "data": data},
                        }));
                    }
                }
            }
            Ok(json!({"role": wire_role(message.role), "content": blocks}))
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Ai => "assistant",
        Role::System | Role::Human | Role::Tool => "user",
    }
}

pub(super) fn response_from(
    wire: MessagesResponse,
    model: &str,
) -> Result<Response, GenError> {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for block in &wire.content {
        match block.block_type.as_str() {
            "text" => {
                if let Some(t) = &block.text {
                    text.push_str(t);
                }
            }
            "tool_use" => {
                let input = block.input.clone().unwrap_or_else(|| json!({}));
                let arguments = serde_json::to_string(&input)
                    .map_err(|e| GenError::ParseError(format!("tool input: {e}")))?;
                tool_calls.push(Message::tool_call(
                    block.name.clone().unwrap_or_default(),
                    block.id.clone().unwrap_or_default(),
                    arguments,
                ));
            }
            _ => {}
        }
    }

    let mut messages = Vec::new();
    if !text.is_empty() {
        messages.push(Message::text(Role::Ai, text));
    }
    messages.extend(tool_calls);
    if messages.is_empty() {
        return Err(GenError::NoValidContent);
    }

    Ok(Response {
        model: model.to_string(),
        finish_reason: map_stop_reason(wire.stop_reason.as_deref()),
        messages,
        metadata: Default::default(),
        usage: wire.usage.as_ref().map(usage_from),
    })
}

pub(super) fn map_stop_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::MaxTokens,
        Some("tool_use") => FinishReason::ToolUse,
        Some("refusal") => FinishReason::Safety,
        _ => FinishReason::Unknown,
    }
}

pub(super) fn usage_from(wire: &AnthropicUsage) -> Usage {
    Usage {
        input_tokens: wire.input_tokens,
        output_tokens: wire.output_tokens,
        reasoning_tokens: 0,
        cache_creation_tokens: wire.cache_creation_input_tokens,
        cached_tokens: wire.cache_read_input_tokens,
        total_tokens: wire.input_tokens + wire.output_tokens,
        cost: 0.0,
    }
}
