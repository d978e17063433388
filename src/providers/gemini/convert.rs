//! Translation between the unified chat model and the Gemini wire format.

use serde_json::json;

use crate::dataurl;
use crate::error::GenError;
use crate::types::{
    ContentPart, FinishReason, Message, MessageContent, Request, Response, Role, Usage,
};

use super::types::{
    Blob, Candidate, Content, FunctionCall, FunctionCallingConfig, FunctionDeclaration,
    FunctionResponse, GeminiTool, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, ToolConfig, UsageMetadata,
};

pub(super) fn build_request(
    request: &Request,
    use_search: bool,
) -> Result<GenerateContentRequest, GenError> {
    let mut system_text = String::new();
    let mut contents = Vec::new();

    for message in &request.messages {
        // System turns are lifted out into the dedicated instruction slot.
        if message.role == Role::System
            && matches!(message.content, MessageContent::Parts(_))
        {
            if !system_text.is_empty() {
                system_text.push('\n');
            }
            system_text.push_str(&message.content_text());
            continue;
        }
        contents.push(convert_message(message)?);
    }

    let system_instruction = (!system_text.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part::text(system_text)],
    });

    let mut generation_config = GenerationConfig {
        max_output_tokens: request.config.max_tokens.unwrap_or(2048),
        temperature: request.config.temperature,
        top_p: request.config.top_p,
        presence_penalty: request.config.presence_penalty,
        frequency_penalty: request.config.frequency_penalty,
        stop_sequences: request.config.stop_sequences.clone(),
        ..GenerationConfig::default()
    };
    if let Some(schema) = &request.response_schema {
        generation_config.response_mime_type = Some("application/json".to_string());
        generation_config.response_schema = Some(schema.as_value().clone());
    }

    let mut tools = Vec::new();
    if !request.tools.is_empty() {
        tools.push(GeminiTool {
            function_declarations: Some(
                request
                    .tools
                    .iter()
                    .map(|tool| FunctionDeclaration {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.input_schema.as_ref().map(|s| s.as_value().clone()),
                    })
                    .collect(),
            ),
            ..GeminiTool::default()
        });
    }
    if use_search {
        tools.push(GeminiTool {
            google_search: Some(json!({})),
            ..GeminiTool::default()
        });
    }

    let tool_config = (request.must_call_tool && !request.tools.is_empty()).then(|| ToolConfig {
        function_calling_config: FunctionCallingConfig {
            mode: "ANY".to_string(),
        },
    });

    Ok(GenerateContentRequest {
        contents,
        system_instruction,
        tools: (!tools.is_empty()).then_some(tools),
        tool_config,
        generation_config: Some(generation_config),
    })
}

fn convert_message(message: &Message) -> Result<Content, GenError> {
    match &message.content {
        MessageContent::ToolCall(call) => {
            let args = serde_json::from_str(&call.arguments)
                .map_err(|e| GenError::InvalidInput(format!("tool call arguments: {e}")))?;
            Ok(Content {
                role: Some("model".to_string()),
                parts: vec![Part {
                    function_call: Some(FunctionCall {
                        name: call.name.clone(),
                        id: (!call.id.is_empty()).then(|| call.id.clone()),
                        args: Some(args),
                    }),
                    ..Part::default()
                }],
            })
        }
        MessageContent::ToolResponse(resp) => Ok(Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: resp.name.clone(),
                    response: json!({"name": resp.name, "content": resp.result}),
                }),
                ..Part::default()
            }],
        }),
        MessageContent::Parts(parts) => {
            if parts.is_empty() {
                return Err(GenError::NoValidContent);
            }
            let mut wire_parts = Vec::new();
            for part in parts {
                match part {
                    ContentPart::Text { text } => wire_parts.push(Part::text(text.clone())),
                    ContentPart::Image { data_url } | ContentPart::File { data_url } => {
                        let (mime_type, data) = dataurl::split(data_url)?;
                        wire_parts.push(Part {
                            inline_data: Some(Blob {
                                mime_type: mime_type.to_string(),
                                data: data.to_string(),
                            }),
                            ..Part::default()
                        });
                    }
                }
            }
            Ok(Content {
                role: Some(wire_role(message.role).to_string()),
                parts: wire_parts,
            })
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Ai => "model",
        Role::System | Role::Human | Role::Tool => "user",
    }
}

pub(super) fn response_from(
    wire: GenerateContentResponse,
    model: &str,
) -> Result<Response, GenError> {
    let Some(candidate) = wire.candidates.into_iter().next() else {
        return Err(GenError::ParseError("no candidates in response".to_string()));
    };

    let (messages, has_tool_calls) = fold_candidate(&candidate)?;
    if messages.is_empty() {
        return Err(GenError::NoValidContent);
    }

    let finish_reason = if has_tool_calls {
        FinishReason::ToolUse
    } else {
        map_finish_reason(candidate.finish_reason.as_deref())
    };

    Ok(Response {
        model: model.to_string(),
        finish_reason,
        messages,
        metadata: Default::default(),
        usage: wire.usage_metadata.as_ref().map(usage_from),
    })
}

fn fold_candidate(candidate: &Candidate) -> Result<(Vec<Message>, bool), GenError> {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    if let Some(content) = &candidate.content {
        for part in &content.parts {
            if let Some(t) = &part.text {
                text.push_str(t);
            }
            if let Some(call) = &part.function_call {
                let arguments = match &call.args {
                    Some(args) => serde_json::to_string(args)
                        .map_err(|e| GenError::ParseError(format!("function args: {e}")))?,
                    None => "{}".to_string(),
                };
                tool_calls.push(Message::tool_call(
                    call.name.clone(),
                    call.id.clone().unwrap_or_default(),
                    arguments,
                ));
            }
        }
    }

    let mut messages = Vec::new();
    if !text.is_empty() {
        messages.push(Message::text(Role::Ai, text));
    }
    let has_tool_calls = !tool_calls.is_empty();
    messages.extend(tool_calls);
    Ok((messages, has_tool_calls))
}

pub(super) fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::MaxTokens,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT")
        | Some("SPII") | Some("IMAGE_SAFETY") => FinishReason::Safety,
        Some("MALFORMED_FUNCTION_CALL") => FinishReason::Error,
        _ => FinishReason::Unknown,
    }
}

pub(super) fn usage_from(wire: &UsageMetadata) -> Usage {
    Usage {
        input_tokens: wire.prompt_token_count,
        output_tokens: wire.candidates_token_count,
        reasoning_tokens: wire.thoughts_token_count,
        cache_creation_tokens: 0,
        cached_tokens: wire.cached_content_token_count,
        total_tokens: wire.total_token_count,
        cost: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::types::{GenerationConfig as UnifiedConfig, Tool};

    fn request(messages: Vec<Message>) -> Request {
        Request::new("gemini-2.0-flash", messages)
    }

    #[test]
    fn system_turns_are_lifted_into_instruction() {
        let req = request(vec![
            Message::text(Role::System, "be terse"),
            Message::text(Role::Human, "hi"),
        ]);
        let wire = build_request(&req, false).unwrap();

        let instruction = wire.system_instruction.unwrap();
        assert_eq!(instruction.parts[0].text.as_deref(), Some("be terse"));
        assert_eq!(wire.contents.len(), 1);
        assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
    }

    #[test]
    fn config_defaults_and_overrides() {
        let req = request(vec![Message::text(Role::Human, "hi")]);
        let wire = build_request(&req, false).unwrap();
        assert_eq!(wire.generation_config.unwrap().max_output_tokens, 2048);

        let req = request(vec![Message::text(Role::Human, "hi")]).with_config(UnifiedConfig {
            max_tokens: Some(300),
            temperature: Some(0.2),
            ..UnifiedConfig::default()
        });
        let config = build_request(&req, false).unwrap().generation_config.unwrap();
        assert_eq!(config.max_output_tokens, 300);
        assert_eq!(config.temperature, Some(0.2));
    }

    #[test]
    fn response_schema_switches_to_json_output() {
        let schema = Schema::parse(r#"{"type":"object"}"#).unwrap();
        let req = request(vec![Message::text(Role::Human, "hi")]).with_response_schema(schema);
        let config = build_request(&req, false).unwrap().generation_config.unwrap();

        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert!(config.response_schema.is_some());
    }

    #[test]
    fn tool_forcing_sets_mode_any() {
        let req = request(vec![Message::text(Role::Human, "weather?")])
            .with_tools(vec![Tool::new("get_weather", "Get the weather")])
            .with_must_call_tool(true);
        let wire = build_request(&req, false).unwrap();

        assert!(wire.tools.as_ref().unwrap()[0].function_declarations.is_some());
        let config = wire.tool_config.unwrap();
        assert_eq!(config.function_calling_config.mode, "ANY");
    }

    #[test]
    fn search_adds_google_search_tool() {
        let req = request(vec![Message::text(Role::Human, "news?")]);
        let wire = build_request(&req, true).unwrap();
        let tools = wire.tools.unwrap();
        assert_eq!(tools.len(), 1);
        assert!(tools[0].google_search.is_some());
    }

    #[test]
    fn media_parts_become_inline_blobs() {
        let data_url = dataurl::encode("image/png", &[0x89, 0x50, 0x4E, 0x47]);
        let msg = Message {
            role: Role::Human,
            content: MessageContent::Parts(vec![ContentPart::Image { data_url }]),
        };
        let content = convert_message(&msg).unwrap();
        let blob = content.parts[0].inline_data.as_ref().unwrap();
        assert_eq!(blob.mime_type, "image/png");
    }

    #[test]
    fn tool_exchange_round_trips_through_wire_parts() {
        let call = convert_message(&Message::tool_call("f", "call_1", r#"{"a":1}"#)).unwrap();
        assert_eq!(call.role.as_deref(), Some("model"));
        assert_eq!(call.parts[0].function_call.as_ref().unwrap().name, "f");

        let resp = convert_message(&Message::tool_response("f", "call_1", "42")).unwrap();
        assert_eq!(resp.role.as_deref(), Some("user"));
        let fr = resp.parts[0].function_response.as_ref().unwrap();
        assert_eq!(fr.response["content"], "42");
    }

    #[test]
    fn finish_reasons_follow_the_vendor_table() {
        assert_eq!(map_finish_reason(Some("STOP")), FinishReason::Stop);
        assert_eq!(map_finish_reason(Some("MAX_TOKENS")), FinishReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("SAFETY")), FinishReason::Safety);
        assert_eq!(map_finish_reason(Some("RECITATION")), FinishReason::Safety);
        assert_eq!(
            map_finish_reason(Some("MALFORMED_FUNCTION_CALL")),
            FinishReason::Error
        );
        assert_eq!(map_finish_reason(Some("OTHER")), FinishReason::Unknown);
        assert_eq!(map_finish_reason(None), FinishReason::Unknown);
    }

    #[test]
    fn function_calls_force_tool_use_finish() {
        let wire: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [
                        {"functionCall": {"name": "get_weather", "args": {"city": "Tokyo"}}}
                    ]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {
                    "promptTokenCount": 7, "candidatesTokenCount": 3,
                    "totalTokenCount": 10, "thoughtsTokenCount": 1
                }
            }"#,
        )
        .unwrap();

        let resp = response_from(wire, "gemini-2.0-flash").unwrap();
        assert_eq!(resp.finish_reason, FinishReason::ToolUse);
        assert_eq!(resp.tool_calls().len(), 1);
        let usage = resp.usage.unwrap();
        assert_eq!(usage.reasoning_tokens, 1);
        assert_eq!(usage.total_tokens, 10);
    }

    #[test]
    fn empty_candidates_is_a_parse_error() {
        let wire: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            response_from(wire, "gemini-2.0-flash"),
            Err(GenError::ParseError(_))
        ));
    }
}
