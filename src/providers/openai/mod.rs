//! OpenAI Chat Completions adapter.

mod convert;
mod streaming;
mod types;

use async_trait::async_trait;
use serde_json::json;

use crate::error::GenError;
use crate::options::GenerateOptions;
use crate::types::{Request, Response};

use super::{ChatProvider, annotate_cost, execute_json, join_url, open_sse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Adapter for the OpenAI Chat Completions API.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAi;

impl OpenAi {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatProvider for OpenAi {
    fn id(&self) -> &'static str {
        "openai"
    }

    async fn generate(
        &self,
        request: &Request,
        options: &GenerateOptions,
    ) -> Result<Response, GenError> {
        let api_key = options.resolve_api_key(API_KEY_VAR)?;
        let base_url = options.base_url().unwrap_or(DEFAULT_BASE_URL);
        let url = join_url(base_url, "/chat/completions");
        let cancel = options.cancellation();

        let mut body = convert::build_request_body(request, options.use_search())?;
        let client = reqwest::Client::new();

        // Streaming is text-only; tool calling always takes the blocking path.
        if let Some(streamer) = options.streamer()
            && request.tools.is_empty()
        {
            body["stream"] = json!(true);
            body["stream_options"] = json!({"include_usage": true});

            tracing::debug!(model = %request.model, "openai streaming request");
            let events =
                open_sse(client.post(&url).bearer_auth(&api_key).json(&body), cancel).await?;
            let mut response =
                streaming::collect(events, &request.model, streamer, cancel).await?;
            annotate_cost(&mut response, request, options);
            return Ok(response);
        }

        tracing::debug!(model = %request.model, "openai request");
        let chat = execute_json(client.post(&url).bearer_auth(&api_key).json(&body), cancel)
            .await?;
        let mut response = convert::response_from(chat, &request.model)?;
        annotate_cost(&mut response, request, options);
        Ok(response)
    }
}
