//! Anthropic Messages adapter.

mod convert;
mod streaming;
mod types;

use async_trait::async_trait;
use serde_json::json;

use crate::error::GenError;
use crate::options::GenerateOptions;
use crate::types::{Request, Response};

use super::{ChatProvider, annotate_cost, execute_json, join_url, open_sse};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const API_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic Messages API.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anthropic;

impl Anthropic {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatProvider for Anthropic {
    fn id(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(
        &self,
        request: &Request,
        options: &GenerateOptions,
    ) -> Result<Response, GenError> {
        let api_key = options.resolve_api_key(API_KEY_VAR)?;
        let base_url = options.base_url().unwrap_or(DEFAULT_BASE_URL);
        let url = join_url(base_url, "/v1/messages");
        let cancel = options.cancellation();

        let mut body = convert::build_request_body(request, options.use_search())?;
        let client = reqwest::Client::new();
        let post = |body: &serde_json::Value| {
            client
                .post(&url)
                .header("x-api-key", &api_key)
                .header("anthropic-version", API_VERSION)
                .json(body)
        };

        // Streaming is text-only; tool calling always takes the blocking path.
        if let Some(streamer) = options.streamer()
            && request.tools.is_empty()
        {
            body["stream"] = json!(true);

            tracing::debug!(model = %request.model, "anthropic streaming request");
            let events = open_sse(post(&body), cancel).await?;
            let mut response =
                streaming::collect(events, &request.model, streamer, cancel).await?;
            annotate_cost(&mut response, request, options);
            return Ok(response);
        }

        tracing::debug!(model = %request.model, "anthropic request");
        let wire = execute_json(post(&body), cancel).await?;
        let mut response = convert::response_from(wire, &request.model)?;
        annotate_cost(&mut response, request, options);
        Ok(response)
    }
}
