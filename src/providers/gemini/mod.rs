//! Google Gemini `generateContent` adapter.

mod convert;
mod streaming;
mod types;

use async_trait::async_trait;

use crate::error::GenError;
use crate::options::GenerateOptions;
use crate::types::{Request, Response};

use super::{ChatProvider, annotate_cost, execute_json, join_url, open_sse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_VAR: &str = "GEMINI_API_KEY";
const API_KEY_VAR_FALLBACK: &str = "GOOGLE_API_KEY";

/// Adapter for the Gemini `generateContent` API.
#[derive(Debug, Default, Clone, Copy)]
pub struct Gemini;

impl Gemini {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatProvider for Gemini {
    fn id(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &Request,
        options: &GenerateOptions,
    ) -> Result<Response, GenError> {
        let api_key = resolve_api_key(options)?;
        let base_url = options.base_url().unwrap_or(DEFAULT_BASE_URL);
        let cancel = options.cancellation();

        // Catalog entries are vendor-namespaced; the URL takes the bare name.
        let model_path = bare_model_name(&request.model);
        let body = convert::build_request(request, options.use_search())?;
        let client = reqwest::Client::new();

        // Streaming is text-only; tool calling always takes the blocking path.
        if let Some(streamer) = options.streamer()
            && request.tools.is_empty()
        {
            let url = join_url(
                base_url,
                &format!("/v1beta/models/{model_path}:streamGenerateContent?alt=sse"),
            );

            tracing::debug!(model = %request.model, "gemini streaming request");
            let events = open_sse(
                client.post(&url).header("x-goog-api-key", &api_key).json(&body),
                cancel,
            )
            .await?;
            let mut response =
                streaming::collect(events, &request.model, streamer, cancel).await?;
            annotate_cost(&mut response, request, options);
            return Ok(response);
        }

        let url = join_url(base_url, &format!("/v1beta/models/{model_path}:generateContent"));

        tracing::debug!(model = %request.model, "gemini request");
        let wire = execute_json(
            client.post(&url).header("x-goog-api-key", &api_key).json(&body),
            cancel,
        )
        .await?;
        let mut response = convert::response_from(wire, &request.model)?;
        annotate_cost(&mut response, request, options);
        Ok(response)
    }
}

fn resolve_api_key(options: &GenerateOptions) -> Result<String, GenError> {
    options
        .resolve_api_key(API_KEY_VAR)
        .or_else(|_| options.resolve_api_key(API_KEY_VAR_FALLBACK))
        .map_err(|_| GenError::MissingApiKey(API_KEY_VAR))
}

fn bare_model_name(model: &str) -> &str {
    model.split_once('/').map_or(model, |(_, bare)| bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_model_name_strips_vendor_namespace() {
        assert_eq!(bare_model_name("gemini/gemini-2.0-flash"), "gemini-2.0-flash");
        assert_eq!(bare_model_name("gemini-2.0-flash"), "gemini-2.0-flash");
    }
}
