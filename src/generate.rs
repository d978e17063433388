//! The router: model resolution and adapter dispatch.

use crate::error::GenError;
use crate::options::GenerateOptions;
use crate::providers::ChatProvider;
use crate::providers::anthropic::Anthropic;
use crate::providers::gemini::Gemini;
use crate::providers::openai::OpenAi;
use crate::types::{Request, Response};

/// Execute one generation call against the provider that serves the
/// requested model.
///
/// The model is resolved through the active catalog before any network I/O;
/// an unknown model or an unmapped provider fails fast. The request itself is
/// passed through to the adapter untouched.
pub async fn generate(
    request: &Request,
    options: &GenerateOptions,
) -> Result<Response, GenError> {
    let provider_id = {
        let info = options
            .catalog()
            .get(&request.model)
            .ok_or_else(|| GenError::ModelNotFound(request.model.clone()))?;
        info.provider.clone()
    };

    tracing::debug!(model = %request.model, provider = %provider_id, "dispatching request");

    match provider_id.as_str() {
        "openai" => OpenAi::new().generate(request, options).await,
        "anthropic" => Anthropic::new().generate(request, options).await,
        "gemini" => Gemini::new().generate(request, options).await,
        _ => Err(GenError::ProviderNotFound(provider_id)),
    }
}
