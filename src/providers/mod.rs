//! Provider adapters and the capability trait they implement.
//!
//! Each vendor module owns the full translation contract: outbound request
//! construction, inbound response folding, and the vendor-specific streaming
//! aggregation state machine. Everything HTTP-shaped that the adapters share
//! lives here.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use eventsource_stream::{Event, Eventsource};
use futures::Stream;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::GenError;
use crate::options::GenerateOptions;
use crate::types::{Request, Response};

/// The capability every provider adapter exposes to the router.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider tag, matching the catalog's `provider` field.
    fn id(&self) -> &'static str;

    /// Execute one generation call, streaming when the options ask for it and
    /// the request carries no tools.
    async fn generate(
        &self,
        request: &Request,
        options: &GenerateOptions,
    ) -> Result<Response, GenError>;
}

/// A parsed server-sent-event sequence with transport errors already wrapped.
pub(crate) type SseStream = Pin<Box<dyn Stream<Item = Result<Event, GenError>> + Send>>;

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Price the response's usage against the active catalog. Best-effort: an
/// unknown model leaves the cost at zero.
pub(crate) fn annotate_cost(response: &mut Response, request: &Request, options: &GenerateOptions) {
    if let Some(usage) = &mut response.usage {
        options.catalog().calculate_cost(&request.model, usage);
    }
}

/// Send a request and decode the JSON body, observing cancellation.
///
/// Non-success statuses become [`GenError::ApiError`] with the body attached.
pub(crate) async fn execute_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    cancel: Option<&CancellationToken>,
) -> Result<T, GenError> {
    let send = async {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenError::api(status.as_u16(), body));
        }
        serde_json::from_str(&body)
            .map_err(|e| GenError::ParseError(format!("vendor response: {e}")))
    };

    match cancel {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => Err(GenError::Cancelled),
                result = send => result,
            }
        }
        None => send.await,
    }
}

/// Open a server-sent-event stream, observing cancellation during the
/// handshake. Dropping the returned stream closes the connection.
pub(crate) async fn open_sse(
    request: reqwest::RequestBuilder,
    cancel: Option<&CancellationToken>,
) -> Result<SseStream, GenError> {
    let send = async {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenError::api(status.as_u16(), body));
        }
        let events = response
            .bytes_stream()
            .eventsource()
            .map(|item| item.map_err(|e| GenError::StreamError(e.to_string())));
        Ok(Box::pin(events) as SseStream)
    };

    match cancel {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => Err(GenError::Cancelled),
                result = send => result,
            }
        }
        None => send.await,
    }
}

/// Receive the next SSE event, racing it against cancellation.
///
/// `Ok(None)` signals orderly end of stream.
pub(crate) async fn next_event<S>(
    events: &mut S,
    cancel: Option<&CancellationToken>,
) -> Result<Option<Event>, GenError>
where
    S: Stream<Item = Result<Event, GenError>> + Unpin,
{
    let item = match cancel {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => return Err(GenError::Cancelled),
                item = events.next() => item,
            }
        }
        None => events.next().await,
    };
    item.transpose()
}
