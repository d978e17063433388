//! SSE aggregation for streaming chat completions.

use eventsource_stream::Event;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::GenError;
use crate::providers::next_event;
use crate::stream::{StreamChunk, Streamer};
use crate::types::{FinishReason, Message, Response, Role, Usage};

use super::convert::usage_from;
use super::types::ChatCompletionChunk;

const DONE_MARKER: &str = "[DONE]";

/// Fold a chat completion event stream into one response, forwarding each
/// content delta to `streamer` as it arrives.
///
/// Usage arrives in a dedicated final frame (requested via
/// `stream_options.include_usage`) and replaces any earlier value.
pub(super) async fn collect<S>(
    mut events: S,
    model: &str,
    streamer: &Streamer,
    cancel: Option<&CancellationToken>,
) -> Result<Response, GenError>
where
    S: Stream<Item = Result<Event, GenError>> + Unpin,
{
    let mut content = String::new();
    let mut usage = Usage::default();

    while let Some(event) = next_event(&mut events, cancel).await? {
        if event.data.trim() == DONE_MARKER {
            break;
        }

        let chunk: ChatCompletionChunk = serde_json::from_str(&event.data)
            .map_err(|e| GenError::ParseError(format!("stream chunk: {e}")))?;

        if let Some(wire_usage) = &chunk.usage {
            usage = usage_from(wire_usage);
        }

        if let Some(choice) = chunk.choices.first()
            && let Some(delta) = &choice.delta.content
            && !delta.is_empty()
        {
            content.push_str(delta);
            streamer(StreamChunk::text(delta.clone()))
                .map_err(|e| GenError::StreamerError(e.to_string()))?;
        }
    }

    tracing::debug!(model, chars = content.len(), "stream complete");

    Ok(Response {
        model: model.to_string(),
        finish_reason: FinishReason::Stop,
        messages: vec![Message::text(Role::Ai, content)],
        metadata: Default::default(),
        usage: Some(usage),
    })
}
