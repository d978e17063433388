//! SSE aggregation for streaming messages calls.
//!
//! Input tokens arrive once in `message_start`; output tokens arrive
//! incrementally in `message_delta` events and are summed.

use eventsource_stream::Event;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::GenError;
use crate::providers::next_event;
use crate::stream::{StreamChunk, Streamer};
use crate::types::{FinishReason, Message, Response, Role, Usage};

use super::types::StreamEvent;

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
        let frame: StreamEvent = serde_json::from_str(&event.data)
            .map_err(|e| GenError::ParseError(format!("stream event: {e}")))?;

        match frame.event_type.as_str() {
            "message_start" => {
                if let Some(start_usage) = frame.message.and_then(|m| m.usage) {
                    usage.input_tokens = start_usage.input_tokens;
                    usage.cache_creation_tokens = start_usage.cache_creation_input_tokens;
                    usage.cached_tokens = start_usage.cache_read_input_tokens;
                }
            }
            "content_block_delta" => {
                if let Some(text) = frame.delta.and_then(|d| d.text)
                    && !text.is_empty()
                {
                    content.push_str(&text);
                    streamer(StreamChunk::text(text))
                        .map_err(|e| GenError::StreamerError(e.to_string()))?;
                }
            }
            "message_delta" => {
                if let Some(delta_usage) = &frame.usage {
                    usage.output_tokens += delta_usage.output_tokens;
                }
            }
            "message_stop" => break,
            "error" => {
                let message = frame.error.map(|e| e.message).unwrap_or_default();
                return Err(GenError::StreamError(message));
            }
            _ => {}
        }
    }

    usage.total_tokens = usage.input_tokens + usage.output_tokens;
    tracing::debug!(model, chars = content.len(), "stream complete");

    Ok(Response {
        model: model.to_string(),
        finish_reason: FinishReason::Stop,
        messages: vec![Message::text(Role::Ai, content)],
        metadata: Default::default(),
        usage: Some(usage),
    })
}
