//! SSE aggregation for streaming `generateContent` calls.
//!
//! Each event carries a complete response frame; usage metadata is cumulative
//! so the latest frame's counts replace earlier ones.

use eventsource_stream::Event;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::GenError;
use crate::providers::next_event;
use crate::stream::{StreamChunk, Streamer};
use crate::types::{FinishReason, Message, Response, Role, Usage};

use super::convert::usage_from;
use super::types::GenerateContentResponse;

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
        let frame: GenerateContentResponse = serde_json::from_str(&event.data)
            .map_err(|e| GenError::ParseError(format!("stream frame: {e}")))?;

        if let Some(metadata) = &frame.usage_metadata {
            usage = usage_from(metadata);
        }

        if let Some(candidate) = frame.candidates.first()
            && let Some(candidate_content) = &candidate.content
        {
            for part in &candidate_content.parts {
                if let Some(text) = &part.text
                    && !text.is_empty()
                {
                    content.push_str(text);
                    streamer(StreamChunk::text(text.clone()))
                        .map_err(|e| GenError::StreamerError(e.to_string()))?;
                }
            }
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
