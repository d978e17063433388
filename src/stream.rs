//! Streaming callback types.
//!
//! During streaming generation the adapter invokes a caller-supplied
//! [`Streamer`] once per incremental chunk, in delivery order. Chunks carry
//! only the delta, never cumulative content.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// One incremental output chunk.
///
/// `type` defaults to `"text"`; the field exists for forward-compatible
/// extension (e.g. future thinking chunks) and consumers must ignore
/// unrecognized types rather than fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    #[serde(rename = "type")]
    pub chunk_type: String,
    pub content: String,
}

impl StreamChunk {
    /// A plain text delta chunk.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            chunk_type: "text".to_string(),
            content: content.into(),
        }
    }

    /// The chunk serialized to its JSON wire shape.
    pub fn to_json(&self) -> String {
        // Serialization of two string fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Caller-supplied callback invoked per incremental chunk.
///
/// Returning an error aborts the whole call; no partial response is produced.
pub type Streamer = Arc<dyn Fn(StreamChunk) -> Result<(), GenError> + Send + Sync>;
