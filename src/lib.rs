//! One chat interface over multiple generative-AI vendors.
//!
//! `unigen` exposes a single request/response model and routes each call to
//! the right vendor adapter (OpenAI, Anthropic, Gemini) based on a model
//! catalog. Vendor differences in message shapes, tool calling, streaming
//! protocols and usage accounting are absorbed by the adapters so application
//! code never branches on the vendor.
//!
//! # Quick start
//!
//! ```no_run
//! use unigen::{generate, GenerateOptions, Message, Request, Role};
//!
//! # async fn run() -> Result<(), unigen::GenError> {
//! let request = Request::new(
//!     "gpt-4o-mini",
//!     vec![Message::text(Role::Human, "What is the capital of France?")],
//! );
//! let response = generate(&request, &GenerateOptions::new()).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! # Streaming
//!
//! ```no_run
//! use std::sync::Arc;
//! use unigen::{generate, GenerateOptions, Message, Request, Role, Streamer};
//!
//! # async fn run() -> Result<(), unigen::GenError> {
//! let streamer: Streamer = Arc::new(|chunk| {
//!     print!("{}", chunk.content);
//!     Ok(())
//! });
//! let request = Request::new(
//!     "claude-3-5-haiku-latest",
//!     vec![Message::text(Role::Human, "Tell me a short story.")],
//! );
//! let options = GenerateOptions::new().with_streamer(streamer);
//! let response = generate(&request, &options).await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod dataurl;
pub mod error;
mod generate;
pub mod options;
pub mod providers;
pub mod schema;
pub mod stream;
pub mod types;

pub use catalog::{ModelCatalog, ModelInfo};
pub use error::GenError;
pub use generate::generate;
pub use options::GenerateOptions;
pub use schema::Schema;
pub use stream::{StreamChunk, Streamer};
pub use types::{
    ContentPart, FinishReason, GenerationConfig, Message, MessageContent, Metadata, Request,
    Response, Role, Tool, ToolCall, ToolResponse, Usage,
};
