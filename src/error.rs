//! Error types for the unified chat interface.

use thiserror::Error;

/// Errors surfaced by [`generate`](crate::generate) and the supporting codecs.
///
/// Validation and resolution problems are detected before any vendor call is
/// made; transport and API failures are wrapped with the phase that produced
/// them and never retried here (retry policy belongs to the caller).
#[derive(Error, Debug)]
pub enum GenError {
    /// Data URL is missing the `data:` prefix, the `;base64,` separator, or
    /// carries an undecodable payload.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// No MIME mapping exists for the file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),

    /// The JSON Schema itself failed to compile.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// An instance did not validate against a schema.
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    /// A message carried neither content parts nor a tool call/response.
    #[error("message has no valid content")]
    NoValidContent,

    /// Request input that cannot be translated to the vendor shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested model is not present in the model catalog.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The catalog resolved a provider with no registered adapter.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// No API key was injected and the provider's environment variable is unset.
    #[error("missing API key: set {0} or inject one via options")]
    MissingApiKey(&'static str),

    /// Transport-level failure from the HTTP client.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success response from a vendor API.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A vendor payload could not be decoded.
    #[error("parse error: {0}")]
    ParseError(String),

    /// The vendor event stream reported a failure mid-flight.
    #[error("stream error: {0}")]
    StreamError(String),

    /// The caller's streamer callback rejected a chunk.
    #[error("streamer callback failed: {0}")]
    StreamerError(String),

    /// The caller's cancellation token fired before the call completed.
    #[error("operation cancelled")]
    Cancelled,
}

impl GenError {
    /// Build an [`GenError::ApiError`] from a vendor status code and body.
    ///
    /// The body is kept verbatim as the message and, when it parses as JSON,
    /// attached as structured details.
    pub fn api(code: u16, body: String) -> Self {
        let details = serde_json::from_str(&body).ok();
        Self::ApiError {
            code,
            message: body,
            details,
        }
    }
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}
