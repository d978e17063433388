//! Data-URL codec for inline binary media.
//!
//! Image and file content parts carry their payload as
//! `data:<mime>;base64,<payload>` strings so that a message is fully
//! self-describing without side-channel attachments.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::GenError;

const DATA_PREFIX: &str = "data:";
const BASE64_SEPARATOR: &str = ";base64,";

/// Encode raw bytes as a base64 data URL with the given MIME type.
pub fn encode(mime_type: &str, data: &[u8]) -> String {
    format!("{DATA_PREFIX}{mime_type}{BASE64_SEPARATOR}{}", BASE64.encode(data))
}

/// Encode a file as a data URL, deriving the MIME type from the extension.
///
/// Returns the data URL together with the detected MIME type. Fails with
/// [`GenError::UnknownExtension`] when no MIME mapping exists for the path.
pub fn encode_from_path(path: impl AsRef<Path>) -> Result<(String, String), GenError> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| GenError::InvalidInput(format!("read {}: {e}", path.display())))?;
    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .ok_or_else(|| GenError::UnknownExtension(path.display().to_string()))?;
    Ok((encode(mime_type, &data), mime_type.to_string()))
}

/// Decode a data URL into its raw bytes and MIME type.
pub fn decode(data_url: &str) -> Result<(Vec<u8>, String), GenError> {
    let (mime_type, encoded) = split(data_url)?;
    let data = BASE64
        .decode(encoded)
        .map_err(|e| GenError::InvalidDataUrl(format!("base64 decode failed: {e}")))?;
    Ok((data, mime_type.to_string()))
}

/// Cheap structural check: `data:` prefix plus a `;base64,` separator.
///
/// Does not validate the base64 payload; use it as a guard before
/// [`decode`] or [`split`].
pub fn is_data_url(data_url: &str) -> bool {
    data_url.starts_with(DATA_PREFIX) && data_url.contains(BASE64_SEPARATOR)
}

/// Split a data URL into its MIME type and still-encoded base64 payload.
///
/// Adapters that forward base64 directly to a vendor API use this to avoid a
/// decode/re-encode round trip.
pub fn split(data_url: &str) -> Result<(&str, &str), GenError> {
    let rest = data_url
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| GenError::InvalidDataUrl(data_url.to_string()))?;
    rest.split_once(BASE64_SEPARATOR)
        .ok_or_else(|| GenError::InvalidDataUrl(data_url.to_string()))
}
