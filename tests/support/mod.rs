#![allow(dead_code)]

//! Shared helpers for the wiremock-backed integration tests.

use std::sync::{Arc, Mutex};

use unigen::{GenerateOptions, Streamer};

/// Options wired to a mock server with a dummy API key.
pub fn mock_options(server_uri: impl Into<String>) -> GenerateOptions {
    GenerateOptions::new()
        .with_base_url(server_uri)
        .with_api_key("test-key")
}

/// A streamer that records every chunk's content.
pub fn recording_streamer() -> (Streamer, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let streamer: Streamer = Arc::new(move |chunk| {
        sink.lock().unwrap().push(chunk.content);
        Ok(())
    });
    (streamer, seen)
}
