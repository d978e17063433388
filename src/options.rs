//! Per-call configuration bag.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::catalog::ModelCatalog;
use crate::stream::Streamer;

/// Options recognized by [`generate`](crate::generate) and passed through to
/// the selected adapter unchanged.
#[derive(Clone, Default)]
pub struct GenerateOptions {
    pub(crate) streamer: Option<Streamer>,
    pub(crate) base_url: Option<String>,
    pub(crate) catalog: Option<Arc<ModelCatalog>>,
    pub(crate) api_key: Option<String>,
    pub(crate) use_search: bool,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream incremental chunks to `streamer` instead of blocking for the
    /// full response. Ignored when the request carries tools.
    pub fn with_streamer(mut self, streamer: Streamer) -> Self {
        self.streamer = Some(streamer);
        self
    }

    /// Override the vendor endpoint, e.g. for proxies or self-hosted gateways.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the bundled model catalog.
    pub fn with_catalog(mut self, catalog: Arc<ModelCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Inject an API key, overriding the provider's environment variable.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Enable the vendor-native web search tool.
    pub fn with_search(mut self) -> Self {
        self.use_search = true;
        self
    }

    /// Observe `token` at every suspension point; firing it aborts the call
    /// with [`GenError::Cancelled`](crate::error::GenError::Cancelled).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The effective catalog: the injected one, or the bundled default.
    pub fn catalog(&self) -> &ModelCatalog {
        match &self.catalog {
            Some(catalog) => catalog,
            None => ModelCatalog::bundled(),
        }
    }

    pub fn streamer(&self) -> Option<&Streamer> {
        self.streamer.as_ref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn use_search(&self) -> bool {
        self.use_search
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// The API key for a provider: the injected key wins, then `env_var`.
    pub(crate) fn resolve_api_key(
        &self,
        env_var: &'static str,
    ) -> Result<String, crate::error::GenError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(env_var).map_err(|_| crate::error::GenError::MissingApiKey(env_var))
    }
}

impl std::fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("has_streamer", &self.streamer.is_some())
            .field("base_url", &self.base_url)
            .field("has_catalog", &self.catalog.is_some())
            .field("has_api_key", &self.api_key.is_some())
            .field("use_search", &self.use_search)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish()
    }
}
