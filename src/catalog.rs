//! Model catalog: model identifier to provider, limits and per-token costs.
//!
//! A catalog is loaded once and never mutated afterwards, so it can be shared
//! across concurrent calls without synchronization. The default catalog is
//! embedded at build time; callers may inject their own through
//! [`GenerateOptions`](crate::options::GenerateOptions).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::types::Usage;

/// Per-model pricing, limits and capability flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier, possibly vendor-namespaced (`"gemini/gemini-2.0-flash"`).
    pub model: String,
    /// Provider tag used by the router to select an adapter.
    pub provider: String,
    #[serde(default)]
    pub max_tokens: u32,
    #[serde(default)]
    pub max_input_tokens: u32,
    #[serde(default)]
    pub max_output_tokens: u32,
    #[serde(rename = "input_cost_per_token", default)]
    pub input_token_cost: f64,
    #[serde(rename = "output_cost_per_token", default)]
    pub output_token_cost: f64,
    #[serde(rename = "cache_creation_input_token_cost", default)]
    pub cache_creation_token_cost: f64,
    #[serde(rename = "cache_read_input_token_cost", default)]
    pub cache_read_token_cost: f64,
    #[serde(default)]
    pub supports_web_search: bool,
    #[serde(default)]
    pub supports_vision: bool,
    #[serde(default)]
    pub supports_pdf_input: bool,
}

/// An ordered, read-only list of model entries.
///
/// Entries are not deduplicated; the first match wins, so whoever builds a
/// catalog must guarantee uniqueness upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog(Vec<ModelInfo>);

static BUNDLED: Lazy<ModelCatalog> = Lazy::new(|| {
    // Compile-time resource; failing to parse it is a build defect, not a
    // runtime condition.
    ModelCatalog::from_json(include_str!("modelcatalog.json"))
        .expect("bundled model catalog is malformed")
});

impl ModelCatalog {
    /// Parse a catalog from its JSON file format.
    pub fn from_json(json: &str) -> Result<Self, GenError> {
        serde_json::from_str(json).map_err(|e| GenError::ParseError(format!("model catalog: {e}")))
    }

    /// The catalog bundled with the crate, loaded once per process.
    pub fn bundled() -> &'static ModelCatalog {
        &BUNDLED
    }

    pub fn new(entries: Vec<ModelInfo>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelInfo> {
        self.0.iter()
    }

    /// Look up a model by identifier.
    ///
    /// Exact match first; a vendor-namespaced entry like
    /// `"gemini/gemini-2.0-flash"` also matches the bare query
    /// `"gemini-2.0-flash"` via the substring after the first `/`.
    pub fn get(&self, model: &str) -> Option<&ModelInfo> {
        self.0.iter().find(|info| {
            info.model == model
                || info
                    .model
                    .split_once('/')
                    .is_some_and(|(_, bare)| bare == model)
        })
    }

    /// Compute and write the cost for `usage` in place.
    ///
    /// Returns whether annotation occurred; an unknown model is not an error
    /// because cost is auxiliary telemetry, not part of the functional result.
    pub fn calculate_cost(&self, model: &str, usage: &mut Usage) -> bool {
        match self.get(model) {
            Some(info) => {
                usage.cost = cost_of(info, usage);
                true
            }
            None => false,
        }
    }
}

/// USD cost of a generation: input and output tokens only.
///
/// Reasoning, cache-creation and cached-read rates are carried by the catalog
/// but deliberately not priced here.
fn cost_of(model: &ModelInfo, usage: &Usage) -> f64 {
    model.input_token_cost * f64::from(usage.input_tokens)
        + model.output_token_cost * f64::from(usage.output_tokens)
}
