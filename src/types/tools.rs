//! Tool declarations offered to the model.

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// A callable tool the model may invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// JSON Schema describing the expected call arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Schema>,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    pub fn with_input_schema(mut self, schema: Schema) -> Self {
        self.input_schema = Some(schema);
        self
    }
}
