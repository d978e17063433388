//! JSON Schema wrapper used for tool inputs and structured output.
//!
//! A [`Schema`] is a plain JSON value that is guaranteed to compile as a JSON
//! Schema at construction time. Validation itself is delegated to the
//! `jsonschema` crate; this module only exposes the pass/fail contract the
//! adapters need.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenError;

/// A compiled-once JSON Schema carried as a JSON value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Schema(Value);

impl Schema {
    /// Parse a schema from a JSON string, rejecting schemas that do not compile.
    pub fn parse(s: &str) -> Result<Self, GenError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| GenError::InvalidSchema(e.to_string()))?;
        Self::from_value(value)
    }

    /// Wrap a JSON value, rejecting values that do not compile as a schema.
    pub fn from_value(value: Value) -> Result<Self, GenError> {
        jsonschema::validator_for(&value)
            .map_err(|e| GenError::InvalidSchema(e.to_string()))?;
        Ok(Self(value))
    }

    /// Borrow the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `properties` object of the schema, if present.
    pub fn properties(&self) -> Option<&Value> {
        self.0.get("properties")
    }

    /// Render the schema as a JSON string.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    /// Validate an instance against this schema.
    ///
    /// Collects up to the first three violation messages into the error.
    pub fn validate(&self, instance: &Value) -> Result<(), GenError> {
        let validator = jsonschema::validator_for(&self.0)
            .map_err(|e| GenError::InvalidSchema(e.to_string()))?;
        if validator.validate(instance).is_err() {
            let msgs: Vec<String> = validator
                .iter_errors(instance)
                .take(3)
                .map(|err| format!("{err} at {}", err.instance_path))
                .collect();
            return Err(GenError::SchemaValidation(msgs.join("; ")));
        }
        Ok(())
    }
}
