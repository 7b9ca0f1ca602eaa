//! Conversion inputs.
//!
//! [`Settings`] holds the encoding policies and deserializes from camelCase
//! keys, so it can be read straight out of a config file:
//!
//! ```rust
//! use blueprint::{DateStrategy, Settings};
//!
//! let settings: Settings =
//!     serde_json::from_str(r#"{ "dateStrategy": "integer", "strictObjectTypes": true }"#).unwrap();
//! assert_eq!(settings.date_strategy, DateStrategy::Integer);
//! assert!(settings.strict_object_types);
//! assert!(!settings.ignore_unknown_validation);
//! ```

use serde::{Deserialize, Serialize};

use crate::definitions::Definitions;
use crate::schema::Schema;

/// How `date` nodes are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStrategy {
    /// RFC 3339 string, `format: date-time`.
    #[default]
    String,
    /// Unix timestamp, `format: unix-time`.
    Integer,
}

/// How `bigint` nodes are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BigIntStrategy {
    String,
    /// `type: integer, format: int64`.
    #[default]
    Integer,
}

/// How `undefined` nodes are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedStrategy {
    /// The empty schema `{}`.
    #[default]
    Any,
}

/// Encoding policies shared by every node of one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Emit `additionalProperties: false` on every object.
    pub strict_object_types: bool,
    pub date_strategy: DateStrategy,
    pub undefined_strategy: UndefinedStrategy,
    pub bigint_strategy: BigIntStrategy,
    /// Drop refinements with no JSON Schema keyword instead of failing.
    pub ignore_unknown_validation: bool,
}

/// Everything [`to_json_schema`](super::to_json_schema) needs.
///
/// At least one of a root schema or a non-empty definitions set is required.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub(crate) schema: Option<Schema>,
    pub(crate) definitions: Definitions,
    pub(crate) settings: Settings,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn definitions(mut self, definitions: Definitions) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn strict_object_types(mut self, strict: bool) -> Self {
        self.settings.strict_object_types = strict;
        self
    }

    pub fn date_strategy(mut self, strategy: DateStrategy) -> Self {
        self.settings.date_strategy = strategy;
        self
    }

    pub fn bigint_strategy(mut self, strategy: BigIntStrategy) -> Self {
        self.settings.bigint_strategy = strategy;
        self
    }

    pub fn undefined_strategy(mut self, strategy: UndefinedStrategy) -> Self {
        self.settings.undefined_strategy = strategy;
        self
    }

    pub fn ignore_unknown_validation(mut self, ignore: bool) -> Self {
        self.settings.ignore_unknown_validation = ignore;
        self
    }

    pub fn settings_ref(&self) -> &Settings {
        &self.settings
    }
}
