//! Source validation of JSON values against a schema graph.
//!
//! This is the schema's own notion of acceptance, used to check that a
//! generated JSON Schema accepts the same values. Kinds without a JSON value
//! domain are read the way the converter encodes them, so the context carries
//! the same strategies as [`Settings`]:
//!
//! - `date`: an RFC 3339 date-time string, or an integer unix timestamp under
//!   [`DateStrategy::Integer`]
//! - `bigint`: an integer, or any string under [`BigIntStrategy::String`]
//! - `undefined`, `nan`, `symbol`: no JSON value matches
//!
//! Reference chains through lazy nodes are bounded by
//! [`ValidationContext::max_depth`], so a graph that loops without consuming
//! input fails instead of overflowing the stack.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::interop::{BigIntStrategy, DateStrategy, Settings};
use crate::path::JsonPath;
use crate::schema::{combinators, object, Schema, SchemaKind};

/// Default bound on nested lazy references.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Depth tracking for lazy references, plus the encodings expected for
/// `date` and `bigint` values.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    depth: usize,
    max_depth: usize,
    date_strategy: DateStrategy,
    bigint_strategy: BigIntStrategy,
}

impl ValidationContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            date_strategy: DateStrategy::default(),
            bigint_strategy: BigIntStrategy::default(),
        }
    }

    /// Reads `date` and `bigint` values the way `settings` encodes them.
    pub fn with_settings(self, settings: &Settings) -> Self {
        Self {
            date_strategy: settings.date_strategy,
            bigint_strategy: settings.bigint_strategy,
            ..self
        }
    }

    /// Context for the target of a lazy reference.
    pub fn increment_depth(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    pub fn date_strategy(&self) -> DateStrategy {
        self.date_strategy
    }

    pub fn bigint_strategy(&self) -> BigIntStrategy {
        self.bigint_strategy
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Schema {
    /// Validates `value`, accumulating every failure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blueprint::{JsonPath, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::nullable(Schema::number());
    ///
    /// assert!(schema.validate(&json!(null), &JsonPath::root()).is_success());
    /// assert!(schema.validate(&json!(3), &JsonPath::root()).is_success());
    /// assert!(schema.validate(&json!("3"), &JsonPath::root()).is_failure());
    /// ```
    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, path, &ValidationContext::default())
    }

    pub fn validate_with_context(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> Validation<Value, SchemaErrors> {
        match self.kind() {
            SchemaKind::Any => Validation::Success(value.clone()),
            SchemaKind::Null => expect(value.is_null(), value, path, "null"),
            SchemaKind::Boolean => expect(value.is_boolean(), value, path, "boolean"),
            SchemaKind::Undefined | SchemaKind::Nan | SchemaKind::Symbol => {
                expect(false, value, path, self.kind().name())
            }
            SchemaKind::Number(number) => number.validate(value, path),
            SchemaKind::String(string) => string.validate(value, path),
            SchemaKind::Date => {
                expect(is_date(value, context.date_strategy), value, path, "date")
            }
            SchemaKind::BigInt => {
                expect(is_bigint(value, context.bigint_strategy), value, path, "bigint")
            }
            SchemaKind::Literal(literal) => combinators::validate_literal(literal, value, path),
            SchemaKind::Nullable(inner) => {
                combinators::validate_nullable(inner, value, path, context)
            }
            SchemaKind::Optional(inner) => inner.validate_with_context(value, path, context),
            SchemaKind::Object(obj) => obj.validate_with_context(value, path, context),
            SchemaKind::Record(entry) => object::validate_record(entry, value, path, context),
            SchemaKind::Array(array) => array.validate_with_context(value, path, context),
            SchemaKind::Tuple(tuple) => tuple.validate_with_context(value, path, context),
            SchemaKind::Picklist(values) => {
                combinators::validate_one_of_values(values, value, path)
            }
            SchemaKind::Enum(entries) => {
                combinators::validate_one_of_values(entries.values(), value, path)
            }
            SchemaKind::Union(members) => {
                combinators::validate_union(members, value, path, context)
            }
            SchemaKind::Intersection(members) => {
                combinators::validate_intersection(members, value, path, context)
            }
            SchemaKind::Lazy(lazy) => lazy.validate_with_context(value, path, context),
            SchemaKind::Annotated(annotated) => {
                annotated.inner().validate_with_context(value, path, context)
            }
        }
    }
}

fn expect(
    matched: bool,
    value: &Value,
    path: &JsonPath,
    expected: &str,
) -> Validation<Value, SchemaErrors> {
    if matched {
        Validation::Success(value.clone())
    } else {
        Validation::Failure(SchemaErrors::single(SchemaError::invalid_type(
            path, expected, value,
        )))
    }
}

fn is_date(value: &Value, strategy: DateStrategy) -> bool {
    match (strategy, value) {
        (DateStrategy::String, Value::String(s)) => {
            chrono::DateTime::parse_from_rfc3339(s).is_ok()
        }
        (DateStrategy::Integer, value) => is_integer(value),
        _ => false,
    }
}

// The string encoding carries no pattern, so any string is a bigint there.
fn is_bigint(value: &Value, strategy: BigIntStrategy) -> bool {
    match strategy {
        BigIntStrategy::String => value.is_string(),
        BigIntStrategy::Integer => is_integer(value),
    }
}

/// `type: integer` in draft-07 also admits floats with no fractional part.
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        _ => false,
    }
}
