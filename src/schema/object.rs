//! Object schemas.
//!
//! [`ObjectSchema`] matches JSON objects with declared properties. Properties
//! keep declaration order. A property wrapped in [`Schema::optional`] may be
//! absent; every other declared property is required.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

use super::traits::{run_checks, CustomCheck};
use super::{Schema, SchemaKind};

/// A schema matching objects with declared properties.
///
/// By default undeclared properties are allowed and passed through. A strict
/// object (see [`ObjectSchema::strict`]) rejects them.
///
/// # Example
///
/// ```rust
/// use blueprint::{JsonPath, Schema};
/// use serde_json::json;
///
/// let schema = Schema::strict_object()
///     .field("name", Schema::string())
///     .optional("age", Schema::integer());
///
/// assert!(schema.validate(&json!({ "name": "Ada" }), &JsonPath::root()).is_success());
///
/// let errors = schema
///     .validate(&json!({ "name": "Ada", "extra": 1 }), &JsonPath::root())
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.first().code, "additional_property");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, Schema>,
    strict: bool,
    checks: Vec<CustomCheck>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared properties in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Schema> {
        &self.fields
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn checks(&self) -> &[CustomCheck] {
        &self.checks
    }

    /// Declares a property. Redeclaring a name replaces the schema in place.
    ///
    /// The property is required unless `schema` is an optional schema.
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.insert(name.into(), schema.into());
        self
    }

    /// Declares a property that may be absent.
    pub fn optional(self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.field(name, Schema::optional(schema))
    }

    /// Rejects properties that are not declared.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Adds a custom predicate over the whole object. See [`CustomCheck`].
    pub fn check<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.checks.push(CustomCheck::new(name, predicate));
        self
    }

    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, path, &ValidationContext::default())
    }

    pub(crate) fn validate_with_context(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> Validation<Value, SchemaErrors> {
        let Some(obj) = value.as_object() else {
            return Validation::Failure(SchemaErrors::single(SchemaError::invalid_type(
                path, "object", value,
            )));
        };

        let mut errors = Vec::new();
        let mut validated = Map::new();

        for (name, schema) in &self.fields {
            let field_path = path.push_field(name);
            match obj.get(name) {
                Some(field_value) => {
                    match schema.validate_with_context(field_value, &field_path, context) {
                        Validation::Success(v) => {
                            validated.insert(name.clone(), v);
                        }
                        Validation::Failure(e) => errors.extend(e),
                    }
                }
                None if schema.is_optional() => {}
                None => errors.push(
                    SchemaError::new(field_path, format!("required field '{}' is missing", name))
                        .with_code("required")
                        .with_expected("value"),
                ),
            }
        }

        for (key, extra) in obj {
            if self.fields.contains_key(key) {
                continue;
            }
            if self.strict {
                errors.push(
                    SchemaError::new(path.push_field(key), format!("unknown field '{}'", key))
                        .with_code("additional_property"),
                );
            } else {
                validated.insert(key.clone(), extra.clone());
            }
        }

        match SchemaErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => match run_checks(&self.checks, value, path) {
                Validation::Success(_) => Validation::Success(Value::Object(validated)),
                Validation::Failure(e) => Validation::Failure(e),
            },
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Schema::from_kind(SchemaKind::Object(schema))
    }
}

/// Validates an object whose values all match `schema`.
pub(crate) fn validate_record(
    schema: &Schema,
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Validation<Value, SchemaErrors> {
    let Some(obj) = value.as_object() else {
        return Validation::Failure(SchemaErrors::single(SchemaError::invalid_type(
            path, "object", value,
        )));
    };

    let mut errors = Vec::new();
    let mut validated = Map::new();
    for (key, entry) in obj {
        match schema.validate_with_context(entry, &path.push_field(key), context) {
            Validation::Success(v) => {
                validated.insert(key.clone(), v);
            }
            Validation::Failure(e) => errors.extend(e),
        }
    }

    match SchemaErrors::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(Value::Object(validated)),
    }
}
