//! Named schemas.
//!
//! [`Definitions`] is the caller's set of named schemas. During conversion each
//! named node is emitted once under `definitions/<name>` and every other edge
//! that reaches it becomes a `$ref`. Recursive schemas can only be converted
//! when their target is named here.

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{ConversionError, SchemaErrors};
use crate::interop::{to_json_schema, ConvertOptions, Settings};
use crate::path::JsonPath;
use crate::schema::Schema;

/// An insertion-ordered map from name to schema.
///
/// # Example
///
/// ```rust
/// use blueprint::{Definitions, Schema, Settings};
/// use serde_json::json;
///
/// let mut definitions = Definitions::new();
/// definitions.register("Id", Schema::integer().min(1)).unwrap();
///
/// let document = definitions.to_json_schema(&Settings::default()).unwrap();
/// assert_eq!(
///     document,
///     json!({
///         "$schema": "http://json-schema.org/draft-07/schema#",
///         "definitions": { "Id": { "type": "integer", "minimum": 1 } }
///     })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    schemas: IndexMap<String, Schema>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names `schema`.
    ///
    /// Registering the same node under the same name again is a no-op.
    /// Registering a different node under a taken name fails.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::DuplicateName` if `name` already names another node.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        schema: impl Into<Schema>,
    ) -> Result<(), DefinitionError> {
        let name = name.into();
        let schema = schema.into();

        match self.schemas.get(&name) {
            Some(existing) if existing.ptr_eq(&schema) => Ok(()),
            Some(_) => Err(DefinitionError::DuplicateName(name)),
            None => {
                self.schemas.insert(name, schema);
                Ok(())
            }
        }
    }

    /// Builder form of [`Definitions::register`].
    pub fn with(
        mut self,
        name: impl Into<String>,
        schema: impl Into<Schema>,
    ) -> Result<Self, DefinitionError> {
        self.register(name, schema)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.schemas.iter()
    }

    /// Validates `value` against the schema named `name`.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::SchemaNotFound` if nothing is registered under `name`.
    pub fn validate(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<Validation<Value, SchemaErrors>, DefinitionError> {
        let schema = self
            .get(name)
            .ok_or_else(|| DefinitionError::SchemaNotFound(name.to_string()))?;
        Ok(schema.validate(value, &JsonPath::root()))
    }

    /// A document holding every definition and no root schema.
    pub fn to_json_schema(&self, settings: &Settings) -> Result<Value, ConversionError> {
        to_json_schema(
            &ConvertOptions::new()
                .definitions(self.clone())
                .settings(settings.clone()),
        )
    }

    /// A document whose root is `$ref` to the definition `name`.
    ///
    /// Returns `None` if nothing is registered under `name`.
    pub fn export_schema(
        &self,
        name: &str,
        settings: &Settings,
    ) -> Option<Result<Value, ConversionError>> {
        let root = self.get(name)?.clone();
        Some(to_json_schema(
            &ConvertOptions::new()
                .schema(root)
                .definitions(self.clone())
                .settings(settings.clone()),
        ))
    }
}

/// Errors raised when building or querying [`Definitions`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("definition '{0}' already registered")]
    DuplicateName(String),

    #[error("definition '{0}' not found")]
    SchemaNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_same_node_twice_is_idempotent() {
        let id: Schema = Schema::integer().into();
        let mut definitions = Definitions::new();
        definitions.register("Id", id.clone()).unwrap();
        definitions.register("Id", id).unwrap();
        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_register_other_node_under_taken_name_fails() {
        let mut definitions = Definitions::new();
        definitions.register("Id", Schema::integer()).unwrap();
        assert_eq!(
            definitions.register("Id", Schema::integer()),
            Err(DefinitionError::DuplicateName("Id".to_string()))
        );
    }

    #[test]
    fn test_iteration_keeps_registration_order() {
        let definitions = Definitions::new()
            .with("Z", Schema::any())
            .and_then(|d| d.with("A", Schema::any()))
            .and_then(|d| d.with("M", Schema::any()))
            .unwrap();
        let names: Vec<_> = definitions.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_validate_by_name() {
        let definitions = Definitions::new()
            .with("Flag", Schema::boolean())
            .unwrap();

        assert!(definitions.validate("Flag", &json!(true)).unwrap().is_success());
        assert!(definitions.validate("Flag", &json!(1)).unwrap().is_failure());
        assert_eq!(
            definitions.validate("Missing", &json!(1)).unwrap_err(),
            DefinitionError::SchemaNotFound("Missing".to_string())
        );
    }

    #[test]
    fn test_export_schema_refs_the_named_root() {
        let definitions = Definitions::new().with("Flag", Schema::boolean()).unwrap();

        let document = definitions
            .export_schema("Flag", &Settings::default())
            .unwrap()
            .unwrap();
        assert_eq!(document["$ref"], "#/definitions/Flag");
        assert_eq!(document["definitions"]["Flag"], json!({"type": "boolean"}));

        assert!(definitions.export_schema("Nope", &Settings::default()).is_none());
    }
}
