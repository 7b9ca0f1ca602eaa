//! JSON Schema document assembly.
//!
//! Output targets draft-07: named schemas live under `definitions` and every
//! reference has the form `#/definitions/<name>`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConversionError;
use crate::path::JsonPath;
use crate::schema::Schema;

use super::context::{definition_ref, ConversionContext};
use super::dispatch;
use super::options::ConvertOptions;

/// The `$schema` of every generated document.
pub const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Converts a root schema and/or a set of definitions into one document.
///
/// Every definition is converted, in registration order, whether or not the
/// root reaches it. A root that is itself a definition becomes a `$ref`.
///
/// # Errors
///
/// `ConversionError::Configuration` when there is neither a root schema nor
/// any definition, or the first error met while converting a node.
///
/// # Example
///
/// ```rust
/// use blueprint::{to_json_schema, ConvertOptions, Definitions, Schema};
/// use serde_json::json;
///
/// let tree = Schema::recursive(|tree| {
///     Schema::object()
///         .field("value", Schema::number())
///         .field("children", Schema::array(tree))
///         .into()
/// });
/// let definitions = Definitions::new().with("Tree", tree.clone()).unwrap();
///
/// let document = to_json_schema(
///     &ConvertOptions::new().schema(tree).definitions(definitions),
/// )
/// .unwrap();
///
/// assert_eq!(document["$ref"], "#/definitions/Tree");
/// assert_eq!(
///     document["definitions"]["Tree"]["properties"]["children"],
///     json!({ "type": "array", "items": { "$ref": "#/definitions/Tree" } })
/// );
/// ```
pub fn to_json_schema(options: &ConvertOptions) -> Result<Value, ConversionError> {
    if options.schema.is_none() && options.definitions.is_empty() {
        return Err(ConversionError::Configuration);
    }

    let context = ConversionContext::new(&options.settings, &options.definitions);

    let mut definitions = Map::new();
    for (name, schema) in options.definitions.iter() {
        let fragment = match context.name_of(schema) {
            Some(first) if first != name.as_str() => {
                debug!(definition = %name, alias_of = first, "aliasing definition");
                dispatch::reference(first)
            }
            _ => {
                debug!(definition = %name, kind = schema.kind().name(), "converting definition");
                let path = JsonPath::from_field("definitions").push_field(name.clone());
                dispatch::convert_node(schema, &context, &path)?
            }
        };
        definitions.insert(name.clone(), Value::Object(fragment));
    }

    let mut document = Map::new();
    document.insert("$schema".into(), Value::String(JSON_SCHEMA_DRAFT.to_string()));

    if let Some(root) = &options.schema {
        match context.name_of(root) {
            Some(name) => {
                document.insert("$ref".into(), Value::String(definition_ref(name)));
            }
            None => {
                let fragment = dispatch::convert_node(root, &context, &JsonPath::root())?;
                document.extend(fragment);
            }
        }
    }

    if !definitions.is_empty() {
        document.insert("definitions".into(), Value::Object(definitions));
    }

    Ok(Value::Object(document))
}

/// Conversion of a standalone schema with default settings and no definitions.
///
/// Implemented for [`Schema`] and every typed builder.
pub trait ToJsonSchema {
    /// Converts this schema to a JSON Schema document.
    fn to_json_schema(&self) -> Result<Value, ConversionError>;
}

impl<T> ToJsonSchema for T
where
    T: Clone + Into<Schema>,
{
    fn to_json_schema(&self) -> Result<Value, ConversionError> {
        to_json_schema(&ConvertOptions::new().schema(self.clone()))
    }
}
