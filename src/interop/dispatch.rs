//! Per-kind conversion.
//!
//! [`convert_node`] turns one node into a JSON Schema fragment. Children go
//! through [`convert_child`], which emits a `$ref` for any node that has a
//! definition name instead of descending into it. That is what keeps cyclic
//! graphs finite: the body of a named node is only ever converted from the
//! orchestrator, once.

use serde_json::{json, Map, Value};
use tracing::trace;

use crate::error::ConversionError;
use crate::path::JsonPath;
use crate::schema::{
    number_value, Annotated, LazySchema, Literal, ObjectSchema, Schema, SchemaKind, TupleSchema,
};

use super::checks;
use super::context::{definition_ref, ConversionContext};
use super::strategy;

type Fragment = Map<String, Value>;

/// Converts the body of `schema`, ignoring any name the node itself has.
pub(crate) fn convert_node(
    schema: &Schema,
    context: &ConversionContext<'_>,
    path: &JsonPath,
) -> Result<Fragment, ConversionError> {
    let kind = schema.kind();
    trace!(kind = kind.name(), path = %path, "converting node");

    let settings = context.settings();
    match kind {
        SchemaKind::Any => Ok(Fragment::new()),
        SchemaKind::Null => Ok(keyword("const", Value::Null)),
        SchemaKind::Undefined => Ok(strategy::undefined(settings.undefined_strategy)),
        SchemaKind::Nan | SchemaKind::Symbol => Err(ConversionError::UnsupportedSchemaKind {
            kind: kind.name(),
            path: path.clone(),
        }),
        SchemaKind::Boolean => Ok(keyword("type", json!("boolean"))),
        SchemaKind::Number(number) => {
            let mut fragment = keyword("type", json!("number"));
            checks::number_checks(number.checks(), &mut fragment, settings, path)?;
            Ok(fragment)
        }
        SchemaKind::String(string) => {
            let mut fragment = keyword("type", json!("string"));
            checks::string_checks(string.checks(), &mut fragment, settings, path)?;
            Ok(fragment)
        }
        SchemaKind::Date => Ok(strategy::date(settings.date_strategy)),
        SchemaKind::BigInt => Ok(strategy::bigint(settings.bigint_strategy)),
        SchemaKind::Literal(literal) => convert_literal(literal, path),
        SchemaKind::Nullable(inner) => {
            let inner = convert_child(inner, context, &path.push_field("anyOf").push_index(1))?;
            Ok(keyword(
                "anyOf",
                json!([{ "const": null }, Value::Object(inner)]),
            ))
        }
        SchemaKind::Optional(inner) => convert_child(inner, context, path),
        SchemaKind::Object(object) => convert_object(object, context, path),
        SchemaKind::Record(value) => {
            let value = convert_child(value, context, &path.push_field("additionalProperties"))?;
            let mut fragment = keyword("type", json!("object"));
            fragment.insert("additionalProperties".into(), Value::Object(value));
            Ok(fragment)
        }
        SchemaKind::Array(array) => {
            let item = convert_child(array.item(), context, &path.push_field("items"))?;
            let mut fragment = keyword("type", json!("array"));
            fragment.insert("items".into(), Value::Object(item));
            checks::array_checks(array.checks(), "array", &mut fragment, settings, path)?;
            Ok(fragment)
        }
        SchemaKind::Tuple(tuple) => convert_tuple(tuple, context, path),
        SchemaKind::Picklist(values) => Ok(keyword("enum", Value::Array(values.clone()))),
        SchemaKind::Enum(entries) => Ok(keyword(
            "enum",
            Value::Array(entries.values().cloned().collect()),
        )),
        SchemaKind::Union(members) => convert_members("anyOf", members, context, path),
        SchemaKind::Intersection(members) => convert_members("allOf", members, context, path),
        SchemaKind::Lazy(lazy) => convert_lazy(lazy, context, path),
        SchemaKind::Annotated(annotated) => convert_annotated(annotated, context, path),
    }
}

/// Converts an edge to `schema`: a `$ref` if the node is named, its body otherwise.
pub(crate) fn convert_child(
    schema: &Schema,
    context: &ConversionContext<'_>,
    path: &JsonPath,
) -> Result<Fragment, ConversionError> {
    match context.name_of(schema) {
        Some(name) => Ok(reference(name)),
        None => convert_node(schema, context, path),
    }
}

pub(crate) fn reference(name: &str) -> Fragment {
    keyword("$ref", Value::String(definition_ref(name)))
}

fn keyword(name: &str, value: Value) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.insert(name.to_string(), value);
    fragment
}

fn convert_literal(literal: &Literal, path: &JsonPath) -> Result<Fragment, ConversionError> {
    let value = match literal {
        Literal::Value(value) => value.clone(),
        Literal::Float(f) => {
            number_value(*f).ok_or_else(|| unsupported_literal(f.to_string(), path))?
        }
        Literal::Symbol(description) => {
            return Err(unsupported_literal(format!("Symbol({})", description), path))
        }
    };
    Ok(keyword("const", value))
}

fn unsupported_literal(value: String, path: &JsonPath) -> ConversionError {
    ConversionError::UnsupportedLiteralValue {
        value,
        path: path.clone(),
    }
}

fn convert_object(
    object: &ObjectSchema,
    context: &ConversionContext<'_>,
    path: &JsonPath,
) -> Result<Fragment, ConversionError> {
    let settings = context.settings();
    checks::object_checks(object.checks(), settings, path)?;

    let properties_path = path.push_field("properties");
    let mut properties = Fragment::new();
    let mut required = Vec::new();
    for (name, field) in object.fields() {
        let converted = convert_child(field, context, &properties_path.push_field(name.clone()))?;
        properties.insert(name.clone(), Value::Object(converted));
        if !field.is_optional() {
            required.push(Value::String(name.clone()));
        }
    }

    let mut fragment = keyword("type", json!("object"));
    fragment.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        fragment.insert("required".into(), Value::Array(required));
    }
    if strategy::is_strict(object, settings) {
        fragment.insert("additionalProperties".into(), Value::Bool(false));
    }
    Ok(fragment)
}

fn convert_tuple(
    tuple: &TupleSchema,
    context: &ConversionContext<'_>,
    path: &JsonPath,
) -> Result<Fragment, ConversionError> {
    let items_path = path.push_field("items");
    let items = tuple
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| convert_child(item, context, &items_path.push_index(i)).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    let len = items.len();

    let mut fragment = keyword("type", json!("array"));
    match tuple.rest_item() {
        None => {
            fragment.insert("items".into(), Value::Array(items));
            fragment.insert("minItems".into(), json!(len));
            fragment.insert("maxItems".into(), json!(len));
        }
        Some(rest) => {
            let rest = Value::Object(convert_child(
                rest,
                context,
                &path.push_field("additionalItems"),
            )?);
            // one fixed item equal to the rest is a plain non-empty array
            if len == 1 && items[0] == rest {
                fragment.insert("items".into(), rest);
            } else {
                fragment.insert("items".into(), Value::Array(items));
                fragment.insert("additionalItems".into(), rest);
            }
            fragment.insert("minItems".into(), json!(len));
        }
    }

    checks::array_checks(tuple.checks(), "tuple", &mut fragment, context.settings(), path)?;
    Ok(fragment)
}

fn convert_members(
    keyword_name: &str,
    members: &[Schema],
    context: &ConversionContext<'_>,
    path: &JsonPath,
) -> Result<Fragment, ConversionError> {
    let members_path = path.push_field(keyword_name);
    let converted = members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            convert_child(member, context, &members_path.push_index(i)).map(Value::Object)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(keyword(keyword_name, Value::Array(converted)))
}

/// A lazy edge is only ever a reference: its target must be named.
fn convert_lazy(
    lazy: &LazySchema,
    context: &ConversionContext<'_>,
    path: &JsonPath,
) -> Result<Fragment, ConversionError> {
    let target = lazy
        .resolve()
        .ok_or_else(|| ConversionError::DanglingRecursion { path: path.clone() })?;

    match context.name_of(&target) {
        Some(name) => Ok(reference(name)),
        None => Err(ConversionError::MissingDefinition { path: path.clone() }),
    }
}

fn convert_annotated(
    annotated: &Annotated,
    context: &ConversionContext<'_>,
    path: &JsonPath,
) -> Result<Fragment, ConversionError> {
    let inner = convert_child(annotated.inner(), context, path)?;

    // draft-07 ignores siblings of `$ref`
    let mut fragment = if inner.contains_key("$ref") {
        keyword("allOf", json!([Value::Object(inner)]))
    } else {
        inner
    };
    for (name, value) in annotated.keywords() {
        fragment.insert(name.clone(), value.clone());
    }
    Ok(fragment)
}
