//! Validation for the composite and value-matching kinds.
//!
//! - `union`: at least one member must match (first match wins)
//! - `intersection`: every member must match, errors accumulate
//! - `nullable`: `null` or the inner schema
//! - `literal`, `picklist`, `enum`: the value must equal one of the listed values

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

use super::{Literal, Schema};

pub(crate) fn validate_union(
    members: &[Schema],
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Validation<Value, SchemaErrors> {
    for member in members {
        if let Validation::Success(v) = member.validate_with_context(value, path, context) {
            return Validation::Success(v);
        }
    }

    Validation::Failure(SchemaErrors::single(
        SchemaError::new(
            path.clone(),
            format!("value did not match any of {} schemas", members.len()),
        )
        .with_code("union_none_matched"),
    ))
}

pub(crate) fn validate_intersection(
    members: &[Schema],
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Validation<Value, SchemaErrors> {
    let mut errors = Vec::new();
    for member in members {
        if let Validation::Failure(e) = member.validate_with_context(value, path, context) {
            errors.extend(e);
        }
    }

    match SchemaErrors::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(value.clone()),
    }
}

pub(crate) fn validate_nullable(
    inner: &Schema,
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Validation<Value, SchemaErrors> {
    if value.is_null() {
        Validation::Success(Value::Null)
    } else {
        inner.validate_with_context(value, path, context)
    }
}

pub(crate) fn validate_literal(
    literal: &Literal,
    value: &Value,
    path: &JsonPath,
) -> Validation<Value, SchemaErrors> {
    let matched = match literal {
        Literal::Value(expected) => json_equal(expected, value),
        Literal::Float(expected) => value.as_f64() == Some(*expected),
        Literal::Symbol(_) => false,
    };

    if matched {
        Validation::Success(value.clone())
    } else {
        let expected = match literal {
            Literal::Value(v) => v.to_string(),
            Literal::Float(f) => f.to_string(),
            Literal::Symbol(description) => format!("Symbol({})", description),
        };
        Validation::Failure(SchemaErrors::single(
            SchemaError::new(path.clone(), format!("expected literal {}", expected))
                .with_code("literal")
                .with_expected(expected)
                .with_got(value.to_string()),
        ))
    }
}

pub(crate) fn validate_one_of_values<'a>(
    options: impl IntoIterator<Item = &'a Value>,
    value: &Value,
    path: &JsonPath,
) -> Validation<Value, SchemaErrors> {
    if options.into_iter().any(|option| json_equal(option, value)) {
        Validation::Success(value.clone())
    } else {
        Validation::Failure(SchemaErrors::single(
            SchemaError::new(path.clone(), "value is not one of the allowed values")
                .with_code("enum")
                .with_got(value.to_string()),
        ))
    }
}

/// JSON equality with numbers compared by value, so `1` equals `1.0`.
pub(crate) fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_equal(x, y)))
        }
        _ => a == b,
    }
}
