//! Encodings for kinds that JSON has no native type for.

use serde_json::{json, Map, Value};

use crate::schema::ObjectSchema;

use super::options::{BigIntStrategy, DateStrategy, Settings, UndefinedStrategy};

pub(crate) fn date(strategy: DateStrategy) -> Map<String, Value> {
    let fragment = match strategy {
        DateStrategy::String => json!({ "type": "string", "format": "date-time" }),
        DateStrategy::Integer => json!({ "type": "integer", "format": "unix-time" }),
    };
    into_map(fragment)
}

pub(crate) fn bigint(strategy: BigIntStrategy) -> Map<String, Value> {
    let fragment = match strategy {
        BigIntStrategy::String => json!({ "type": "string" }),
        BigIntStrategy::Integer => json!({ "type": "integer", "format": "int64" }),
    };
    into_map(fragment)
}

pub(crate) fn undefined(strategy: UndefinedStrategy) -> Map<String, Value> {
    match strategy {
        UndefinedStrategy::Any => Map::new(),
    }
}

/// Either the global setting or the object's own marker closes it.
pub(crate) fn is_strict(object: &ObjectSchema, settings: &Settings) -> bool {
    settings.strict_object_types || object.is_strict()
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
