//! Tests for recursive schema graphs and `$ref` resolution through definitions.

use blueprint::{
    to_json_schema, ConversionError, ConvertOptions, Definitions, JsonPath, Schema, ToJsonSchema,
};
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};

fn tree() -> Schema {
    Schema::recursive(|tree| {
        Schema::object()
            .field("value", Schema::number())
            .field("children", Schema::array(tree))
            .into()
    })
}

/// Replaces every `$ref` with the definition it points at, `depth` times over.
fn expand(fragment: &Value, definitions: &Value, depth: usize) -> Value {
    match fragment {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                let name = target
                    .strip_prefix("#/definitions/")
                    .expect("local definition reference");
                if depth == 0 {
                    return fragment.clone();
                }
                return expand(&definitions[name], definitions, depth - 1);
            }
            Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), expand(v, definitions, depth)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| expand(item, definitions, depth))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[test]
fn test_recursive_schema_without_definition_fails() {
    let err = tree().to_json_schema().unwrap_err();

    assert!(matches!(err, ConversionError::MissingDefinition { .. }));
    assert_eq!(
        err.to_string(),
        "Type inside recursive schema must be provided in the definitions"
    );
    assert_eq!(
        err.path().map(ToString::to_string).as_deref(),
        Some("properties.children.items")
    );
}

#[test]
fn test_registered_recursive_schema_converts_to_ref() {
    let tree = tree();
    let definitions = Definitions::new().with("Tree", tree.clone()).unwrap();

    let document =
        to_json_schema(&ConvertOptions::new().schema(tree).definitions(definitions)).unwrap();

    assert_eq!(
        document,
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "$ref": "#/definitions/Tree",
            "definitions": {
                "Tree": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "number" },
                        "children": {
                            "type": "array",
                            "items": { "$ref": "#/definitions/Tree" }
                        }
                    },
                    "required": ["value", "children"]
                }
            }
        })
    );
}

#[test]
fn test_ref_chain_round_trips_structure() {
    let tree = tree();
    let definitions = Definitions::new().with("Tree", tree.clone()).unwrap();
    let document =
        to_json_schema(&ConvertOptions::new().schema(tree).definitions(definitions)).unwrap();

    let root = json!({ "$ref": document["$ref"] });
    let expanded = expand(&root, &document["definitions"], 2);

    assert_eq!(expanded["properties"]["value"], json!({ "type": "number" }));
    let nested = &expanded["properties"]["children"]["items"];
    assert_eq!(nested["type"], "object");
    assert_eq!(
        nested["properties"]["children"]["items"],
        json!({ "$ref": "#/definitions/Tree" })
    );
}

#[test]
fn test_recursive_root_embedded_in_unnamed_wrapper() {
    let tree = tree();
    let definitions = Definitions::new().with("Tree", tree.clone()).unwrap();
    let forest = Schema::array(tree);

    let document =
        to_json_schema(&ConvertOptions::new().schema(forest).definitions(definitions)).unwrap();

    assert_eq!(document["type"], "array");
    assert_eq!(document["items"], json!({ "$ref": "#/definitions/Tree" }));
    assert!(document.get("$ref").is_none());
    assert_eq!(document["definitions"]["Tree"]["type"], "object");
}

#[test]
fn test_nullable_linked_list() {
    let list = Schema::recursive(|list| {
        Schema::object()
            .field("value", Schema::string())
            .field("next", Schema::nullable(list))
            .into()
    });
    let definitions = Definitions::new().with("List", list.clone()).unwrap();

    let document =
        to_json_schema(&ConvertOptions::new().schema(list).definitions(definitions)).unwrap();

    assert_eq!(
        document["definitions"]["List"]["properties"]["next"],
        json!({ "anyOf": [{ "const": null }, { "$ref": "#/definitions/List" }] })
    );
}

#[test]
fn test_mutually_recursive_lazy_schemas() {
    static PERSON: OnceLock<Schema> = OnceLock::new();
    static COMPANY: OnceLock<Schema> = OnceLock::new();

    let person = PERSON.get_or_init(|| {
        Schema::object()
            .field("name", Schema::string())
            .optional(
                "employer",
                Schema::lazy(|| COMPANY.get().cloned().unwrap_or_else(Schema::any)),
            )
            .into()
    });
    let company = COMPANY.get_or_init(|| {
        Schema::object()
            .field("title", Schema::string())
            .field(
                "staff",
                Schema::array(Schema::lazy(|| {
                    PERSON.get().cloned().unwrap_or_else(Schema::any)
                })),
            )
            .into()
    });

    let definitions = Definitions::new()
        .with("Person", person.clone())
        .and_then(|d| d.with("Company", company.clone()))
        .unwrap();
    let document = to_json_schema(&ConvertOptions::new().definitions(definitions)).unwrap();

    assert!(document.get("$ref").is_none());
    assert_eq!(
        document["definitions"]["Person"]["properties"]["employer"],
        json!({ "$ref": "#/definitions/Company" })
    );
    assert_eq!(
        document["definitions"]["Company"]["properties"]["staff"]["items"],
        json!({ "$ref": "#/definitions/Person" })
    );
    assert_eq!(document["definitions"]["Person"]["required"], json!(["name"]));
}

#[test]
fn test_lazy_target_must_be_named_even_if_reachable() {
    let leaf: Schema = Schema::string().into();
    let captured = leaf.clone();
    let schema = Schema::object()
        .field("direct", leaf)
        .field("deferred", Schema::lazy(move || captured.clone()));

    let err = schema.to_json_schema().unwrap_err();
    assert_eq!(
        err,
        ConversionError::MissingDefinition {
            path: JsonPath::from_field("properties").push_field("deferred")
        }
    );
}

#[test]
fn test_dropped_recursion_target() {
    let dangling = {
        let tree = tree();
        match tree.kind() {
            blueprint::SchemaKind::Object(object) => {
                let children = object.fields()["children"].clone();
                match children.kind() {
                    blueprint::SchemaKind::Array(array) => array.item().clone(),
                    _ => unreachable!(),
                }
            }
            _ => unreachable!(),
        }
    };

    let err = dangling.to_json_schema().unwrap_err();
    assert!(matches!(err, ConversionError::DanglingRecursion { .. }));
}

#[test]
fn test_recursive_validation_matches_conversion() {
    let tree = tree();
    let value = json!({
        "value": 1,
        "children": [
            { "value": 2, "children": [] },
            { "value": 3, "children": [{ "value": 4, "children": [] }] }
        ]
    });
    assert!(tree.validate(&value, &JsonPath::root()).is_success());

    let definitions = Definitions::new().with("Tree", tree.clone()).unwrap();
    let document =
        to_json_schema(&ConvertOptions::new().schema(tree).definitions(definitions)).unwrap();
    let compiled = jsonschema::JSONSchema::compile(&document).expect("valid draft-07 document");
    assert!(compiled.is_valid(&value));
    assert!(!compiled.is_valid(&json!({ "value": 1, "children": [{ "value": "x" }] })));
}

#[test]
fn test_schema_graphs_are_shareable() {
    let tree = Arc::new(tree());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || {
                tree.validate(&json!({ "value": i, "children": [] }), &JsonPath::root())
                    .is_success()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
