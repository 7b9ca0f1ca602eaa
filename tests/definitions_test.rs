//! Tests for named definitions and document assembly.

use blueprint::{
    to_json_schema, ConversionError, ConvertOptions, DefinitionError, Definitions, Schema,
    Settings, JSON_SCHEMA_DRAFT,
};
use serde_json::json;

#[test]
fn test_definitions_only_document() {
    let definitions = Definitions::new().with("N", Schema::number()).unwrap();
    let document = to_json_schema(&ConvertOptions::new().definitions(definitions)).unwrap();

    assert_eq!(
        document,
        json!({
            "$schema": JSON_SCHEMA_DRAFT,
            "definitions": { "N": { "type": "number" } }
        })
    );
}

#[test]
fn test_no_schema_and_no_definitions() {
    let err = to_json_schema(&ConvertOptions::new()).unwrap_err();
    assert_eq!(err, ConversionError::Configuration);
    assert_eq!(err.to_string(), "No main schema or definitions provided");

    let err = to_json_schema(&ConvertOptions::new().definitions(Definitions::new())).unwrap_err();
    assert_eq!(err, ConversionError::Configuration);
}

#[test]
fn test_named_root_is_a_reference() {
    let user: Schema = Schema::object().field("name", Schema::string()).into();
    let definitions = Definitions::new().with("User", user.clone()).unwrap();

    let document =
        to_json_schema(&ConvertOptions::new().schema(user).definitions(definitions)).unwrap();

    assert_eq!(document["$ref"], "#/definitions/User");
    assert!(document.get("type").is_none());
    assert_eq!(document["definitions"]["User"]["required"], json!(["name"]));
}

#[test]
fn test_unreached_definitions_are_still_emitted() {
    let definitions = Definitions::new()
        .with("Unused", Schema::boolean())
        .unwrap();

    let document = to_json_schema(
        &ConvertOptions::new()
            .schema(Schema::string())
            .definitions(definitions),
    )
    .unwrap();

    assert_eq!(document["type"], "string");
    assert_eq!(document["definitions"]["Unused"], json!({ "type": "boolean" }));
}

#[test]
fn test_definitions_keep_registration_order() {
    let definitions = Definitions::new()
        .with("Zeta", Schema::null())
        .and_then(|d| d.with("Alpha", Schema::boolean()))
        .unwrap();
    let document = definitions.to_json_schema(&Settings::default()).unwrap();

    let names: Vec<_> = document["definitions"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha"]);
}

#[test]
fn test_errors_in_unreached_definitions_surface() {
    let definitions = Definitions::new().with("Weird", Schema::symbol()).unwrap();
    let err = to_json_schema(
        &ConvertOptions::new()
            .schema(Schema::number())
            .definitions(definitions),
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Unsupported schema: symbol");
}

#[test]
fn test_shared_node_under_two_names() {
    let email: Schema = Schema::string().email().into();
    let definitions = Definitions::new()
        .with("Email", email.clone())
        .and_then(|d| d.with("ContactEmail", email.clone()))
        .unwrap();

    let person = Schema::object().field("email", email);
    let document = to_json_schema(
        &ConvertOptions::new()
            .schema(person)
            .definitions(definitions),
    )
    .unwrap();

    assert_eq!(
        document["properties"]["email"],
        json!({ "$ref": "#/definitions/Email" })
    );
    assert_eq!(
        document["definitions"]["ContactEmail"],
        json!({ "$ref": "#/definitions/Email" })
    );
}

#[test]
fn test_structurally_equal_nodes_are_not_merged() {
    let named: Schema = Schema::string().into();
    let look_alike: Schema = Schema::string().into();
    let definitions = Definitions::new().with("Name", named).unwrap();

    let document = to_json_schema(
        &ConvertOptions::new()
            .schema(Schema::array(look_alike))
            .definitions(definitions),
    )
    .unwrap();

    assert_eq!(document["items"], json!({ "type": "string" }));
}

#[test]
fn test_duplicate_name_rejected() {
    let mut definitions = Definitions::new();
    definitions.register("Id", Schema::integer()).unwrap();

    let err = definitions.register("Id", Schema::string()).unwrap_err();
    assert_eq!(err, DefinitionError::DuplicateName("Id".to_string()));
    assert_eq!(err.to_string(), "definition 'Id' already registered");
}

#[test]
fn test_export_schema_honours_settings() {
    let definitions = Definitions::new()
        .with("Event", Schema::object().field("at", Schema::date()))
        .unwrap();
    let settings: Settings = serde_json::from_value(json!({ "dateStrategy": "integer" })).unwrap();

    let document = definitions.export_schema("Event", &settings).unwrap().unwrap();
    assert_eq!(document["$ref"], "#/definitions/Event");
    assert_eq!(
        document["definitions"]["Event"]["properties"]["at"],
        json!({ "type": "integer", "format": "unix-time" })
    );
}
