use std::collections::HashMap;

use crate::definitions::Definitions;
use crate::schema::{Schema, SchemaId};

use super::options::Settings;

/// State shared by every node of one conversion.
///
/// The name map is built once from the caller's definitions and never grows
/// while converting, so the output depends only on the inputs.
#[derive(Debug)]
pub(crate) struct ConversionContext<'a> {
    settings: &'a Settings,
    names: HashMap<SchemaId, String>,
}

impl<'a> ConversionContext<'a> {
    pub(crate) fn new(settings: &'a Settings, definitions: &Definitions) -> Self {
        let mut names = HashMap::with_capacity(definitions.len());
        for (name, schema) in definitions.iter() {
            // first name wins
            names.entry(schema.id()).or_insert_with(|| name.clone());
        }
        Self { settings, names }
    }

    pub(crate) fn settings(&self) -> &Settings {
        self.settings
    }

    /// The definition name assigned to this node, if any.
    pub(crate) fn name_of(&self, schema: &Schema) -> Option<&str> {
        self.names.get(&schema.id()).map(String::as_str)
    }
}

/// The `$ref` target for a definition name.
pub(crate) fn definition_ref(name: &str) -> String {
    format!("#/definitions/{}", name)
}
