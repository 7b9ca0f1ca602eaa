//! Failures raised while converting a schema graph to JSON Schema.

use crate::path::JsonPath;

/// Why a schema graph could not be converted.
///
/// Every variant except [`ConversionError::Configuration`] records the location
/// in the output document where conversion stopped. The messages are stable
/// and do not include the location; use [`ConversionError::path`] for that.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Neither a root schema nor any definitions were supplied.
    #[error("No main schema or definitions provided")]
    Configuration,

    /// The schema kind has no JSON Schema counterpart (`nan`, `symbol`).
    #[error("Unsupported schema: {kind}")]
    UnsupportedSchemaKind { kind: &'static str, path: JsonPath },

    /// A literal whose value JSON cannot represent (`NaN`, infinities, symbols).
    #[error("Unsupported literal value: {value}")]
    UnsupportedLiteralValue { value: String, path: JsonPath },

    /// A refinement with no JSON Schema keyword, such as a custom predicate.
    #[error("Unsupported validation `{check}` on {kind} schema")]
    UnsupportedValidation {
        check: String,
        kind: &'static str,
        path: JsonPath,
    },

    /// A recursive reference whose target is not a named definition.
    #[error("Type inside recursive schema must be provided in the definitions")]
    MissingDefinition { path: JsonPath },

    /// A [`Schema::recursive`](crate::Schema::recursive) node outlived its target.
    #[error("Recursive schema target was dropped before conversion")]
    DanglingRecursion { path: JsonPath },
}

impl ConversionError {
    /// Location in the output document where conversion failed.
    pub fn path(&self) -> Option<&JsonPath> {
        match self {
            ConversionError::Configuration => None,
            ConversionError::UnsupportedSchemaKind { path, .. }
            | ConversionError::UnsupportedLiteralValue { path, .. }
            | ConversionError::UnsupportedValidation { path, .. }
            | ConversionError::MissingDefinition { path }
            | ConversionError::DanglingRecursion { path } => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_exclude_location() {
        let path = JsonPath::from_field("definitions").push_field("N");

        let err = ConversionError::UnsupportedSchemaKind {
            kind: "nan",
            path: path.clone(),
        };
        assert_eq!(err.to_string(), "Unsupported schema: nan");
        assert_eq!(err.path(), Some(&path));

        let err = ConversionError::MissingDefinition { path };
        assert_eq!(
            err.to_string(),
            "Type inside recursive schema must be provided in the definitions"
        );
    }

    #[test]
    fn test_configuration_has_no_path() {
        let err = ConversionError::Configuration;
        assert_eq!(err.to_string(), "No main schema or definitions provided");
        assert!(err.path().is_none());
    }
}
