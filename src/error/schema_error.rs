//! Source validation failures.
//!
//! [`SchemaError`] is one rejected check; [`SchemaErrors`] is the non-empty
//! set a validation run accumulates before reporting.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::JsonPath;

/// A single rejected check.
///
/// `code` is a stable machine-readable tag (`invalid_type`, `min_length`,
/// `required`, ...). `got` and `expected` are optional human-readable details.
///
/// # Example
///
/// ```rust
/// use blueprint::{JsonPath, SchemaError};
///
/// let error = SchemaError::new(JsonPath::root().push_field("tags"), "too few items")
///     .with_code("min_length")
///     .with_expected("at least 2 items")
///     .with_got("1 items");
///
/// assert_eq!(error.code, "min_length");
/// assert_eq!(
///     error.to_string(),
///     "tags: too few items (expected: at least 2 items) (got: 1 items)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub path: JsonPath,
    pub message: String,
    pub got: Option<String>,
    pub expected: Option<String>,
    pub code: &'static str,
}

impl SchemaError {
    /// Creates an error with the generic `validation_error` code.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error",
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = code;
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Shorthand for a value of the wrong JSON type.
    pub(crate) fn invalid_type(path: &JsonPath, expected: &str, value: &serde_json::Value) -> Self {
        SchemaError::new(path.clone(), format!("expected {}", expected))
            .with_code("invalid_type")
            .with_expected(expected)
            .with_got(value_type_name(value))
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)?;
        } else {
            write!(f, "{}: {}", self.path, self.message)?;
        }

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// A non-empty set of [`SchemaError`]s.
///
/// Implements `Semigroup` so results of sibling checks can be combined.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Builds a set from a vec, or `None` when the vec is empty.
    pub fn from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = Self::single(errors.next()?);
        Some(errors.fold(head, |acc, e| acc.combine(Self::single(e))))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the set is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// All errors reported at `path`.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// All errors carrying `code`.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SchemaError>();
    assert_send_sync::<SchemaErrors>();
};

/// JSON type name of a value, for `got` details.
pub(crate) fn value_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_defaults() {
        let error = SchemaError::new(JsonPath::root().push_field("name"), "field is required");
        assert_eq!(error.code, "validation_error");
        assert!(error.got.is_none());
        assert!(error.expected.is_none());
    }

    #[test]
    fn test_invalid_type_details() {
        let error = SchemaError::invalid_type(&JsonPath::root(), "string", &json!(3));
        assert_eq!(error.code, "invalid_type");
        assert_eq!(error.expected.as_deref(), Some("string"));
        assert_eq!(error.got.as_deref(), Some("number"));
        assert_eq!(
            error.to_string(),
            "(root): expected string (expected: string) (got: number)"
        );
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(SchemaErrors::from_vec(Vec::new()).is_none());

        let errors =
            SchemaErrors::from_vec(vec![SchemaError::new(JsonPath::root(), "bad")]).unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_combine_and_filter() {
        let a = JsonPath::root().push_field("a");
        let b = JsonPath::root().push_field("b");

        let errors = SchemaErrors::single(SchemaError::new(a.clone(), "1").with_code("required"))
            .combine(SchemaErrors::single(
                SchemaError::new(a.clone(), "2").with_code("pattern"),
            ))
            .combine(SchemaErrors::single(
                SchemaError::new(b.clone(), "3").with_code("required"),
            ));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.at_path(&a).len(), 2);
        assert_eq!(errors.at_path(&b).len(), 1);
        assert_eq!(errors.with_code("required").len(), 2);
        assert_eq!(errors.first().message, "1");
    }

    #[test]
    fn test_display_lists_every_error() {
        let errors = SchemaErrors::single(SchemaError::new(
            JsonPath::root().push_field("name"),
            "required",
        ))
        .combine(SchemaErrors::single(SchemaError::new(
            JsonPath::root().push_field("email"),
            "invalid",
        )));

        let display = errors.to_string();
        assert!(display.contains("2 error(s)"));
        assert!(display.contains("1. name: required"));
        assert!(display.contains("2. email: invalid"));
    }
}
