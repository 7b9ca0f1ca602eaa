//! Array and tuple schemas.
//!
//! [`ArraySchema`] matches homogeneous arrays. [`TupleSchema`] matches arrays
//! with one schema per leading position and an optional rest schema for the
//! remaining elements. Both accept [`ArrayCheck`] length refinements.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

use super::traits::{run_checks, Check, CustomCheck};
use super::{Schema, SchemaKind};

/// A refinement on array values.
#[derive(Debug, Clone)]
pub enum ArrayCheck {
    MinLength(usize),
    MaxLength(usize),
    Length(usize),
    Custom(CustomCheck),
}

impl Check for ArrayCheck {
    fn name(&self) -> &str {
        match self {
            ArrayCheck::MinLength(_) => "min_length",
            ArrayCheck::MaxLength(_) => "max_length",
            ArrayCheck::Length(_) => "length",
            ArrayCheck::Custom(custom) => custom.name(),
        }
    }

    fn check(&self, value: &Value, path: &JsonPath) -> Option<SchemaError> {
        let len = value.as_array()?.len();
        let got = format!("{} items", len);

        match self {
            ArrayCheck::MinLength(min) if len < *min => Some(
                SchemaError::new(path.clone(), format!("must have at least {} items", min))
                    .with_code("min_length")
                    .with_got(got),
            ),
            ArrayCheck::MaxLength(max) if len > *max => Some(
                SchemaError::new(path.clone(), format!("must have at most {} items", max))
                    .with_code("max_length")
                    .with_got(got),
            ),
            ArrayCheck::Length(exact) if len != *exact => Some(
                SchemaError::new(path.clone(), format!("must have exactly {} items", exact))
                    .with_code("length")
                    .with_got(got),
            ),
            ArrayCheck::Custom(custom) => custom.check(value, path),
            _ => None,
        }
    }
}

/// Validates each element against the schema for its position, then the
/// length refinements if every element passed.
fn validate_elements<'a>(
    items: &[Value],
    schema_at: impl Fn(usize) -> Option<&'a Schema>,
    checks: &[ArrayCheck],
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Validation<Value, SchemaErrors> {
    let mut errors = Vec::new();
    let mut validated = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let item_path = path.push_index(idx);
        match schema_at(idx) {
            Some(schema) => match schema.validate_with_context(item, &item_path, context) {
                Validation::Success(v) => validated.push(v),
                Validation::Failure(e) => errors.extend(e),
            },
            None => errors.push(
                SchemaError::new(item_path, "unexpected item beyond tuple length")
                    .with_code("additional_item"),
            ),
        }
    }

    match SchemaErrors::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => match run_checks(checks, value, path) {
            Validation::Success(_) => Validation::Success(Value::Array(validated)),
            Validation::Failure(e) => Validation::Failure(e),
        },
    }
}

/// A schema matching arrays whose items all match one schema.
///
/// # Example
///
/// ```rust
/// use blueprint::{JsonPath, Schema};
/// use serde_json::json;
///
/// let tags = Schema::array(Schema::string().min_len(1)).min_len(1).max_len(5);
///
/// assert!(tags.validate(&json!(["a", "b"]), &JsonPath::root()).is_success());
/// assert!(tags.validate(&json!([]), &JsonPath::root()).is_failure());
/// assert!(tags.validate(&json!(["a", ""]), &JsonPath::root()).is_failure());
/// ```
#[derive(Debug, Clone)]
pub struct ArraySchema {
    item: Schema,
    checks: Vec<ArrayCheck>,
}

impl ArraySchema {
    pub fn new(item: impl Into<Schema>) -> Self {
        Self {
            item: item.into(),
            checks: Vec::new(),
        }
    }

    pub fn item(&self) -> &Schema {
        &self.item
    }

    pub fn checks(&self) -> &[ArrayCheck] {
        &self.checks
    }

    pub fn min_len(mut self, min: usize) -> Self {
        self.checks.push(ArrayCheck::MinLength(min));
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.checks.push(ArrayCheck::MaxLength(max));
        self
    }

    pub fn length(mut self, len: usize) -> Self {
        self.checks.push(ArrayCheck::Length(len));
        self
    }

    /// Equivalent to `.min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Adds a custom predicate. See [`CustomCheck`].
    pub fn check<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.checks
            .push(ArrayCheck::Custom(CustomCheck::new(name, predicate)));
        self
    }

    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, path, &ValidationContext::default())
    }

    pub(crate) fn validate_with_context(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> Validation<Value, SchemaErrors> {
        let Some(items) = value.as_array() else {
            return Validation::Failure(SchemaErrors::single(SchemaError::invalid_type(
                path, "array", value,
            )));
        };
        validate_elements(items, |_| Some(&self.item), &self.checks, value, path, context)
    }
}

impl From<ArraySchema> for Schema {
    fn from(schema: ArraySchema) -> Self {
        Schema::from_kind(SchemaKind::Array(schema))
    }
}

/// A schema matching arrays position by position.
///
/// Without a rest schema the array must have exactly as many elements as
/// there are item schemas. With one, extra elements must match it.
///
/// # Example
///
/// ```rust
/// use blueprint::{JsonPath, Schema};
/// use serde_json::json;
///
/// let point = Schema::tuple([Schema::number(), Schema::number()]);
/// assert!(point.validate(&json!([1, 2]), &JsonPath::root()).is_success());
/// assert!(point.validate(&json!([1, 2, 3]), &JsonPath::root()).is_failure());
///
/// let command = Schema::tuple([Schema::string()]).rest(Schema::number());
/// assert!(command.validate(&json!(["move", 1, 2]), &JsonPath::root()).is_success());
/// assert!(command.validate(&json!([]), &JsonPath::root()).is_failure());
/// ```
#[derive(Debug, Clone)]
pub struct TupleSchema {
    items: Vec<Schema>,
    rest: Option<Schema>,
    checks: Vec<ArrayCheck>,
}

impl TupleSchema {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            rest: None,
            checks: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Schema] {
        &self.items
    }

    pub fn rest_item(&self) -> Option<&Schema> {
        self.rest.as_ref()
    }

    pub fn checks(&self) -> &[ArrayCheck] {
        &self.checks
    }

    /// Schema for elements after the fixed positions.
    pub fn rest(mut self, rest: impl Into<Schema>) -> Self {
        self.rest = Some(rest.into());
        self
    }

    pub fn min_len(mut self, min: usize) -> Self {
        self.checks.push(ArrayCheck::MinLength(min));
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.checks.push(ArrayCheck::MaxLength(max));
        self
    }

    /// Adds a custom predicate. See [`CustomCheck`].
    pub fn check<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.checks
            .push(ArrayCheck::Custom(CustomCheck::new(name, predicate)));
        self
    }

    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate_with_context(value, path, &ValidationContext::default())
    }

    pub(crate) fn validate_with_context(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> Validation<Value, SchemaErrors> {
        let Some(elements) = value.as_array() else {
            return Validation::Failure(SchemaErrors::single(SchemaError::invalid_type(
                path, "array", value,
            )));
        };

        if elements.len() < self.items.len() {
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(
                    path.clone(),
                    format!("expected at least {} items", self.items.len()),
                )
                .with_code("tuple_length")
                .with_got(format!("{} items", elements.len())),
            ));
        }

        validate_elements(
            elements,
            |idx| self.items.get(idx).or(self.rest.as_ref()),
            &self.checks,
            value,
            path,
            context,
        )
    }
}

impl From<TupleSchema> for Schema {
    fn from(schema: TupleSchema) -> Self {
        Schema::from_kind(SchemaKind::Tuple(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure(v: Validation<Value, SchemaErrors>) -> SchemaErrors {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_array_rejects_non_arrays() {
        let schema = ArraySchema::new(Schema::any());
        let errors = failure(schema.validate(&json!({"0": 1}), &JsonPath::root()));
        assert_eq!(errors.first().code, "invalid_type");
    }

    #[test]
    fn test_item_errors_carry_index() {
        let schema = ArraySchema::new(Schema::number());
        let errors = failure(schema.validate(&json!([1, "two", 3, "four"]), &JsonPath::root()));
        let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["[1]", "[3]"]);
    }

    #[test]
    fn test_length_checks() {
        let schema = ArraySchema::new(Schema::any()).length(2);
        assert!(schema.validate(&json!([1, 2]), &JsonPath::root()).is_success());
        assert_eq!(
            failure(schema.validate(&json!([1]), &JsonPath::root())).first().code,
            "length"
        );
    }

    #[test]
    fn test_tuple_without_rest_is_closed() {
        let schema = TupleSchema::new([Schema::boolean()]);
        assert!(schema.validate(&json!([true]), &JsonPath::root()).is_success());

        let errors = failure(schema.validate(&json!([true, false]), &JsonPath::root()));
        assert_eq!(errors.first().code, "additional_item");
        assert_eq!(errors.first().path.to_string(), "[1]");
    }

    #[test]
    fn test_tuple_too_short() {
        let schema = TupleSchema::new([Schema::boolean(), Schema::boolean()]).rest(Schema::any());
        let errors = failure(schema.validate(&json!([true]), &JsonPath::root()));
        assert_eq!(errors.first().code, "tuple_length");
    }

    #[test]
    fn test_tuple_rest_applies_after_fixed_items() {
        let schema = TupleSchema::new([Schema::string()]).rest(Schema::number());
        assert!(schema.validate(&json!(["x"]), &JsonPath::root()).is_success());
        assert!(schema.validate(&json!(["x", 1, 2]), &JsonPath::root()).is_success());

        let errors = failure(schema.validate(&json!(["x", 1, "y"]), &JsonPath::root()));
        assert_eq!(errors.first().path.to_string(), "[2]");
    }
}
