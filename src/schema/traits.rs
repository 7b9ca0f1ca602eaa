//! Refinement checks shared by the typed builders.
//!
//! Every refinement (length bounds, patterns, numeric ranges, custom
//! predicates) implements [`Check`]. Builders store their own check enums; the
//! validator runs them through [`run_checks`] once the base type has matched.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;

/// A refinement applied to a value that already has the right JSON type.
pub trait Check: Send + Sync {
    /// Short name used in error reports, e.g. `min_length`.
    fn name(&self) -> &str;

    /// Returns an error if `value` fails this check.
    fn check(&self, value: &Value, path: &JsonPath) -> Option<SchemaError>;
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A named predicate with no JSON Schema equivalent.
///
/// Converting a schema that carries one fails unless unknown validations are
/// ignored, in which case the generated JSON Schema is weaker than the source.
///
/// # Example
///
/// ```rust
/// use blueprint::{JsonPath, Schema};
/// use serde_json::json;
///
/// let even = Schema::integer().check("even", |v| v.as_i64().is_some_and(|n| n % 2 == 0));
///
/// assert!(even.validate(&json!(4), &JsonPath::root()).is_success());
/// assert!(even.validate(&json!(3), &JsonPath::root()).is_failure());
/// ```
#[derive(Clone)]
pub struct CustomCheck {
    name: String,
    predicate: Predicate,
}

impl CustomCheck {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCheck")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Check for CustomCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value, path: &JsonPath) -> Option<SchemaError> {
        if (self.predicate)(value) {
            None
        } else {
            Some(
                SchemaError::new(path.clone(), format!("failed check '{}'", self.name))
                    .with_code("custom"),
            )
        }
    }
}

/// Runs every check and accumulates the failures.
pub(crate) fn run_checks<C: Check>(
    checks: &[C],
    value: &Value,
    path: &JsonPath,
) -> Validation<Value, SchemaErrors> {
    let errors: Vec<SchemaError> = checks
        .iter()
        .filter_map(|c| c.check(value, path))
        .collect();

    match SchemaErrors::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(value.clone()),
    }
}
