//! Number schemas.
//!
//! [`NumberSchema`] matches JSON numbers. Bounds are inclusive and stored as
//! `f64`; `integer()` additionally rejects values with a fractional part.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;

use super::traits::{run_checks, Check, CustomCheck};
use super::{Schema, SchemaKind};

/// A refinement on numeric values.
#[derive(Debug, Clone)]
pub enum NumberCheck {
    Min(f64),
    Max(f64),
    MultipleOf(f64),
    Integer,
    Custom(CustomCheck),
}

impl NumberCheck {
    /// The argument of a bound that is not finite, or of a step that is not
    /// a positive finite number. Such a check cannot be honoured.
    pub(crate) fn unusable_argument(&self) -> Option<f64> {
        match self {
            NumberCheck::Min(v) | NumberCheck::Max(v) if !v.is_finite() => Some(*v),
            NumberCheck::MultipleOf(step) if !(step.is_finite() && *step > 0.0) => Some(*step),
            _ => None,
        }
    }
}

impl Check for NumberCheck {
    fn name(&self) -> &str {
        match self {
            NumberCheck::Min(_) => "min_value",
            NumberCheck::Max(_) => "max_value",
            NumberCheck::MultipleOf(_) => "multiple_of",
            NumberCheck::Integer => "integer",
            NumberCheck::Custom(custom) => custom.name(),
        }
    }

    fn check(&self, value: &Value, path: &JsonPath) -> Option<SchemaError> {
        let n = value.as_f64()?;
        let got = value.to_string();

        if let Some(argument) = self.unusable_argument() {
            return Some(
                SchemaError::new(
                    path.clone(),
                    format!("{} cannot be checked against {}", self.name(), argument),
                )
                .with_code("invalid_refinement"),
            );
        }

        match self {
            NumberCheck::Min(min) if n < *min => Some(
                SchemaError::new(path.clone(), format!("must be at least {}", min))
                    .with_code("min_value")
                    .with_got(got),
            ),
            NumberCheck::Max(max) if n > *max => Some(
                SchemaError::new(path.clone(), format!("must be at most {}", max))
                    .with_code("max_value")
                    .with_got(got),
            ),
            NumberCheck::MultipleOf(step) if (n / step).fract() != 0.0 => Some(
                SchemaError::new(path.clone(), format!("must be a multiple of {}", step))
                .with_code("multiple_of")
                .with_got(got),
            ),
            NumberCheck::Integer if n.fract() != 0.0 => Some(
                SchemaError::new(path.clone(), "must be an integer")
                    .with_code("integer")
                    .with_got(got),
            ),
            NumberCheck::Custom(custom) => custom.check(value, path),
            _ => None,
        }
    }
}

/// A schema matching numbers.
///
/// # Example
///
/// ```rust
/// use blueprint::{JsonPath, Schema};
/// use serde_json::json;
///
/// let percent = Schema::number().min(0).max(100);
///
/// assert!(percent.validate(&json!(42.5), &JsonPath::root()).is_success());
/// assert!(percent.validate(&json!(101), &JsonPath::root()).is_failure());
/// assert!(percent.validate(&json!("42"), &JsonPath::root()).is_failure());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    checks: Vec<NumberCheck>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checks(&self) -> &[NumberCheck] {
        &self.checks
    }

    fn push(mut self, check: NumberCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Inclusive lower bound.
    pub fn min(self, min: impl Into<f64>) -> Self {
        self.push(NumberCheck::Min(min.into()))
    }

    /// Inclusive upper bound.
    pub fn max(self, max: impl Into<f64>) -> Self {
        self.push(NumberCheck::Max(max.into()))
    }

    pub fn multiple_of(self, step: impl Into<f64>) -> Self {
        self.push(NumberCheck::MultipleOf(step.into()))
    }

    pub fn integer(self) -> Self {
        self.push(NumberCheck::Integer)
    }

    /// Adds a custom predicate. See [`CustomCheck`].
    pub fn check<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.push(NumberCheck::Custom(CustomCheck::new(name, predicate)))
    }

    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        if !value.is_number() {
            return Validation::Failure(SchemaErrors::single(SchemaError::invalid_type(
                path, "number", value,
            )));
        }
        run_checks(&self.checks, value, path)
    }
}

impl From<NumberSchema> for Schema {
    fn from(schema: NumberSchema) -> Self {
        Schema::from_kind(SchemaKind::Number(schema))
    }
}
