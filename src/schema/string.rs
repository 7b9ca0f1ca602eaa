//! String schemas.
//!
//! [`StringSchema`] matches JSON strings and carries length, pattern and
//! format refinements. Lengths count Unicode scalar values, not bytes.

use std::net::{Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;

use super::traits::{run_checks, Check, CustomCheck};
use super::{Schema, SchemaKind};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s]+$").expect("valid url regex")
});
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid uuid regex")
});

/// Well-known string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    Url,
    Uuid,
    /// `YYYY-MM-DD`
    Date,
    /// RFC 3339 date-time
    DateTime,
    Ipv4,
    Ipv6,
}

impl StringFormat {
    /// The JSON Schema `format` keyword value.
    pub fn json_schema_format(self) -> &'static str {
        match self {
            StringFormat::Email => "email",
            StringFormat::Url => "uri",
            StringFormat::Uuid => "uuid",
            StringFormat::Date => "date",
            StringFormat::DateTime => "date-time",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
        }
    }

    fn matches(self, s: &str) -> bool {
        match self {
            StringFormat::Email => EMAIL.is_match(s),
            StringFormat::Url => URL.is_match(s),
            StringFormat::Uuid => UUID.is_match(s),
            StringFormat::Date => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            StringFormat::DateTime => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
            StringFormat::Ipv4 => s.parse::<Ipv4Addr>().is_ok(),
            StringFormat::Ipv6 => s.parse::<Ipv6Addr>().is_ok(),
        }
    }
}

/// A refinement on string values.
#[derive(Debug, Clone)]
pub enum StringCheck {
    MinLength(usize),
    MaxLength(usize),
    Length(usize),
    Pattern(Regex),
    Format(StringFormat),
    Custom(CustomCheck),
}

impl Check for StringCheck {
    fn name(&self) -> &str {
        match self {
            StringCheck::Custom(custom) => custom.name(),
            other => static_code(other),
        }
    }

    fn check(&self, value: &Value, path: &JsonPath) -> Option<SchemaError> {
        let s = value.as_str()?;
        let len = s.chars().count();
        let error = |message: String, expected: String| {
            Some(
                SchemaError::new(path.clone(), message)
                    .with_code(static_code(self))
                    .with_expected(expected),
            )
        };

        match self {
            StringCheck::MinLength(min) if len < *min => error(
                format!("length must be at least {}, got {}", min, len),
                format!("at least {} characters", min),
            ),
            StringCheck::MaxLength(max) if len > *max => error(
                format!("length must be at most {}, got {}", max, len),
                format!("at most {} characters", max),
            ),
            StringCheck::Length(exact) if len != *exact => error(
                format!("length must be exactly {}, got {}", exact, len),
                format!("exactly {} characters", exact),
            ),
            StringCheck::Pattern(regex) if !regex.is_match(s) => error(
                format!("must match pattern '{}'", regex.as_str()),
                format!("string matching '{}'", regex.as_str()),
            ),
            StringCheck::Format(format) if !format.matches(s) => error(
                format!("must be a valid {}", format.json_schema_format()),
                format.json_schema_format().to_string(),
            ),
            StringCheck::Custom(custom) => custom.check(value, path),
            _ => None,
        }
    }
}

fn static_code(check: &StringCheck) -> &'static str {
    match check {
        StringCheck::MinLength(_) => "min_length",
        StringCheck::MaxLength(_) => "max_length",
        StringCheck::Length(_) => "length",
        StringCheck::Pattern(_) => "pattern",
        StringCheck::Format(_) => "format",
        StringCheck::Custom(_) => "custom",
    }
}

/// A schema matching strings.
///
/// # Example
///
/// ```rust
/// use blueprint::{JsonPath, Schema};
/// use serde_json::json;
///
/// let slug = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z-]+$")
///     .unwrap();
///
/// assert!(slug.validate(&json!("hello-world"), &JsonPath::root()).is_success());
///
/// // Both the length and the pattern failure are reported.
/// let errors = slug.validate(&json!("AB"), &JsonPath::root()).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    checks: Vec<StringCheck>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checks(&self) -> &[StringCheck] {
        &self.checks
    }

    fn push(mut self, check: StringCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn min_len(self, min: usize) -> Self {
        self.push(StringCheck::MinLength(min))
    }

    pub fn max_len(self, max: usize) -> Self {
        self.push(StringCheck::MaxLength(max))
    }

    /// Exact length.
    pub fn length(self, len: usize) -> Self {
        self.push(StringCheck::Length(len))
    }

    /// The string must match `pattern`. Fails if the regex does not compile.
    pub fn pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.push(StringCheck::Pattern(Regex::new(pattern)?)))
    }

    pub fn email(self) -> Self {
        self.push(StringCheck::Format(StringFormat::Email))
    }

    pub fn url(self) -> Self {
        self.push(StringCheck::Format(StringFormat::Url))
    }

    pub fn uuid(self) -> Self {
        self.push(StringCheck::Format(StringFormat::Uuid))
    }

    pub fn date(self) -> Self {
        self.push(StringCheck::Format(StringFormat::Date))
    }

    pub fn datetime(self) -> Self {
        self.push(StringCheck::Format(StringFormat::DateTime))
    }

    pub fn ipv4(self) -> Self {
        self.push(StringCheck::Format(StringFormat::Ipv4))
    }

    pub fn ipv6(self) -> Self {
        self.push(StringCheck::Format(StringFormat::Ipv6))
    }

    /// Adds a custom predicate. See [`CustomCheck`].
    pub fn check<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.push(StringCheck::Custom(CustomCheck::new(name, predicate)))
    }

    /// Validates `value`, reporting every failed refinement.
    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        if !value.is_string() {
            return Validation::Failure(SchemaErrors::single(SchemaError::invalid_type(
                path, "string", value,
            )));
        }
        run_checks(&self.checks, value, path)
    }
}

impl From<StringSchema> for Schema {
    fn from(schema: StringSchema) -> Self {
        Schema::from_kind(SchemaKind::String(schema))
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
    fn test_rejects_non_strings() {
        let schema = StringSchema::new();
        for value in [json!(42), json!(null), json!(true), json!([]), json!({})] {
            let errors = failure(schema.validate(&value, &JsonPath::root()));
            assert_eq!(errors.first().code, "invalid_type");
        }
    }

    #[test]
    fn test_length_bounds() {
        let schema = StringSchema::new().min_len(2).max_len(4);
        assert!(schema.validate(&json!("abc"), &JsonPath::root()).is_success());

        let errors = failure(schema.validate(&json!("a"), &JsonPath::root()));
        assert_eq!(errors.first().code, "min_length");

        let errors = failure(schema.validate(&json!("abcde"), &JsonPath::root()));
        assert_eq!(errors.first().code, "max_length");
    }

    #[test]
    fn test_exact_length_counts_chars() {
        let schema = StringSchema::new().length(3);
        assert!(schema.validate(&json!("日本語"), &JsonPath::root()).is_success());
        assert!(schema.validate(&json!("🎉🎊"), &JsonPath::root()).is_failure());
    }

    #[test]
    fn test_pattern() {
        let schema = StringSchema::new().pattern(r"^\d+$").unwrap();
        assert!(schema.validate(&json!("123"), &JsonPath::root()).is_success());

        let errors = failure(schema.validate(&json!("abc"), &JsonPath::root()));
        assert_eq!(errors.first().code, "pattern");
        assert!(errors.first().message.contains(r"^\d+$"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(StringSchema::new().pattern("[unclosed").is_err());
    }

    #[test]
    fn test_formats() {
        let cases = [
            (StringSchema::new().email(), "a@b.io", "not-an-email"),
            (StringSchema::new().url(), "https://example.com/x", "example.com"),
            (
                StringSchema::new().uuid(),
                "123e4567-e89b-12d3-a456-426614174000",
                "123e4567",
            ),
            (StringSchema::new().date(), "2024-02-29", "2023-02-29"),
            (
                StringSchema::new().datetime(),
                "2024-01-01T12:00:00Z",
                "2024-01-01",
            ),
            (StringSchema::new().ipv4(), "10.0.0.1", "10.0.0.256"),
            (StringSchema::new().ipv6(), "::1", "::g"),
        ];

        for (schema, good, bad) in cases {
            assert!(schema.validate(&json!(good), &JsonPath::root()).is_success(), "{good}");
            let errors = failure(schema.validate(&json!(bad), &JsonPath::root()));
            assert_eq!(errors.first().code, "format", "{bad}");
        }
    }

    #[test]
    fn test_custom_check() {
        let schema = StringSchema::new().check("lowercase", |v| {
            v.as_str().is_some_and(|s| s.chars().all(|c| !c.is_uppercase()))
        });
        assert!(schema.validate(&json!("abc"), &JsonPath::root()).is_success());

        let errors = failure(schema.validate(&json!("aBc"), &JsonPath::root()));
        assert_eq!(errors.first().code, "custom");
    }

    #[test]
    fn test_accumulates_all_failures() {
        let schema = StringSchema::new().min_len(10).pattern(r"^\d+$").unwrap();
        let errors = failure(schema.validate(&json!("abc"), &JsonPath::root()));
        assert_eq!(errors.len(), 2);
    }
}
