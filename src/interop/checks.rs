//! Refinement to keyword mapping.
//!
//! Every refinement with a JSON Schema keyword is merged into the fragment.
//! Custom predicates have none: they fail the conversion, or are dropped with
//! a warning when `ignore_unknown_validation` is set.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::error::ConversionError;
use crate::path::JsonPath;
use crate::schema::{number_value, ArrayCheck, Check, CustomCheck, NumberCheck, StringCheck};

use super::options::Settings;

pub(crate) fn string_checks(
    checks: &[StringCheck],
    fragment: &mut Map<String, Value>,
    settings: &Settings,
    path: &JsonPath,
) -> Result<(), ConversionError> {
    for check in checks {
        match check {
            StringCheck::MinLength(min) => {
                fragment.insert("minLength".into(), json!(min));
            }
            StringCheck::MaxLength(max) => {
                fragment.insert("maxLength".into(), json!(max));
            }
            StringCheck::Length(len) => {
                fragment.insert("minLength".into(), json!(len));
                fragment.insert("maxLength".into(), json!(len));
            }
            StringCheck::Pattern(regex) => {
                fragment.insert("pattern".into(), json!(regex.as_str()));
            }
            StringCheck::Format(format) => {
                fragment.insert("format".into(), json!(format.json_schema_format()));
            }
            StringCheck::Custom(custom) => unknown(custom, "string", settings, path)?,
        }
    }
    Ok(())
}

pub(crate) fn number_checks(
    checks: &[NumberCheck],
    fragment: &mut Map<String, Value>,
    settings: &Settings,
    path: &JsonPath,
) -> Result<(), ConversionError> {
    for check in checks {
        if let Some(argument) = check.unusable_argument() {
            return Err(ConversionError::UnsupportedValidation {
                check: format!("{}({})", check.name(), argument),
                kind: "number",
                path: path.clone(),
            });
        }
        match check {
            NumberCheck::Min(min) => {
                fragment.insert("minimum".into(), bound(*min, check, path)?);
            }
            NumberCheck::Max(max) => {
                fragment.insert("maximum".into(), bound(*max, check, path)?);
            }
            NumberCheck::MultipleOf(step) => {
                fragment.insert("multipleOf".into(), bound(*step, check, path)?);
            }
            NumberCheck::Integer => {
                fragment.insert("type".into(), json!("integer"));
            }
            NumberCheck::Custom(custom) => unknown(custom, "number", settings, path)?,
        }
    }
    Ok(())
}

fn bound(value: f64, check: &NumberCheck, path: &JsonPath) -> Result<Value, ConversionError> {
    number_value(value).ok_or_else(|| ConversionError::UnsupportedValidation {
        check: format!("{}({})", check.name(), value),
        kind: "number",
        path: path.clone(),
    })
}

/// Shared by arrays and tuples; `kind` names the owner in errors.
pub(crate) fn array_checks(
    checks: &[ArrayCheck],
    kind: &'static str,
    fragment: &mut Map<String, Value>,
    settings: &Settings,
    path: &JsonPath,
) -> Result<(), ConversionError> {
    for check in checks {
        match check {
            ArrayCheck::MinLength(min) => {
                fragment.insert("minItems".into(), json!(min));
            }
            ArrayCheck::MaxLength(max) => {
                fragment.insert("maxItems".into(), json!(max));
            }
            ArrayCheck::Length(len) => {
                fragment.insert("minItems".into(), json!(len));
                fragment.insert("maxItems".into(), json!(len));
            }
            ArrayCheck::Custom(custom) => unknown(custom, kind, settings, path)?,
        }
    }
    Ok(())
}

pub(crate) fn object_checks(
    checks: &[CustomCheck],
    settings: &Settings,
    path: &JsonPath,
) -> Result<(), ConversionError> {
    checks
        .iter()
        .try_for_each(|custom| unknown(custom, "object", settings, path))
}

fn unknown(
    custom: &CustomCheck,
    kind: &'static str,
    settings: &Settings,
    path: &JsonPath,
) -> Result<(), ConversionError> {
    if settings.ignore_unknown_validation {
        warn!(check = custom.name(), kind, path = %path, "dropping validation with no JSON Schema keyword");
        Ok(())
    } else {
        Err(ConversionError::UnsupportedValidation {
            check: custom.name().to_string(),
            kind,
            path: path.clone(),
        })
    }
}
