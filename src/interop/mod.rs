//! Conversion of schema graphs to JSON Schema.
//!
//! [`to_json_schema`] is the entry point. It takes a root schema, a set of
//! named [`Definitions`](crate::Definitions), or both, along with the
//! [`Settings`] that pick encodings for kinds JSON has no native type for.

mod checks;
mod context;
mod dispatch;
pub mod json_schema;
mod options;
mod strategy;

pub use json_schema::{to_json_schema, ToJsonSchema, JSON_SCHEMA_DRAFT};
pub use options::{BigIntStrategy, ConvertOptions, DateStrategy, Settings, UndefinedStrategy};
