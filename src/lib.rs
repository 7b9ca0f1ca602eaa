//! # Blueprint
//!
//! Composable validation schemas that convert to JSON Schema, including
//! schema graphs that refer to themselves.
//!
//! ## Overview
//!
//! A [`Schema`] is a node in an immutable graph built from factory functions
//! and typed builders. The same graph can validate JSON values directly,
//! accumulating every error through stillwater's `Validation`, or be converted
//! into a draft-07 JSON Schema document with [`to_json_schema`].
//!
//! Recursive graphs are built with [`Schema::recursive`] or [`Schema::lazy`].
//! They convert only when the recursion target is registered in
//! [`Definitions`]; each reference then becomes `{"$ref": "#/definitions/<name>"}`.
//!
//! ## Core Types
//!
//! - [`Schema`]: a handle to a schema node, compared by identity
//! - [`Definitions`]: named schemas, emitted under `definitions`
//! - [`ConvertOptions`] and [`Settings`]: conversion inputs and encoding policies
//! - [`ConversionError`]: why a graph could not be converted
//! - [`SchemaError`] / [`SchemaErrors`]: validation failures with their [`JsonPath`]
//!
//! ## Example
//!
//! ```rust
//! use blueprint::{Schema, ToJsonSchema};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("a", Schema::string())
//!     .optional("b", Schema::string());
//!
//! assert_eq!(
//!     schema.to_json_schema().unwrap(),
//!     json!({
//!         "$schema": "http://json-schema.org/draft-07/schema#",
//!         "type": "object",
//!         "properties": {
//!             "a": { "type": "string" },
//!             "b": { "type": "string" }
//!         },
//!         "required": ["a"]
//!     })
//! );
//! ```

pub mod definitions;
pub mod error;
pub mod interop;
pub mod path;
pub mod schema;
pub mod validation;

pub use definitions::{DefinitionError, Definitions};
pub use error::{ConversionError, SchemaError, SchemaErrors};
pub use interop::{
    to_json_schema, BigIntStrategy, ConvertOptions, DateStrategy, Settings, ToJsonSchema,
    UndefinedStrategy, JSON_SCHEMA_DRAFT,
};
pub use path::{JsonPath, PathSegment};
pub use schema::{
    with_json_schema, Annotated, ArrayCheck, ArraySchema, Check, CustomCheck, LazySchema, Literal,
    NumberCheck, NumberSchema, ObjectSchema, Schema, SchemaKind, StringCheck, StringFormat,
    StringSchema, TupleSchema,
};
pub use validation::ValidationContext;

/// Type alias for validation results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
