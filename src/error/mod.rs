//! Error types.
//!
//! [`SchemaError`] and [`SchemaErrors`] describe values rejected by a schema's
//! own validator. [`ConversionError`] describes schema graphs that cannot be
//! expressed as JSON Schema.

mod conversion_error;
mod schema_error;

pub use conversion_error::ConversionError;
pub use schema_error::{SchemaError, SchemaErrors};
