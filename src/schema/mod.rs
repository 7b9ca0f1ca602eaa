//! The schema graph.
//!
//! A [`Schema`] is a cheap, clonable handle to an immutable node. Nodes are
//! built with the factory functions on [`Schema`] and the typed builders
//! ([`StringSchema`], [`NumberSchema`], [`ArraySchema`], [`TupleSchema`],
//! [`ObjectSchema`]), which convert into `Schema` with `From`.
//!
//! Two handles are the *same* schema when they point at the same node
//! ([`Schema::ptr_eq`]). Definitions are keyed on that identity, so two
//! structurally identical schemas built separately are still distinct.
//!
//! # Example
//!
//! ```rust
//! use blueprint::{JsonPath, Schema};
//! use serde_json::json;
//!
//! let user: Schema = Schema::object()
//!     .field("name", Schema::string().min_len(1))
//!     .optional("tags", Schema::array(Schema::string()))
//!     .into();
//!
//! assert!(user.validate(&json!({ "name": "Ada" }), &JsonPath::root()).is_success());
//! assert!(user.validate(&json!({ "tags": [] }), &JsonPath::root()).is_failure());
//! ```

mod array;
pub(crate) mod combinators;
mod lazy;
mod numeric;
pub(crate) mod object;
mod string;
mod traits;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

pub use array::{ArrayCheck, ArraySchema, TupleSchema};
pub use lazy::LazySchema;
pub use numeric::{NumberCheck, NumberSchema};
pub use object::ObjectSchema;
pub use string::{StringCheck, StringFormat, StringSchema};
pub use traits::{Check, CustomCheck};

/// Identity of a schema node, stable for as long as any handle is alive.
pub(crate) type SchemaId = usize;

/// A handle to a node in a schema graph.
#[derive(Debug, Clone)]
pub struct Schema(Arc<SchemaKind>);

/// The node variants of a schema graph.
#[derive(Debug)]
pub enum SchemaKind {
    Any,
    Null,
    Undefined,
    Nan,
    Symbol,
    Boolean,
    Number(NumberSchema),
    String(StringSchema),
    Date,
    BigInt,
    Literal(Literal),
    Nullable(Schema),
    Optional(Schema),
    Object(ObjectSchema),
    Record(Schema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Picklist(Vec<Value>),
    Enum(IndexMap<String, Value>),
    Union(Vec<Schema>),
    Intersection(Vec<Schema>),
    Lazy(LazySchema),
    Annotated(Annotated),
}

impl SchemaKind {
    /// The kind discriminator, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::Any => "any",
            SchemaKind::Null => "null",
            SchemaKind::Undefined => "undefined",
            SchemaKind::Nan => "nan",
            SchemaKind::Symbol => "symbol",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Number(_) => "number",
            SchemaKind::String(_) => "string",
            SchemaKind::Date => "date",
            SchemaKind::BigInt => "bigint",
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Nullable(_) => "nullable",
            SchemaKind::Optional(_) => "optional",
            SchemaKind::Object(_) => "object",
            SchemaKind::Record(_) => "record",
            SchemaKind::Array(_) => "array",
            SchemaKind::Tuple(_) => "tuple",
            SchemaKind::Picklist(_) => "picklist",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Union(_) => "union",
            SchemaKind::Intersection(_) => "intersection",
            SchemaKind::Lazy(_) => "lazy",
            SchemaKind::Annotated(_) => "annotated",
        }
    }
}

/// The value matched by a literal schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Any JSON value.
    Value(Value),
    /// A raw float, which may be `NaN` or infinite.
    Float(f64),
    /// A unique symbol, identified by its description. Never equal to any JSON value.
    Symbol(String),
}

impl Literal {
    pub fn symbol(description: impl Into<String>) -> Self {
        Literal::Symbol(description.into())
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        Literal::Value(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Value(Value::String(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Value(Value::Bool(value))
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Value(Value::Number(value.into()))
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Value(Value::Number(value.into()))
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Literal::Value(Value::Number(value.into()))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

/// A schema carrying extra JSON Schema keywords.
///
/// Validates exactly like `inner`; the keywords only affect conversion.
#[derive(Debug)]
pub struct Annotated {
    inner: Schema,
    keywords: Map<String, Value>,
}

impl Annotated {
    pub fn inner(&self) -> &Schema {
        &self.inner
    }

    pub fn keywords(&self) -> &Map<String, Value> {
        &self.keywords
    }
}

/// Attaches JSON Schema keywords to a schema without changing what it accepts.
///
/// During conversion the keywords are shallow-merged into the converted
/// fragment, replacing any keyword of the same name.
///
/// # Example
///
/// ```rust
/// use blueprint::{with_json_schema, Schema, ToJsonSchema};
/// use serde_json::json;
///
/// let mut keywords = serde_json::Map::new();
/// keywords.insert("minItems".into(), json!(2));
///
/// let schema = with_json_schema(Schema::array(Schema::number()), keywords);
/// let document = schema.to_json_schema().unwrap();
///
/// assert_eq!(document["minItems"], 2);
/// assert_eq!(document["items"], json!({ "type": "number" }));
/// ```
pub fn with_json_schema(schema: impl Into<Schema>, keywords: Map<String, Value>) -> Schema {
    Schema::from_kind(SchemaKind::Annotated(Annotated {
        inner: schema.into(),
        keywords,
    }))
}

impl Schema {
    pub(crate) fn from_kind(kind: SchemaKind) -> Self {
        Schema(Arc::new(kind))
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.0
    }

    /// True when both handles point at the same node.
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> SchemaId {
        Arc::as_ptr(&self.0) as usize
    }

    /// True when an enclosing object may omit this property.
    ///
    /// Looks through annotation wrappers, which are transparent.
    pub fn is_optional(&self) -> bool {
        match self.kind() {
            SchemaKind::Optional(_) => true,
            SchemaKind::Annotated(annotated) => annotated.inner.is_optional(),
            _ => false,
        }
    }

    /// Method form of [`with_json_schema`].
    pub fn json_schema(self, keywords: Map<String, Value>) -> Schema {
        with_json_schema(self, keywords)
    }

    /// Matches every value.
    pub fn any() -> Schema {
        Schema::from_kind(SchemaKind::Any)
    }

    pub fn null() -> Schema {
        Schema::from_kind(SchemaKind::Null)
    }

    /// Matches only an absent value. JSON has no `undefined`, so as a
    /// standalone value this matches nothing.
    pub fn undefined() -> Schema {
        Schema::from_kind(SchemaKind::Undefined)
    }

    /// Matches only `NaN`. Has no JSON Schema form.
    pub fn nan() -> Schema {
        Schema::from_kind(SchemaKind::Nan)
    }

    /// Matches symbols. Has no JSON Schema form.
    pub fn symbol() -> Schema {
        Schema::from_kind(SchemaKind::Symbol)
    }

    pub fn boolean() -> Schema {
        Schema::from_kind(SchemaKind::Boolean)
    }

    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Shorthand for `Schema::number().integer()`.
    pub fn integer() -> NumberSchema {
        NumberSchema::new().integer()
    }

    /// A point in time. Its JSON encoding is chosen at conversion time.
    pub fn date() -> Schema {
        Schema::from_kind(SchemaKind::Date)
    }

    /// An arbitrary precision integer. Its JSON encoding is chosen at conversion time.
    pub fn bigint() -> Schema {
        Schema::from_kind(SchemaKind::BigInt)
    }

    pub fn literal(value: impl Into<Literal>) -> Schema {
        Schema::from_kind(SchemaKind::Literal(value.into()))
    }

    /// `inner` or `null`.
    pub fn nullable(inner: impl Into<Schema>) -> Schema {
        Schema::from_kind(SchemaKind::Nullable(inner.into()))
    }

    /// `inner`, or absent when used as an object property.
    pub fn optional(inner: impl Into<Schema>) -> Schema {
        Schema::from_kind(SchemaKind::Optional(inner.into()))
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// An object that rejects undeclared properties.
    pub fn strict_object() -> ObjectSchema {
        ObjectSchema::new().strict()
    }

    /// An object with arbitrary keys whose values all match `value`.
    pub fn record(value: impl Into<Schema>) -> Schema {
        Schema::from_kind(SchemaKind::Record(value.into()))
    }

    pub fn array(item: impl Into<Schema>) -> ArraySchema {
        ArraySchema::new(item)
    }

    /// A fixed-length array with one schema per position.
    pub fn tuple<I>(items: I) -> TupleSchema
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        TupleSchema::new(items)
    }

    /// One of a fixed list of values.
    pub fn picklist<I>(values: I) -> Schema
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Schema::from_kind(SchemaKind::Picklist(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// One of the values of a named enumeration.
    ///
    /// ```rust
    /// use blueprint::{Schema, ToJsonSchema};
    /// use serde_json::json;
    ///
    /// let direction = Schema::enumeration([("Up", 0), ("Down", 1)]);
    /// assert_eq!(direction.to_json_schema().unwrap()["enum"], json!([0, 1]));
    /// ```
    pub fn enumeration<I, K, V>(entries: I) -> Schema
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Schema::from_kind(SchemaKind::Enum(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// At least one member must match.
    pub fn union<I>(members: I) -> Schema
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        Schema::from_kind(SchemaKind::Union(
            members.into_iter().map(Into::into).collect(),
        ))
    }

    /// Every member must match.
    pub fn intersection<I>(members: I) -> Schema
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        Schema::from_kind(SchemaKind::Intersection(
            members.into_iter().map(Into::into).collect(),
        ))
    }

    /// A deferred reference to another schema.
    ///
    /// `getter` must return the same node every time it is called. It is
    /// invoked only to learn which node is referenced, never to inline it.
    pub fn lazy<F>(getter: F) -> Schema
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Schema::from_kind(SchemaKind::Lazy(LazySchema::from_getter(getter)))
    }

    /// Builds a self-referential schema.
    ///
    /// `build` receives a lazy reference to the schema it returns.
    ///
    /// ```rust
    /// use blueprint::{JsonPath, Schema};
    /// use serde_json::json;
    ///
    /// let tree = Schema::recursive(|tree| {
    ///     Schema::object()
    ///         .field("value", Schema::number())
    ///         .field("children", Schema::array(tree))
    ///         .into()
    /// });
    ///
    /// let value = json!({ "value": 1, "children": [{ "value": 2, "children": [] }] });
    /// assert!(tree.validate(&value, &JsonPath::root()).is_success());
    /// ```
    pub fn recursive<F>(build: F) -> Schema
    where
        F: FnOnce(Schema) -> Schema,
    {
        let (this, slot) = LazySchema::slot();
        let target = build(Schema::from_kind(SchemaKind::Lazy(this)));
        slot.fill(&target.0);
        target
    }
}

/// JSON number for an `f64`, keeping integral values integral.
///
/// `None` for `NaN` and the infinities, which JSON cannot represent.
pub(crate) fn number_value(value: f64) -> Option<Value> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Some(Value::Number((value as i64).into()))
    } else {
        Number::from_f64(value).map(Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_identity() {
        let schema: Schema = Schema::string().into();
        let copy = schema.clone();
        assert!(schema.ptr_eq(&copy));
        assert_eq!(schema.id(), copy.id());
    }

    #[test]
    fn test_identical_shapes_are_distinct() {
        let a = Schema::number();
        let b = Schema::number();
        let a: Schema = a.into();
        let b: Schema = b.into();
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Schema::nan().kind().name(), "nan");
        assert_eq!(Schema::record(Schema::any()).kind().name(), "record");
        let tuple: Schema = Schema::tuple([Schema::any()]).into();
        assert_eq!(tuple.kind().name(), "tuple");
    }

    #[test]
    fn test_optional_seen_through_annotation() {
        let field = Schema::optional(Schema::string()).json_schema(Map::new());
        assert!(field.is_optional());
        assert!(!Schema::nullable(Schema::string()).is_optional());
    }

    #[test]
    fn test_recursive_resolves_to_itself() {
        let tree = Schema::recursive(|tree| Schema::array(tree).into());
        let SchemaKind::Array(array) = tree.kind() else {
            panic!("expected array");
        };
        let SchemaKind::Lazy(lazy) = array.item().kind() else {
            panic!("expected lazy item");
        };
        assert!(lazy.resolve().unwrap().ptr_eq(&tree));
    }

    #[test]
    fn test_number_value_keeps_integers() {
        assert_eq!(number_value(3.0), Some(json!(3)));
        assert_eq!(number_value(-2.0), Some(json!(-2)));
        assert_eq!(number_value(0.5), Some(json!(0.5)));
        assert_eq!(number_value(f64::NAN), None);
        assert_eq!(number_value(f64::NEG_INFINITY), None);
    }
}
