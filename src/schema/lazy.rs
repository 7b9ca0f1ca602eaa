//! Deferred references.
//!
//! A [`LazySchema`] points at another node without embedding it, which is how
//! a schema graph contains cycles. The target is looked up on demand, either
//! through a user getter or through the weak slot created by
//! [`Schema::recursive`](super::Schema::recursive).

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

use super::{Schema, SchemaKind};

type Getter = Arc<dyn Fn() -> Schema + Send + Sync>;

#[derive(Clone)]
enum Target {
    Getter(Getter),
    /// Filled once the recursive schema has been built. Weak, so the node and
    /// the schema that contains it do not keep each other alive.
    Slot(Arc<RwLock<Weak<SchemaKind>>>),
}

/// A reference to a schema node that is resolved on demand.
#[derive(Clone)]
pub struct LazySchema {
    target: Target,
}

/// Write side of a [`LazySchema`] slot.
pub(crate) struct SlotFiller(Arc<RwLock<Weak<SchemaKind>>>);

impl SlotFiller {
    pub(crate) fn fill(self, target: &Arc<SchemaKind>) {
        *self.0.write() = Arc::downgrade(target);
    }
}

impl LazySchema {
    pub(crate) fn from_getter<F>(getter: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Self {
            target: Target::Getter(Arc::new(getter)),
        }
    }

    pub(crate) fn slot() -> (Self, SlotFiller) {
        let slot = Arc::new(RwLock::new(Weak::new()));
        let lazy = Self {
            target: Target::Slot(Arc::clone(&slot)),
        };
        (lazy, SlotFiller(slot))
    }

    /// The referenced node, or `None` if a recursive target has been dropped.
    pub fn resolve(&self) -> Option<Schema> {
        match &self.target {
            Target::Getter(getter) => Some(getter()),
            Target::Slot(slot) => slot.read().upgrade().map(Schema),
        }
    }

    /// Validates against the target, one level deeper in the reference chain.
    pub(crate) fn validate_with_context(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> Validation<Value, SchemaErrors> {
        if context.depth() >= context.max_depth() {
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(
                    path.clone(),
                    format!(
                        "maximum reference depth {} exceeded at path '{}'",
                        context.max_depth(),
                        path
                    ),
                )
                .with_code("max_depth_exceeded"),
            ));
        }

        match self.resolve() {
            Some(target) => target.validate_with_context(value, path, &context.increment_depth()),
            None => Validation::Failure(SchemaErrors::single(
                SchemaError::new(path.clone(), "recursive schema target no longer exists")
                    .with_code("unresolved_reference"),
            )),
        }
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Target::Getter(_) => "getter",
            Target::Slot(_) => "recursive",
        };
        f.debug_struct("LazySchema").field("target", &target).finish()
    }
}
