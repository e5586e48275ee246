// ── Field descriptor registry ──
//
// Maps each entity kind to its compiled schema. Populated once at
// startup and read-only afterwards; schemas are handed out as `Arc`s so
// any number of open dialogs can share them.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::SchemaError;
use crate::model::{ConditionalRule, EntityKind, FieldDescriptor};
use crate::schema::EntitySchema;

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<EntityKind, Arc<EntitySchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register an entity's descriptors and rules.
    ///
    /// Fails on duplicate field names, rules referencing unknown fields or
    /// flags, and on a second registration of the same kind.
    pub fn register(
        &mut self,
        kind: EntityKind,
        descriptors: Vec<FieldDescriptor>,
        rules: Vec<ConditionalRule>,
    ) -> Result<Arc<EntitySchema>, SchemaError> {
        if self.schemas.contains_key(&kind) {
            return Err(SchemaError::DuplicateEntity { entity: kind });
        }
        let schema = Arc::new(EntitySchema::compile(kind, descriptors, rules)?);
        self.schemas.insert(kind, Arc::clone(&schema));
        debug!(entity = %kind, "registered entity schema");
        Ok(schema)
    }

    /// Ordered descriptors for an entity kind.
    pub fn get(&self, kind: EntityKind) -> Option<&[FieldDescriptor]> {
        self.schemas.get(&kind).map(|s| s.descriptors())
    }

    pub fn schema(&self, kind: EntityKind) -> Option<Arc<EntitySchema>> {
        self.schemas.get(&kind).cloned()
    }

    pub fn require(&self, kind: EntityKind) -> Result<Arc<EntitySchema>, SchemaError> {
        self.schema(kind)
            .ok_or(SchemaError::UnknownEntity { entity: kind })
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.schemas.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
