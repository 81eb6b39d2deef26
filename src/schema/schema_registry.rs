use indexmap::IndexMap;

use crate::schema::{SchemaDescriptor, SchemaProvider};

/// Schemas known to the translator, keyed by schema name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaDescriptor>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: SchemaDescriptor) {
        self.schemas.insert(schema.name.clone(), schema);
    }

    pub fn with(mut self, schema: SchemaDescriptor) -> Self {
        self.register(schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SchemaDescriptor> {
        self.schemas.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaDescriptor> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaProvider for SchemaRegistry {
    fn schema_of(&self, name: &str) -> Option<&SchemaDescriptor> {
        self.get(name)
    }
}
