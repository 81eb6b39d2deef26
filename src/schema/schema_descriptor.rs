use crate::{ast::Source, schema::Association};

/// Static description of a schema: where it lives and how it relates to others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub name: String,
    pub table: String,
    pub primary_key: String,
    pub associations: Vec<Association>,
}

impl SchemaDescriptor {
    pub fn new(name: &str, table: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            primary_key: "id".to_string(),
            associations: vec![],
        }
    }

    pub fn primary_key(mut self, key: &str) -> Self {
        self.primary_key = key.to_string();
        self
    }

    pub fn with_association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    /// A query source reading this schema's table.
    pub fn source(&self) -> Source {
        Source::with_schema(&self.table, &self.name)
    }
}
