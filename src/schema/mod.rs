pub mod association;
pub use association::*;

pub mod schema_descriptor;
pub use schema_descriptor::*;

pub mod schema_registry;
pub use schema_registry::*;

pub mod relationship_index;
pub use relationship_index::*;

pub trait SchemaProvider {
    /// Given a schema name, return its descriptor if registered.
    fn schema_of(&self, name: &str) -> Option<&SchemaDescriptor>;
}
