use std::collections::HashMap;

use crate::schema::SchemaRegistry;

/// Key pair joining a left schema to a right schema:
/// `left[left_field] == right[right_field]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKeys {
    pub left_field: String,
    pub right_field: String,
}

/// Precomputed `(left schema, right schema) -> key pairs` lookup.
///
/// Every association contributes its pair in both directions, so a join can
/// be resolved from whichever side is already in the pipeline. A `has_many`
/// and the matching `belongs_to` collapse into a single entry.
#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    by_pair: HashMap<(String, String), Vec<JoinKeys>>,
}

impl RelationshipIndex {
    pub fn build(registry: &SchemaRegistry) -> Self {
        let mut index = Self::default();
        for schema in registry.iter() {
            for assoc in &schema.associations {
                index.insert(&schema.name, &assoc.related, JoinKeys {
                    left_field: assoc.owner_key.clone(),
                    right_field: assoc.related_key.clone(),
                });
                // A self-association reversed would be a second pair for the same key.
                if assoc.related != schema.name {
                    index.insert(&assoc.related, &schema.name, JoinKeys {
                        left_field: assoc.related_key.clone(),
                        right_field: assoc.owner_key.clone(),
                    });
                }
            }
        }
        index
    }

    fn insert(&mut self, left: &str, right: &str, keys: JoinKeys) {
        let entry = self.by_pair.entry((left.to_string(), right.to_string())).or_default();
        if !entry.contains(&keys) {
            entry.push(keys);
        }
    }

    pub fn between(&self, left: &str, right: &str) -> &[JoinKeys] {
        self.by_pair
            .get(&(left.to_string(), right.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_pair.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}
